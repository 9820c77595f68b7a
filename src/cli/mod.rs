// Purpose: Command-line entry for gofix: parse flags, set up logging, run the rewrite, map errors to exit codes.
// Inputs/Outputs: Takes argv (without program name) and returns the process exit status.
// Invariants: Nothing under the root is touched until config and go.mod have both loaded.
// Gotchas: Startup failures keep distinct exit statuses; see FixError::exit_code.

use anyhow::Context;
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AboveRootPolicy, FixConfig, Overrides, ScanErrorPolicy};
use crate::error::FixError;
use crate::pkg::modfile::{MANIFEST_FILE, read_module_name};
use crate::walk::{WalkReport, fix_tree};

/// Rewrite relative Go imports (./x, ../y) into module-qualified paths.
#[derive(Parser, Debug)]
#[command(name = "gofix", version = env!("GOFIX_BUILD_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Root directory of the module (must contain go.mod)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Report files that would change without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Continue with the next file when one fails to scan
    #[arg(long)]
    pub keep_going: bool,

    /// Resolve imports that climb above the module root to the root instead of failing
    #[arg(long)]
    pub clamp_above_root: bool,

    /// Maximum directory depth below the root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_depth: self.max_depth,
            above_root: self.clamp_above_root.then_some(AboveRootPolicy::Clamp),
            on_scan_error: self.keep_going.then_some(ScanErrorPolicy::Continue),
            dry_run: self.dry_run,
        }
    }
}

pub fn run_cli<I>(args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    let argv = std::iter::once("gofix".to_string()).chain(args);
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 2 } else { 0 };
        }
    };
    init_logging(cli.verbose);

    match run(&cli) {
        Ok((cfg, report)) => {
            print_report(&cfg, &report);
            if report.is_clean() { 0 } else { 1 }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            err.downcast_ref::<FixError>()
                .map(FixError::exit_code)
                .unwrap_or(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("GOFIX_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    // a subscriber may already be installed when called more than once in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<(FixConfig, WalkReport)> {
    let cfg = FixConfig::load(&cli.dir, &cli.overrides()).map_err(FixError::from)?;
    let module = read_module_name(&cfg.root.join(MANIFEST_FILE)).map_err(FixError::from)?;
    debug!(module = %module, root = %cfg.root.display(), "loaded module");

    let report = fix_tree(&cfg, &module)
        .with_context(|| format!("fixing imports under {}", cfg.root.display()))?;
    info!(
        scanned = report.scanned,
        changed = report.changed.len(),
        failed = report.failures.len(),
        "done"
    );
    Ok((cfg, report))
}

fn print_report(cfg: &FixConfig, report: &WalkReport) {
    for failure in &report.failures {
        eprintln!("error: {}", failure.message);
    }
    let stdout = std::io::stdout();
    let _ = write_report(&mut stdout.lock(), cfg.dry_run, report);
}

fn write_report(out: &mut impl Write, dry_run: bool, report: &WalkReport) -> io::Result<()> {
    if dry_run {
        for path in &report.changed {
            writeln!(out, "{}", path.display())?;
        }
    }
    let verb = if dry_run { "would rewrite" } else { "rewrote" };
    writeln!(
        out,
        "gofix: scanned {} files, {} {}, {} unchanged, {} failed",
        report.scanned,
        verb,
        report.changed.len(),
        report.unchanged,
        report.failures.len()
    )
}
