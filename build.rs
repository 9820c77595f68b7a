use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=GOFIX_GIT_COMMIT");

    let pkg_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let commit = env::var("GOFIX_GIT_COMMIT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            println!("cargo:rerun-if-changed=.git/HEAD");
            println!("cargo:rerun-if-changed=.git/index");
            let mut tag = git_commit()?;
            if git_dirty().unwrap_or(false) {
                tag.push_str("-dirty");
            }
            Some(tag)
        });

    let version = match commit {
        Some(c) => format!("{pkg_version} ({c})"),
        None => pkg_version,
    };
    println!("cargo:rustc-env=GOFIX_BUILD_VERSION={version}");
}

/// Abbreviated HEAD commit, or `None` outside a git checkout.
fn git_commit() -> Option<String> {
    let out = git(&["rev-parse", "--short=12", "HEAD"]).output().ok()?;
    let rev = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (out.status.success() && !rev.is_empty()).then_some(rev)
}

/// Whether the work tree or the index differs from HEAD.
fn git_dirty() -> Option<bool> {
    let unstaged_clean = git(&["diff", "--no-ext-diff", "--quiet"]).status().ok()?.success();
    let staged_clean = git(&["diff", "--cached", "--no-ext-diff", "--quiet"])
        .status()
        .ok()?
        .success();
    Some(!(unstaged_clean && staged_clean))
}

fn git(args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args);
    cmd
}
