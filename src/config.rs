// Purpose: Build the immutable run configuration from defaults, gofix.toml, environment, and CLI flags.
// Inputs/Outputs: Reads <root>/gofix.toml and GOFIX_MAX_DEPTH; yields a FixConfig shared read-only by the run.
// Invariants: Later sources win: defaults < file < environment < flags.
// Gotchas: The root must exist before anything else is read; unknown config keys are rejected.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "gofix.toml";
pub const DEFAULT_SUFFIX: &str = ".go";
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// What to do with an import that climbs above the module root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AboveRootPolicy {
    #[default]
    Error,
    Clamp,
}

/// Whether a file that fails to scan stops the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanErrorPolicy {
    #[default]
    Abort,
    Continue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub suffix: Option<String>,
    pub max_depth: Option<usize>,
    pub above_root: Option<AboveRootPolicy>,
    pub on_scan_error: Option<ScanErrorPolicy>,
}

impl ConfigFile {
    pub fn parse(toml_text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ConfigFile>(toml_text)
    }
}

/// Settings given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub max_depth: Option<usize>,
    pub above_root: Option<AboveRootPolicy>,
    pub on_scan_error: Option<ScanErrorPolicy>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct FixConfig {
    pub root: PathBuf,
    pub suffix: String,
    pub max_depth: usize,
    pub above_root: AboveRootPolicy,
    pub on_scan_error: ScanErrorPolicy,
    pub dry_run: bool,
}

impl FixConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            above_root: AboveRootPolicy::default(),
            on_scan_error: ScanErrorPolicy::default(),
            dry_run: false,
        }
    }

    pub fn load(root: impl Into<PathBuf>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut cfg = Self::new(root);
        if !cfg.root.is_dir() {
            return Err(ConfigError::RootMissing(cfg.root));
        }

        let file_path = cfg.root.join(CONFIG_FILE);
        if file_path.is_file() {
            let file = read_config_file(&file_path)?;
            cfg.apply_file(file);
        }
        cfg.apply_env(std::env::var("GOFIX_MAX_DEPTH").ok().as_deref())?;
        cfg.apply_overrides(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(suffix) = file.suffix {
            self.suffix = suffix;
        }
        if let Some(depth) = file.max_depth {
            self.max_depth = depth;
        }
        if let Some(policy) = file.above_root {
            self.above_root = policy;
        }
        if let Some(policy) = file.on_scan_error {
            self.on_scan_error = policy;
        }
    }

    fn apply_env(&mut self, max_depth: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = max_depth.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(());
        };
        self.max_depth = raw.parse::<usize>().map_err(|_| ConfigError::BadValue {
            key: "GOFIX_MAX_DEPTH",
            value: raw.to_string(),
        })?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, o: &Overrides) {
        if let Some(depth) = o.max_depth {
            self.max_depth = depth;
        }
        if let Some(policy) = o.above_root {
            self.above_root = policy;
        }
        if let Some(policy) = o.on_scan_error {
            self.on_scan_error = policy;
        }
        self.dry_run |= o.dry_run;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::BadValue {
                key: "max_depth",
                value: "0".to_string(),
            });
        }
        if self.suffix.is_empty() {
            return Err(ConfigError::BadValue {
                key: "suffix",
                value: String::new(),
            });
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigFile::parse(&text).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        AboveRootPolicy, CONFIG_FILE, ConfigFile, DEFAULT_MAX_DEPTH, FixConfig, Overrides,
        ScanErrorPolicy,
    };
    use crate::error::ConfigError;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time drift")
            .as_nanos();
        std::env::temp_dir().join(format!("gofix-{}-{}-{}", prefix, std::process::id(), nonce))
    }

    #[test]
    fn config_file_parses_policies() {
        let file = ConfigFile::parse(
            "suffix = \".gox\"\nmax_depth = 8\nabove_root = \"clamp\"\non_scan_error = \"continue\"\n",
        )
        .expect("parse");
        let mut cfg = FixConfig::new("x");
        cfg.apply_file(file);
        assert_eq!(cfg.suffix, ".gox");
        assert_eq!(cfg.max_depth, 8);
        assert_eq!(cfg.above_root, AboveRootPolicy::Clamp);
        assert_eq!(cfg.on_scan_error, ScanErrorPolicy::Continue);
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        assert!(ConfigFile::parse("exclude = [\"vendor\"]\n").is_err());
    }

    #[test]
    fn flags_win_over_file_and_env() {
        let mut cfg = FixConfig::new("x");
        cfg.apply_file(ConfigFile {
            max_depth: Some(4),
            ..ConfigFile::default()
        });
        cfg.apply_env(Some("6")).expect("env");
        assert_eq!(cfg.max_depth, 6);
        cfg.apply_overrides(&Overrides {
            max_depth: Some(10),
            dry_run: true,
            ..Overrides::default()
        });
        assert_eq!(cfg.max_depth, 10);
        assert!(cfg.dry_run);
    }

    #[test]
    fn bad_env_depth_is_reported() {
        let mut cfg = FixConfig::new("x");
        let err = cfg.apply_env(Some("deep")).unwrap_err();
        assert!(matches!(err, ConfigError::BadValue { key: "GOFIX_MAX_DEPTH", .. }));
        cfg.apply_env(Some("  ")).expect("blank is ignored");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn load_requires_existing_root() {
        let root = temp_dir("cfg-missing");
        let err = FixConfig::load(&root, &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::RootMissing(_)));
    }

    #[test]
    fn load_reads_config_file_from_root() {
        let root = temp_dir("cfg-file");
        fs::create_dir_all(&root).expect("mkdir");
        fs::write(root.join(CONFIG_FILE), "above_root = \"clamp\"\n").expect("write cfg");
        let cfg = FixConfig::load(&root, &Overrides::default()).expect("load");
        assert_eq!(cfg.above_root, AboveRootPolicy::Clamp);
        assert_eq!(cfg.suffix, ".go");

        fs::write(root.join(CONFIG_FILE), "max_depth = 0\n").expect("rewrite cfg");
        let err = FixConfig::load(&root, &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::BadValue { key: "max_depth", .. }));

        let _ = fs::remove_dir_all(root);
    }
}
