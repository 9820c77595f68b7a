// Purpose: Typed error surface for manifest, configuration, traversal, and rewrite failures.
// Inputs/Outputs: Produced by pkg/config/walk layers and mapped to exit statuses by the CLI.
// Invariants: Every FixError variant maps to exactly one exit status.
// Gotchas: Scan errors carry the file path and 1-based line so users can locate the source.

use std::path::PathBuf;
use thiserror::Error;

use crate::rewrite::ScanError;

/// Errors raised while reading `go.mod`.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("go.mod file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not declare a module", .0.display())]
    NoModuleDeclaration(PathBuf),
}

/// Errors raised while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dir not exists: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value:?}")]
    BadValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FixError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("cannot list {}: {source}", .path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        line: usize,
        #[source]
        source: ScanError,
    },

    #[error("read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path depth level is {limit} (dir: {})", .path.display())]
    DepthLimitExceeded { path: PathBuf, limit: usize },
}

impl FixError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FixError::Config(ConfigError::RootMissing(_)) => 3,
            FixError::Config(_) => 6,
            FixError::Manifest(ManifestError::NoModuleDeclaration(_)) => 5,
            FixError::Manifest(_) => 4,
            FixError::Traversal { .. }
            | FixError::Scan { .. }
            | FixError::ReadFile { .. }
            | FixError::WriteFile { .. }
            | FixError::DepthLimitExceeded { .. } => 1,
        }
    }

    /// Whether the walk may continue with the next file after this error.
    pub fn is_file_local(&self) -> bool {
        matches!(self, FixError::Scan { .. } | FixError::ReadFile { .. })
    }
}
