// Purpose: Rewrite one source file by driving the region scanner over each of its lines.
// Inputs/Outputs: Reads the file, builds the rewritten text in a buffer owned by this call, overwrites on success.
// Invariants: A file that fails on any line is never written; unchanged output is never written.
// Gotchas: Line terminators (LF, CRLF, missing final newline) must round-trip byte for byte.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use super::scanner::{ImportContext, RegionScanner, ScanError};
use crate::error::FixError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: ScanError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    Rewritten,
    /// Dry run: the file would have been rewritten.
    WouldRewrite,
    Unchanged,
}

impl FileOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, FileOutcome::Unchanged)
    }
}

/// Decode file bytes, locating the first invalid UTF-8 sequence by line and column.
pub fn decode_source(bytes: &[u8]) -> Result<&str, LineError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = String::from_utf8_lossy(&bytes[..e.valid_up_to()]);
        let line = valid.matches('\n').count() + 1;
        let tail = valid.rsplit('\n').next().unwrap_or("");
        LineError {
            line,
            source: ScanError::InvalidUtf8 {
                column: tail.chars().count() + 1,
            },
        }
    })
}

/// Rewrite every import literal in `src`.
pub fn rewrite_source(src: &str, ctx: ImportContext<'_>) -> Result<String, LineError> {
    let mut scanner = RegionScanner::new(ctx);
    let mut out = String::with_capacity(src.len() + 64);
    for (idx, line) in src.split_inclusive('\n').enumerate() {
        scanner
            .scan_line(line, &mut out)
            .map_err(|source| LineError {
                line: idx + 1,
                source,
            })?;
    }
    Ok(out)
}

pub fn rewrite_file(
    path: &Path,
    ctx: ImportContext<'_>,
    dry_run: bool,
) -> Result<FileOutcome, FixError> {
    let bytes = fs::read(path).map_err(|source| FixError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let scan_err = |e: LineError| FixError::Scan {
        path: path.to_path_buf(),
        line: e.line,
        source: e.source,
    };
    let src = decode_source(&bytes).map_err(scan_err)?;
    let out = rewrite_source(src, ctx).map_err(scan_err)?;

    if out == src {
        return Ok(FileOutcome::Unchanged);
    }
    if dry_run {
        return Ok(FileOutcome::WouldRewrite);
    }

    let write_err = |source| FixError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(out.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    Ok(FileOutcome::Rewritten)
}
