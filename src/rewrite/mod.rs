// Purpose: Import rewriting core: keyword matcher, region scanner, path resolver, and per-file driver.
// Inputs/Outputs: Turns Go source text plus its position in the module into text with module-qualified imports.
// Invariants: Everything here is pure except rewrite_file, which touches exactly one file.
// Gotchas: Resolution is lexical only; nothing checks that the rewritten import exists.

pub mod file;
pub mod keyword;
pub mod resolve;
pub mod scanner;

pub use file::{FileOutcome, LineError, decode_source, rewrite_file, rewrite_source};
pub use resolve::{ResolveError, clean_path, resolve};
pub use scanner::{FileScanState, ImportContext, RegionScanner, ScanError};
