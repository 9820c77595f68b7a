// Purpose: Define crate-level module surface for the gofix import rewriter.
// Inputs/Outputs: Exposes config, manifest, rewrite core, and tree walk for the binary and tests.
// Invariants: The rewrite core stays free of filesystem access except rewrite::file.
// Gotchas: Keep module wiring consistent with src/main.rs, which only forwards to cli::run_cli.

pub mod cli;
pub mod config;
pub mod error;
pub mod pkg;
pub mod rewrite;
pub mod walk;
