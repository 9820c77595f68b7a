// Purpose: Binary entry for gofix.
// Inputs/Outputs: Reads process args and returns the process exit code from the CLI dispatcher.
// Invariants: Main must not bypass centralized CLI argument/diagnostic handling.

fn main() {
    let code = gofix::cli::run_cli(std::env::args().skip(1));
    std::process::exit(code);
}
