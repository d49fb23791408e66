//! Warm-up planner CLI

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = warmup_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
