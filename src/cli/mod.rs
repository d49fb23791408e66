//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create a `.warmup/` project with a sample catalog |
//! | `workouts` | List workouts that have linked warm-ups |
//! | `suggest` | Suggest a warm-up for selected workouts |
//! | `solve` | Run the coverage search on a matrix file |
//! | `catalog` | `show`, `check` and `export` the catalog |
//! | `history` | Show past attempts |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, including search progress:
//! ```bash
//! warmup --verbose suggest Snatch
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod catalog_cmd;
mod history_cmd;
mod solve;
mod suggest;

pub use app::{make_rng, run, Cli, Commands, SearchArgs};
pub use output::{Output, OutputFormat};
