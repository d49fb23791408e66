//! # Storage Layer
//!
//! Persistence layer for the warm-up planner with plain-text file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Catalog | TOML, JSON or YAML | `.warmup/catalog.toml` |
//! | History | JSONL (one attempt per line) | `.warmup/history.jsonl` |
//! | Config | TOML | `.warmup/config.toml` |
//!
//! ## Project Structure
//!
//! ```text
//! .warmup/
//! ├── config.toml      # Project configuration
//! ├── catalog.toml     # Warm-up and workout movements
//! └── history.jsonl    # Every suggestion attempt
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a warm-up project
//! - [`HistoryStore`] - Append/read attempts as JSONL, guarded by `fs2` locks
//! - [`Config`] - Project and global configuration

mod catalog_file;
mod config;
mod history;
mod project;

pub use catalog_file::{load_catalog, load_matrix, save_catalog, FileFormat};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, SearchConfig, PROJECT_DIR};
pub use history::HistoryStore;
pub use project::{Project, ProjectError};
