//! Project management
//!
//! Handles project initialization and provides access to the catalog and
//! history.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::catalog_file::load_catalog;
use super::config::PROJECT_DIR;
use super::{Config, HistoryStore};
use crate::domain::Catalog;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a warm-up project. Run 'warmup init' first.")]
    NotInProject,

    #[error("Catalog not found at {0}")]
    MissingCatalog(PathBuf),
}

const DEFAULT_CONFIG: &str = r#"# Warm-up planner configuration

# Catalog of warm-up and workout movements (toml, json or yaml)
catalog = "catalog.toml"

# Record every suggestion in history.jsonl
record_history = true

[search]
# Longest warm-up to accept
max_moves = 5

# Branching cap at the first level, reduced by one per level
max_out = 7

# Fix the random seed for reproducible suggestions
# seed = 42
"#;

const DEFAULT_CATALOG: &str = r#"# Warm-up movements and the categories they satisfy
[warmups]
"Air Squat" = ["Squat"]
"Good Morning" = ["Hinge"]
"PVC Pass Through" = ["Shoulder"]
"Overhead Squat" = ["Squat", "Overhead"]
"Inchworm" = ["Hinge", "Push"]
"Ring Row" = ["Pull"]

# Workout movements and the warm-ups linked to them
[workouts]
"Snatch" = ["Air Squat", "Good Morning", "PVC Pass Through", "Overhead Squat"]
"Deadlift" = ["Good Morning", "Inchworm"]
"Pull-up" = ["Ring Row", "PVC Pass Through"]
"#;

/// A warm-up project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path.
    ///
    /// Existing files are left untouched.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&project_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, project_dir.display())
        })?;

        let files = [
            ("config.toml", DEFAULT_CONFIG),
            ("catalog.toml", DEFAULT_CATALOG),
            ("history.jsonl", ""),
        ];

        for (name, content) in files {
            let path = project_dir.join(name);
            if !path.exists() {
                fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .warmup directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the configured catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.project_dir().join(&self.config.project.catalog)
    }

    /// Loads the configured catalog
    pub fn catalog(&self) -> Result<Catalog> {
        let path = self.catalog_path();
        if !path.is_file() {
            return Err(ProjectError::MissingCatalog(path).into());
        }
        load_catalog(&path)
    }

    /// Returns the attempt history store
    pub fn history(&self) -> HistoryStore {
        HistoryStore::for_project(&self.root)
    }
}
