//! Configuration handling for the warm-up planner
//!
//! Configuration is stored in `.warmup/config.toml` (project) and
//! `~/.config/warmup/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{SearchParams, DEFAULT_MAX_MOVES, DEFAULT_MAX_OUT};

/// Name of the project directory
pub const PROJECT_DIR: &str = ".warmup";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Search bounds and seeding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Longest warm-up to accept
    pub max_moves: usize,

    /// Branching cap at the first level
    pub max_out: usize,

    /// Fixed random seed; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            max_out: DEFAULT_MAX_OUT,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Search parameters with optional command-line overrides applied
    pub fn params(&self, max_moves: Option<usize>, max_out: Option<usize>) -> SearchParams {
        SearchParams::new(
            max_moves.unwrap_or(self.max_moves),
            max_out.unwrap_or(self.max_out),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.params(None, None)
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Catalog file, relative to the project directory
    pub catalog: String,

    /// Search settings
    pub search: SearchConfig,

    /// Record every suggestion in the history log
    pub record_history: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            catalog: "catalog.toml".to_string(),
            search: SearchConfig::default(),
            record_history: true,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Search settings used outside a project
    pub search: SearchConfig,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project_root = Self::find_project_root();
        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Search settings in effect: the project's inside a project, else global
    pub fn search(&self) -> &SearchConfig {
        if self.project_root.is_some() {
            &self.project.search
        } else {
            &self.global.search
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "warmup", "warmup-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads the global configuration, or defaults when there is none
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        let config: GlobalConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")?;

        config.search.validate().context("Invalid global config")?;
        Ok(config)
    }

    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        Self::parse_project_config(&content).context("Failed to parse project config")
    }

    /// Parses and validates project configuration
    pub fn parse_project_config(content: &str) -> Result<ProjectConfig, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.catalog.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog path is empty".to_string()));
        }
        config.search.validate()?;

        Ok(config)
    }

    /// Finds the project root by looking for a `.warmup/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(current)
    }

    /// Walks up from `start` looking for a `.warmup/` directory
    pub fn find_project_root_from(start: PathBuf) -> Option<PathBuf> {
        let mut current = start;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a warm-up project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a warm-up project. Run 'warmup init' first."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.search.max_moves, 5);
        assert_eq!(config.project.search.max_out, 7);
        assert_eq!(config.project.catalog, "catalog.toml");
        assert!(config.project.record_history);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
catalog = "movements.yaml"

[search]
max_moves = 4
seed = 42
"#;

        let config = Config::parse_project_config(toml).unwrap();
        assert_eq!(config.catalog, "movements.yaml");
        assert_eq!(config.search.max_moves, 4);
        assert_eq!(config.search.max_out, 7);
        assert_eq!(config.search.seed, Some(42));
        assert!(config.record_history);
    }

    #[test]
    fn empty_project_config_uses_defaults() {
        let config = Config::parse_project_config("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn invalid_search_bounds_rejected() {
        let toml = r#"
[search]
max_moves = 0
"#;
        let result = Config::parse_project_config(toml);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_config_rejected() {
        let result = Config::parse_project_config("search = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"

[search]
max_out = 5
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.search.max_out, 5);
        assert_eq!(config.search.max_moves, 5);
    }

    #[test]
    fn overrides_take_precedence() {
        let search = SearchConfig::default();
        let params = search.params(Some(3), None);
        assert_eq!(params, SearchParams::new(3, 7));
    }

    #[test]
    fn find_project_root_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root_from(sub_dir);
        // Canonicalize both paths to handle macOS /var -> /private/var symlinks
        let expected = dir.path().canonicalize().ok();
        let actual = root.and_then(|p| p.canonicalize().ok());
        assert_eq!(actual, expected);
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(!config.is_in_project());
        assert!(config.require_project_root().is_err());
    }
}
