//! Catalog and coverage matrix files
//!
//! Both are plain mappings and can be written as TOML, JSON or YAML; the
//! format is chosen from the file extension.
//!
//! ```toml
//! [warmups]
//! "Air Squat" = ["Squat"]
//! "Good Morning" = ["Hinge"]
//!
//! [workouts]
//! "Back Squat" = ["Air Squat", "Good Morning"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{Catalog, CoverageMatrix};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
    Yaml,
}

impl FileFormat {
    /// Picks a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            _ => bail!(
                "Unsupported file format: {} (expected .toml, .json, .yaml or .yml)",
                path.display()
            ),
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        Ok(match self {
            FileFormat::Toml => toml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
            FileFormat::Yaml => serde_yaml::from_str(content)?,
        })
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            FileFormat::Toml => toml::to_string_pretty(value)?,
            FileFormat::Json => serde_json::to_string_pretty(value)?,
            FileFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

fn read<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}: {}", what, path.display()))?;

    format
        .parse(&content)
        .with_context(|| format!("Failed to parse {}: {}", what, path.display()))
}

/// Loads a catalog and normalizes its names
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog: Catalog = read(path, "catalog")?;
    Ok(catalog.normalized())
}

/// Writes a catalog in the format implied by `path`
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let content = FileFormat::from_path(path)?
        .render(catalog)
        .context("Failed to serialize catalog")?;

    fs::write(path, content).with_context(|| format!("Failed to write catalog: {}", path.display()))
}

/// Loads a coverage matrix (movement → list of categories)
pub fn load_matrix(path: &Path) -> Result<CoverageMatrix> {
    read(path, "coverage matrix")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_warmup("Air Squat", ["Squat"]);
        catalog.add_warmup("Good Morning", ["Hinge"]);
        catalog.add_workout("Back Squat", ["Air Squat", "Good Morning"]);
        catalog
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.toml")).unwrap(), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("a.JSON")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.yml")).unwrap(), FileFormat::Yaml);
        assert!(FileFormat::from_path(Path::new("a.csv")).is_err());
        assert!(FileFormat::from_path(Path::new("catalog")).is_err());
    }

    #[test]
    fn save_and_load_each_format() {
        let dir = TempDir::new().unwrap();
        let catalog = sample();

        for name in ["catalog.toml", "catalog.json", "catalog.yaml"] {
            let path = dir.path().join(name);
            save_catalog(&path, &catalog).unwrap();
            assert_eq!(load_catalog(&path).unwrap(), catalog, "{}", name);
        }
    }

    #[test]
    fn load_normalizes_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[warmups]
"air squat" = ["squat"]

[workouts]
"back  squat" = ["Air Squat"]
"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert!(catalog.warmups.contains_key("Air Squat"));
        assert!(catalog.workouts["Back Squat"].contains("Air Squat"));
    }

    #[test]
    fn load_matrix_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.yaml");
        fs::write(&path, "A: [cat1]\nB: [cat1, cat2]\n").unwrap();

        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.movement_count(), 2);
        assert_eq!(matrix.category_count(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let err = load_matrix(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_catalog(&path).is_err());
    }
}
