//! Catalog CLI commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::Catalog;
use crate::storage::{load_catalog, save_catalog, Config, Project, ProjectError};

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Show warm-up movements and their categories
    Show {
        /// Catalog file to use instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check the catalog for dangling links and uncategorized movements
    Check {
        /// Catalog file to use instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Write the catalog to another file (format from its extension)
    Export {
        /// Destination file (.toml, .json, .yaml)
        path: PathBuf,

        /// Catalog file to use instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Add a warm-up movement, or add categories to an existing one
    AddWarmup {
        /// Warm-up movement name
        name: String,

        /// Categories the movement satisfies
        #[arg(required = true)]
        categories: Vec<String>,

        /// Catalog file to edit instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Link a workout movement to warm-ups already in the catalog
    Link {
        /// Workout movement name (created if missing)
        workout: String,

        /// Warm-up movements to link
        #[arg(required = true)]
        warmups: Vec<String>,

        /// Catalog file to edit instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Merge warm-ups and workouts from another catalog file
    Import {
        /// Source file (.toml, .json, .yaml)
        path: PathBuf,

        /// Catalog file to edit instead of the project's
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

pub fn run(cmd: CatalogCommands, output: &Output) -> Result<()> {
    match cmd {
        CatalogCommands::Show { catalog } => show(output, catalog.as_deref()),
        CatalogCommands::Check { catalog } => check(output, catalog.as_deref()),
        CatalogCommands::Export { path, catalog } => export(output, &path, catalog.as_deref()),
        CatalogCommands::AddWarmup {
            name,
            categories,
            catalog,
        } => add_warmup(output, &name, categories, catalog.as_deref()),
        CatalogCommands::Link {
            workout,
            warmups,
            catalog,
        } => link(output, &workout, &warmups, catalog.as_deref()),
        CatalogCommands::Import { path, catalog } => import(output, &path, catalog.as_deref()),
    }
}

/// Opens the enclosing project, if there is one
pub(super) fn current_project() -> Result<Option<Project>> {
    match Config::find_project_root() {
        Some(root) => Project::open(root).map(Some),
        None => Ok(None),
    }
}

/// Loads the catalog from `path`, or from the enclosing project
pub(super) fn resolve_catalog(
    output: &Output,
    path: Option<&Path>,
    project: Option<&Project>,
) -> Result<Catalog> {
    match (path, project) {
        (Some(path), _) => {
            output.verbose_ctx("catalog", &format!("Loading catalog from {}", path.display()));
            load_catalog(path)
        }
        (None, Some(project)) => {
            output.verbose_ctx(
                "catalog",
                &format!("Loading project catalog {}", project.catalog_path().display()),
            );
            project.catalog()
        }
        (None, None) => Err(ProjectError::NotInProject.into()),
    }
}

/// File that catalog edits are written back to
fn edit_target(path: Option<&Path>, project: Option<&Project>) -> Result<PathBuf> {
    match (path, project) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(project)) => Ok(project.catalog_path()),
        (None, None) => Err(ProjectError::NotInProject.into()),
    }
}

/// Loads the catalog, applies `edit`, and saves it back in place
fn edit_catalog(
    output: &Output,
    path: Option<&Path>,
    edit: impl FnOnce(&mut Catalog) -> Result<()>,
) -> Result<Catalog> {
    let project = current_project()?;
    let target = edit_target(path, project.as_ref())?;
    let mut catalog = resolve_catalog(output, path, project.as_ref())?;

    edit(&mut catalog)?;

    save_catalog(&target, &catalog).with_context(|| format!("Failed to save catalog to {}", target.display()))?;
    output.verbose_ctx("catalog", &format!("Saved {}", target.display()));

    Ok(catalog)
}

/// List workouts that have linked warm-ups
pub fn workouts(output: &Output, path: Option<&Path>) -> Result<()> {
    let project = current_project()?;
    let catalog = resolve_catalog(output, path, project.as_ref())?;
    let workouts = catalog.labelled_workouts();

    if output.is_json() {
        output.data(&workouts);
    } else if workouts.is_empty() {
        println!("No workouts with linked warm-ups.");
    } else {
        println!("Workouts ({}):", workouts.len());
        for workout in workouts {
            println!("  {}", workout);
        }
    }

    Ok(())
}

fn show(output: &Output, path: Option<&Path>) -> Result<()> {
    let project = current_project()?;
    let catalog = resolve_catalog(output, path, project.as_ref())?;

    if output.is_json() {
        output.data(&catalog);
        return Ok(());
    }

    println!(
        "Catalog: {} warm-ups, {} workouts, {} categories",
        catalog.warmups.len(),
        catalog.workouts.len(),
        catalog.categories().len()
    );
    println!();
    println!("{:<30} CATEGORIES", "WARM-UP");
    println!("{}", "-".repeat(70));
    for (warmup, cats) in &catalog.warmups {
        let cats: Vec<_> = cats.iter().map(String::as_str).collect();
        println!("{:<30} {}", warmup, cats.join(", "));
    }

    println!();
    println!("{:<30} WARM-UPS", "WORKOUT");
    println!("{}", "-".repeat(70));
    for (workout, links) in &catalog.workouts {
        let links: Vec<_> = links.iter().map(String::as_str).collect();
        println!("{:<30} {}", workout, links.join(", "));
    }

    Ok(())
}

fn check(output: &Output, path: Option<&Path>) -> Result<()> {
    let project = current_project()?;
    let catalog = resolve_catalog(output, path, project.as_ref())?;
    let issues = catalog.validate();

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": issues.is_empty(),
            "issues": issues,
        }));
    } else if issues.is_empty() {
        output.success("Catalog is valid");
    } else {
        println!("Catalog issues ({}):", issues.len());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Catalog has {} issue(s)", issues.len())
    }
}

fn export(output: &Output, path: &Path, source: Option<&Path>) -> Result<()> {
    let project = current_project()?;
    let catalog = resolve_catalog(output, source, project.as_ref())?;

    save_catalog(path, &catalog).with_context(|| format!("Failed to export catalog to {}", path.display()))?;
    output.success(&format!("Exported catalog to {}", path.display()));

    Ok(())
}

fn add_warmup(output: &Output, name: &str, categories: Vec<String>, path: Option<&Path>) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Warm-up name cannot be empty");
    }

    let catalog = edit_catalog(output, path, |catalog| {
        catalog.add_warmup(name, categories);
        Ok(())
    })?;

    if let Some((name, cats)) = catalog.find_warmup(name) {
        let cats: Vec<_> = cats.iter().map(String::as_str).collect();
        if output.is_json() {
            output.data(&serde_json::json!({ "warmup": name, "categories": cats }));
        } else {
            output.success(&format!("Warm-up {}: {}", name, cats.join(", ")));
        }
    }

    Ok(())
}

fn link(output: &Output, workout: &str, warmups: &[String], path: Option<&Path>) -> Result<()> {
    if workout.trim().is_empty() {
        anyhow::bail!("Workout name cannot be empty");
    }

    let catalog = edit_catalog(output, path, |catalog| {
        let unknown: Vec<&str> = warmups
            .iter()
            .map(String::as_str)
            .filter(|w| catalog.find_warmup(w).is_none())
            .collect();
        if !unknown.is_empty() {
            anyhow::bail!(
                "Unknown warm-up movement(s): {}. Add them with 'warmup catalog add-warmup' first.",
                unknown.join(", ")
            );
        }

        catalog.add_workout(workout, warmups.iter().cloned());
        Ok(())
    })?;

    if let Some((workout, links)) = catalog.find_workout(workout) {
        let links: Vec<_> = links.iter().map(String::as_str).collect();
        if output.is_json() {
            output.data(&serde_json::json!({ "workout": workout, "warmups": links }));
        } else {
            output.success(&format!("Workout {}: {}", workout, links.join(", ")));
        }
    }

    Ok(())
}

fn import(output: &Output, source: &Path, path: Option<&Path>) -> Result<()> {
    let incoming = load_catalog(source).with_context(|| format!("Failed to import {}", source.display()))?;

    let catalog = edit_catalog(output, path, |catalog| {
        catalog.merge(&incoming);
        Ok(())
    })?;
    let issues = catalog.validate();

    if output.is_json() {
        output.data(&serde_json::json!({
            "imported_warmups": incoming.warmups.len(),
            "imported_workouts": incoming.workouts.len(),
            "issues": issues,
        }));
    } else {
        output.success(&format!(
            "Imported {} warm-ups and {} workouts from {}",
            incoming.warmups.len(),
            incoming.workouts.len(),
            source.display()
        ));
        if !issues.is_empty() {
            println!("Catalog issues ({}), see 'warmup catalog check':", issues.len());
            for issue in &issues {
                println!("  - {}", issue);
            }
        }
    }

    Ok(())
}
