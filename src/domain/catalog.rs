//! Movement catalog
//!
//! Warm-up movements tagged with the categories they satisfy, and workout
//! movements linked to the warm-ups that prepare for them. The catalog is
//! where coverage matrices come from.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::matrix::CoverageMatrix;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No workout movements selected")]
    NoWorkouts,

    #[error("Unknown workout movement: {0}")]
    UnknownWorkout(String),

    #[error("Workout '{workout}' links unknown warm-up movement '{warmup}'")]
    UnknownWarmup { workout: String, warmup: String },
}

/// Normalizes a movement or category name.
///
/// Words are title-cased unless written fully in upper case, and runs of
/// whitespace collapse to a single space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            if word.chars().any(char::is_alphabetic) && word == word.to_uppercase() {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lookup key: the normalized name with case folded away
fn lookup_key(name: &str) -> String {
    normalize_name(name).to_lowercase()
}

/// Warm-up and workout movements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Warm-up movement → categories it satisfies
    pub warmups: BTreeMap<String, BTreeSet<String>>,

    /// Workout movement → linked warm-up movements
    pub workouts: BTreeMap<String, BTreeSet<String>>,
}

/// A problem found by [`Catalog::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogIssue {
    DanglingLink { workout: String, warmup: String },
    UncategorizedWarmup { warmup: String },
    UnlinkedWorkout { workout: String },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::DanglingLink { workout, warmup } => {
                write!(f, "workout '{}' links unknown warm-up '{}'", workout, warmup)
            }
            CatalogIssue::UncategorizedWarmup { warmup } => {
                write!(f, "warm-up '{}' has no categories", warmup)
            }
            CatalogIssue::UnlinkedWorkout { workout } => {
                write!(f, "workout '{}' has no linked warm-ups", workout)
            }
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with every movement and category name normalized
    pub fn normalized(&self) -> Self {
        let normalize_set =
            |set: &BTreeSet<String>| set.iter().map(|n| normalize_name(n)).collect::<BTreeSet<_>>();

        let mut warmups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, cats) in &self.warmups {
            warmups
                .entry(normalize_name(name))
                .or_default()
                .extend(normalize_set(cats));
        }

        let mut workouts: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, links) in &self.workouts {
            workouts
                .entry(normalize_name(name))
                .or_default()
                .extend(normalize_set(links));
        }

        Self { warmups, workouts }
    }

    /// Adds or extends a warm-up movement, reusing an existing spelling
    pub fn add_warmup<S: Into<String>>(&mut self, name: &str, categories: impl IntoIterator<Item = S>) {
        let key = entry_key(&self.warmups, name);
        let categories: Vec<String> = categories
            .into_iter()
            .map(|c| {
                let c: String = c.into();
                normalize_name(&c)
            })
            .collect();
        self.warmups.entry(key).or_default().extend(categories);
    }

    /// Adds or extends a workout movement, reusing an existing spelling.
    ///
    /// Links to known warm-ups take the warm-up's catalog spelling.
    pub fn add_workout<S: Into<String>>(&mut self, name: &str, warmups: impl IntoIterator<Item = S>) {
        let key = entry_key(&self.workouts, name);
        let links: Vec<String> = warmups
            .into_iter()
            .map(|w| {
                let w: String = w.into();
                entry_key(&self.warmups, &w)
            })
            .collect();
        self.workouts.entry(key).or_default().extend(links);
    }

    /// Merges another catalog into this one, normalizing its names
    pub fn merge(&mut self, other: &Catalog) {
        for (name, cats) in &other.warmups {
            self.add_warmup(name, cats.iter().cloned());
        }
        for (name, links) in &other.workouts {
            self.add_workout(name, links.iter().cloned());
        }
    }

    /// Looks up a workout by name, ignoring case and spacing differences
    pub fn find_workout(&self, name: &str) -> Option<(&str, &BTreeSet<String>)> {
        find_entry(&self.workouts, name)
    }

    /// Looks up a warm-up by name, ignoring case and spacing differences
    pub fn find_warmup(&self, name: &str) -> Option<(&str, &BTreeSet<String>)> {
        find_entry(&self.warmups, name)
    }

    /// Workouts that have at least one linked warm-up, sorted by name
    pub fn labelled_workouts(&self) -> Vec<&str> {
        self.workouts
            .iter()
            .filter(|(_, links)| !links.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Resolves selected workout names to their catalog spelling
    pub fn resolve_workouts<S: AsRef<str>>(&self, selected: &[S]) -> Result<Vec<String>, CatalogError> {
        let mut resolved: Vec<String> = Vec::new();

        for name in selected {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            let (key, _) = self
                .find_workout(name)
                .ok_or_else(|| CatalogError::UnknownWorkout(name.trim().to_string()))?;
            if !resolved.iter().any(|r| r == key) {
                resolved.push(key.to_string());
            }
        }

        if resolved.is_empty() {
            return Err(CatalogError::NoWorkouts);
        }

        Ok(resolved)
    }

    /// Builds the coverage matrix for a workout selection.
    ///
    /// Rows are the warm-ups linked to any selected workout; warm-ups with no
    /// categories are left out.
    pub fn coverage_for<S: AsRef<str>>(&self, selected: &[S]) -> Result<CoverageMatrix, CatalogError> {
        let workouts = self.resolve_workouts(selected)?;

        let mut rows: BTreeMap<&str, &BTreeSet<String>> = BTreeMap::new();
        for workout in &workouts {
            let links = self
                .workouts
                .get(workout)
                .ok_or_else(|| CatalogError::UnknownWorkout(workout.clone()))?;

            for warmup in links {
                let (name, cats) = self.find_warmup(warmup).ok_or_else(|| CatalogError::UnknownWarmup {
                    workout: workout.clone(),
                    warmup: warmup.clone(),
                })?;
                rows.insert(name, cats);
            }
        }

        Ok(CoverageMatrix::new(
            rows.into_iter().map(|(name, cats)| (name, cats.iter().cloned())),
        ))
    }

    /// Lists structural problems in the catalog
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for (workout, links) in &self.workouts {
            if links.is_empty() {
                issues.push(CatalogIssue::UnlinkedWorkout {
                    workout: workout.clone(),
                });
            }
            for warmup in links {
                if self.find_warmup(warmup).is_none() {
                    issues.push(CatalogIssue::DanglingLink {
                        workout: workout.clone(),
                        warmup: warmup.clone(),
                    });
                }
            }
        }

        for (warmup, cats) in &self.warmups {
            if cats.is_empty() {
                issues.push(CatalogIssue::UncategorizedWarmup {
                    warmup: warmup.clone(),
                });
            }
        }

        issues
    }

    /// Every category used by some warm-up
    pub fn categories(&self) -> BTreeSet<&str> {
        self.warmups.values().flatten().map(String::as_str).collect()
    }
}

/// Existing key matching `name`, or its normalized spelling
fn entry_key(entries: &BTreeMap<String, BTreeSet<String>>, name: &str) -> String {
    match find_entry(entries, name) {
        Some((key, _)) => key.to_string(),
        None => normalize_name(name),
    }
}

fn find_entry<'a>(
    entries: &'a BTreeMap<String, BTreeSet<String>>,
    name: &str,
) -> Option<(&'a str, &'a BTreeSet<String>)> {
    entries
        .get_key_value(name)
        .or_else(|| {
            let wanted = lookup_key(name);
            entries.iter().find(|(key, _)| lookup_key(key) == wanted)
        })
        .map(|(key, set)| (key.as_str(), set))
}
