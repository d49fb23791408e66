//! Coverage matrix
//!
//! Immutable snapshot mapping each candidate warm-up movement to the
//! movement categories it satisfies. Residual matrices are derived as new
//! snapshots; the source matrix is never mutated.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Movement name → satisfied categories, plus the category universe.
///
/// Serialized as the plain row mapping. The universe is rebuilt from the
/// rows on load, so categories no row covers (only possible through
/// [`CoverageMatrix::with_categories`]) are not preserved by a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, BTreeSet<String>>", into = "BTreeMap<String, BTreeSet<String>>")]
pub struct CoverageMatrix {
    rows: BTreeMap<String, BTreeSet<String>>,
    categories: BTreeSet<String>,
}

impl CoverageMatrix {
    /// Builds a matrix whose universe is the union of all row categories.
    ///
    /// Rows with no categories are dropped.
    pub fn new<I, M, C, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (M, C)>,
        M: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: BTreeMap<String, BTreeSet<String>> = rows
            .into_iter()
            .map(|(movement, cats)| (movement.into(), cats.into_iter().map(Into::into).collect()))
            .filter(|(_, cats): &(String, BTreeSet<String>)| !cats.is_empty())
            .collect();

        let categories = rows.values().flatten().cloned().collect();

        Self { rows, categories }
    }

    /// Builds a matrix with an explicit category universe.
    ///
    /// Categories in the universe that no row covers are kept, which makes
    /// full coverage unreachable. Row categories outside the universe are
    /// added to it.
    pub fn with_categories<I, M, C, S, U>(universe: U, rows: I) -> Self
    where
        I: IntoIterator<Item = (M, C)>,
        M: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
        U: IntoIterator<Item = S>,
    {
        let mut matrix = Self::new(rows);
        matrix.categories.extend(universe.into_iter().map(Into::into));
        matrix
    }

    /// The category universe of this matrix
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Movement names, in sorted order
    pub fn movements(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Categories covered by a movement, if it is in the matrix
    pub fn coverage(&self, movement: &str) -> Option<&BTreeSet<String>> {
        self.rows.get(movement)
    }

    /// Iterates over (movement, coverage) rows
    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.rows.iter().map(|(m, c)| (m.as_str(), c))
    }

    /// Number of movement rows
    pub fn movement_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of categories in the universe
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// True when there are no movements or no categories left
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.categories.is_empty()
    }

    /// True when every category has been covered (nothing remains)
    pub fn is_covered(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of movements covering each category of the universe.
    ///
    /// Categories that no movement covers are reported with a count of zero.
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> =
            self.categories.iter().map(|c| (c.as_str(), 0)).collect();

        for cats in self.rows.values() {
            for cat in cats {
                if let Some(count) = counts.get_mut(cat.as_str()) {
                    *count += 1;
                }
            }
        }

        counts
    }

    /// Union of the categories covered by the given movements
    pub fn covered_by<'a, I, S>(&self, chosen: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        chosen
            .into_iter()
            .filter_map(|m| {
                let name: &str = m.as_ref();
                self.rows.get(name)
            })
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns what is left to cover after choosing `chosen`.
    ///
    /// The residual keeps only unchosen movements and uncovered categories,
    /// and drops rows that end up with no categories. Uncovered categories
    /// stay in the universe even if no remaining row covers them.
    pub fn residual<S: AsRef<str>>(&self, chosen: &[S]) -> CoverageMatrix {
        let covered = self.covered_by(chosen.iter());
        let chosen: BTreeSet<&str> = chosen.iter().map(AsRef::as_ref).collect();

        let categories: BTreeSet<String> = self.categories.difference(&covered).cloned().collect();

        let rows = self
            .rows
            .iter()
            .filter(|(movement, _)| !chosen.contains(movement.as_str()))
            .map(|(movement, cats)| {
                let remaining: BTreeSet<String> = cats.intersection(&categories).cloned().collect();
                (movement.clone(), remaining)
            })
            .filter(|(_, remaining)| !remaining.is_empty())
            .collect();

        CoverageMatrix { rows, categories }
    }

    /// True when the given movements together cover the whole universe
    pub fn is_covered_by<S: AsRef<str>>(&self, chosen: &[S]) -> bool {
        self.covered_by(chosen.iter()).is_superset(&self.categories)
    }
}

impl From<BTreeMap<String, BTreeSet<String>>> for CoverageMatrix {
    fn from(rows: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self::new(rows)
    }
}

/// Keeps only the rows; uncovered universe categories are dropped
impl From<CoverageMatrix> for BTreeMap<String, BTreeSet<String>> {
    fn from(matrix: CoverageMatrix) -> Self {
        matrix.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoverageMatrix {
        CoverageMatrix::new([
            ("Air Squat", vec!["Squat"]),
            ("Inchworm", vec!["Hinge", "Push"]),
            ("Ring Row", vec!["Pull"]),
            ("Empty", vec![]),
        ])
    }

    #[test]
    fn universe_is_union_of_rows() {
        let matrix = sample();
        let cats: Vec<_> = matrix.categories().iter().map(String::as_str).collect();
        assert_eq!(cats, vec!["Hinge", "Pull", "Push", "Squat"]);
    }

    #[test]
    fn empty_rows_are_dropped() {
        let matrix = sample();
        assert_eq!(matrix.movement_count(), 3);
        assert!(matrix.coverage("Empty").is_none());
    }

    #[test]
    fn residual_removes_chosen_and_covered() {
        let matrix = sample();
        let residual = matrix.residual(&["Inchworm"]);

        assert!(residual.coverage("Inchworm").is_none());
        assert!(!residual.categories().contains("Hinge"));
        assert!(!residual.categories().contains("Push"));
        assert_eq!(residual.category_count(), 2);
        assert_eq!(residual.movement_count(), 2);
    }

    #[test]
    fn residual_drops_rows_left_without_categories() {
        let matrix = CoverageMatrix::new([("A", vec!["x"]), ("B", vec!["x", "y"]), ("C", vec!["y"])]);
        let residual = matrix.residual(&["B"]);

        assert!(residual.is_covered());
        assert!(residual.is_empty());
        assert_eq!(residual.movement_count(), 0);
    }

    #[test]
    fn residual_does_not_mutate_source() {
        let matrix = sample();
        let before = matrix.clone();
        let _ = matrix.residual(&["Air Squat", "Ring Row"]);
        assert_eq!(matrix, before);
    }

    #[test]
    fn uncoverable_category_survives_residual() {
        let matrix = CoverageMatrix::with_categories(["x", "y"], [("A", vec!["x"])]);
        let residual = matrix.residual(&["A"]);

        assert!(!residual.is_covered());
        assert!(residual.is_empty());
        assert_eq!(residual.category_counts().get("y"), Some(&0));
    }

    #[test]
    fn category_counts() {
        let matrix = CoverageMatrix::new([("A", vec!["x"]), ("B", vec!["x", "y"])]);
        let counts = matrix.category_counts();
        assert_eq!(counts.get("x"), Some(&2));
        assert_eq!(counts.get("y"), Some(&1));
    }

    #[test]
    fn is_covered_by() {
        let matrix = sample();
        assert!(matrix.is_covered_by(&["Air Squat", "Inchworm", "Ring Row"]));
        assert!(!matrix.is_covered_by(&["Air Squat", "Ring Row"]));
    }

    #[test]
    fn deserializes_from_mapping() {
        let json = r#"{"A": ["x"], "B": ["y", "x"]}"#;
        let matrix: CoverageMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(matrix.movement_count(), 2);
        assert_eq!(matrix.category_count(), 2);
    }

    #[test]
    fn serialized_form_drops_uncovered_universe_categories() {
        let matrix = CoverageMatrix::with_categories(["x", "y"], [("A", vec!["x"])]);
        assert!(!matrix.is_covered_by(&["A"]));

        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"A":["x"]}"#);

        let reloaded: CoverageMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.category_count(), 1);
        assert!(reloaded.is_covered_by(&["A"]));
    }
}
