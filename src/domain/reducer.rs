//! Candidate reduction
//!
//! Turns the raw list of completed search paths into an antichain of
//! minimal covering sets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A sorted, duplicate-free set of movement names that covers every category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet(Vec<String>);

impl CandidateSet {
    /// Normalizes a path of movement names (sorted, duplicates removed)
    pub fn new<I, S>(movements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = movements.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    pub fn movements(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, movement: &str) -> bool {
        self.0.binary_search_by(|m| m.as_str().cmp(movement)).is_ok()
    }

    /// True when every movement of `other` is also in `self`
    pub fn is_superset_of(&self, other: &CandidateSet) -> bool {
        other.0.iter().all(|m| self.contains(m))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl Ord for CandidateSet {
    /// Ascending cardinality, then lexicographic
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CandidateSet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Deduplicates candidates and removes every strict superset of another
/// candidate.
///
/// The result is ordered by ascending cardinality, then lexicographically,
/// independent of input order.
pub fn reduce(candidates: impl IntoIterator<Item = CandidateSet>) -> Vec<CandidateSet> {
    let mut candidates: Vec<CandidateSet> = candidates.into_iter().collect();
    candidates.sort();
    candidates.dedup();

    let mut by_size: BTreeMap<usize, Vec<CandidateSet>> = BTreeMap::new();
    for candidate in candidates {
        by_size.entry(candidate.len()).or_default().push(candidate);
    }

    // A set dominated by a removed set is also dominated by whatever removed
    // it, so comparing against survivors only is enough.
    let mut kept: Vec<CandidateSet> = Vec::new();
    for (_, group) in by_size {
        let survivors: Vec<_> = group
            .into_iter()
            .filter(|larger| !kept.iter().any(|smaller| larger.is_superset_of(smaller)))
            .collect();
        kept.extend(survivors);
    }

    kept
}
