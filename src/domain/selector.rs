//! Rarity-biased candidate selection
//!
//! Picks the movements that help the least-represented categories, then
//! samples them down to a branching cap.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::matrix::CoverageMatrix;

/// Categories covered by the fewest movements.
///
/// Empty when the matrix has no categories.
pub fn rarest_categories(matrix: &CoverageMatrix) -> BTreeSet<&str> {
    let counts = matrix.category_counts();

    let min = match counts.values().min() {
        Some(min) => *min,
        None => return BTreeSet::new(),
    };

    counts
        .into_iter()
        .filter(|(_, count)| *count == min)
        .map(|(cat, _)| cat)
        .collect()
}

/// Movements covering at least one of the rarest categories, in matrix order
pub fn candidate_pool(matrix: &CoverageMatrix) -> Vec<&str> {
    let rarest = rarest_categories(matrix);

    matrix
        .rows()
        .filter(|(_, cats)| cats.iter().any(|c| rarest.contains(c.as_str())))
        .map(|(movement, _)| movement)
        .collect()
}

/// Selects at most `cap` movements from the candidate pool.
///
/// When the pool exceeds `cap`, a uniform sample of exactly `cap` movements
/// is drawn without replacement. A cap of zero selects nothing.
pub fn select<R: Rng + ?Sized>(matrix: &CoverageMatrix, cap: usize, rng: &mut R) -> Vec<String> {
    let pool = candidate_pool(matrix);

    if pool.len() <= cap {
        return pool.into_iter().map(str::to_string).collect();
    }

    pool.choose_multiple(rng, cap).map(|m| m.to_string()).collect()
}
