//! Domain models for the warm-up planner
//!
//! Contains the coverage search and catalog logic without any I/O concerns.

mod matrix;
mod selector;
mod search;
mod reducer;
mod catalog;
mod attempt;

pub use matrix::CoverageMatrix;
pub use selector::{candidate_pool, rarest_categories, select};
pub use search::{
    find_warmups, NodeState, SearchError, SearchForest, SearchNode, SearchParams,
    DEFAULT_MAX_MOVES, DEFAULT_MAX_OUT,
};
pub use reducer::{reduce, CandidateSet};
pub use catalog::{normalize_name, Catalog, CatalogError, CatalogIssue};
pub use attempt::{AttemptId, AttemptIdError, WarmupAttempt};
