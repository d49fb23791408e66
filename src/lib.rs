//! Warm-up planner
//!
//! Recommends short warm-ups whose movements together cover every movement
//! category a workout needs, using as few movements as possible. The core is
//! a bounded, rarity-biased coverage search over a movement → category
//! matrix; around it sit a movement catalog, attempt history and a CLI.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{find_warmups, CandidateSet, Catalog, CoverageMatrix, SearchError, SearchParams};
