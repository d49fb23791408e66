//! Coverage search
//!
//! Grows a forest of candidate warm-up paths level by level. Each frontier
//! node is expanded with the rarity selector against the residual matrix of
//! its own path, with a branching cap that shrinks by one per level. Paths
//! whose residual has no categories left are recorded as candidates.
//!
//! The forest lives in a petgraph arena: nodes are addressed by
//! [`NodeIndex`], carry their parent index, and are linked parent → child.

use petgraph::graph::{DiGraph, NodeIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::matrix::CoverageMatrix;
use super::reducer::{reduce, CandidateSet};
use super::selector;

/// Default longest warm-up accepted
pub const DEFAULT_MAX_MOVES: usize = 5;

/// Default branching cap for the root level
pub const DEFAULT_MAX_OUT: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("No candidate movements: the coverage matrix has no movements or no categories")]
    NoCandidates,

    #[error("No warm-up found covering every category with at most {max_moves} movements")]
    BudgetExhausted { max_moves: usize },

    #[error("Invalid search parameter: {0}")]
    InvalidParameter(String),
}

/// Bounds for one search invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of movements in a warm-up
    pub max_moves: usize,

    /// Branching cap at the root level, decremented per level
    pub max_out: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            max_out: DEFAULT_MAX_OUT,
        }
    }
}

impl SearchParams {
    pub fn new(max_moves: usize, max_out: usize) -> Self {
        Self { max_moves, max_out }
    }

    /// Rejects bounds that cannot produce a search
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_moves < 1 {
            return Err(SearchError::InvalidParameter(format!(
                "max_moves must be at least 1, got {}",
                self.max_moves
            )));
        }
        if self.max_out < 1 {
            return Err(SearchError::InvalidParameter(format!(
                "max_out must be at least 1, got {}",
                self.max_out
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a search node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Frontier,
    Expanded,
    Completed,
    Abandoned,
}

impl NodeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeState::Completed | NodeState::Abandoned)
    }
}

/// One movement choice in the forest
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub movement: String,

    /// 1-based level
    pub depth: usize,

    /// Non-owning back-reference; `None` for roots
    pub parent: Option<NodeIndex>,

    pub state: NodeState,
}

/// The forest grown by one search invocation
#[derive(Debug, Default)]
pub struct SearchForest {
    graph: DiGraph<SearchNode, ()>,
    completed: Vec<CandidateSet>,
}

impl SearchForest {
    /// Runs the level-by-level search over `matrix`.
    ///
    /// Succeeds even when nothing was completed; see [`find_warmups`] for
    /// the call that treats an empty outcome as a failure.
    pub fn grow<R: Rng + ?Sized>(
        matrix: &CoverageMatrix,
        params: SearchParams,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        params.validate()?;

        if matrix.is_empty() {
            return Err(SearchError::NoCandidates);
        }

        let mut forest = Self::default();
        let mut cap = params.max_out;

        let roots = selector::select(matrix, cap, rng);
        debug!(roots = roots.len(), cap, "seeded search roots");
        for movement in roots {
            forest.add_node(movement, None);
        }

        let terminal = params.max_moves + 1;
        let mut counter = 0;
        let mut level = 2;
        let mut updating = true;

        while updating && level <= terminal {
            updating = false;
            cap = cap.saturating_sub(1);

            let frontier_end = forest.graph.node_count();
            debug!(level, cap, frontier = frontier_end - counter, "expanding level");

            for idx in (counter..frontier_end).map(NodeIndex::new) {
                let path = forest.path(idx);
                let residual = matrix.residual(&path);

                if residual.is_covered() {
                    trace!(?path, "path covers every category");
                    forest.set_state(idx, NodeState::Completed);
                    forest.completed.push(CandidateSet::new(path));
                } else if level == terminal {
                    trace!(?path, "movement budget exhausted");
                    forest.set_state(idx, NodeState::Abandoned);
                } else {
                    let children = selector::select(&residual, cap, rng);
                    if children.is_empty() {
                        forest.set_state(idx, NodeState::Abandoned);
                        continue;
                    }

                    for movement in children {
                        forest.add_node(movement, Some(idx));
                    }
                    forest.set_state(idx, NodeState::Expanded);
                    updating = true;
                }
            }

            counter = frontier_end;
            level += 1;
        }

        debug!(
            nodes = forest.len(),
            completed = forest.completed.len(),
            "search finished"
        );

        Ok(forest)
    }

    fn add_node(&mut self, movement: String, parent: Option<NodeIndex>) -> NodeIndex {
        let depth = parent
            .and_then(|p| self.graph.node_weight(p))
            .map_or(1, |p| p.depth + 1);

        let idx = self.graph.add_node(SearchNode {
            movement,
            depth,
            parent,
            state: NodeState::Frontier,
        });

        if let Some(parent) = parent {
            self.graph.add_edge(parent, idx, ());
        }

        idx
    }

    fn set_state(&mut self, idx: NodeIndex, state: NodeState) {
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.state = state;
        }
    }

    /// Movement names from `idx` up to its root
    pub fn path(&self, idx: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(idx);

        while let Some(node) = current.and_then(|i| self.graph.node_weight(i)) {
            path.push(node.movement.clone());
            current = node.parent;
        }

        path
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&SearchNode> {
        self.graph.node_weight(idx)
    }

    /// Root nodes, in creation order
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|idx| self.graph[*idx].parent.is_none())
            .collect()
    }

    /// Direct children of a node
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<_> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Number of nodes created
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Deepest level reached
    pub fn depth(&self) -> usize {
        self.graph
            .node_weights()
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Completed paths in the order they were found, before reduction
    pub fn completed(&self) -> &[CandidateSet] {
        &self.completed
    }

    pub fn into_completed(self) -> Vec<CandidateSet> {
        self.completed
    }
}

/// Finds minimal warm-ups covering every category of `matrix`.
///
/// Returns a non-empty antichain ordered by size, then name.
pub fn find_warmups<R: Rng + ?Sized>(
    matrix: &CoverageMatrix,
    params: SearchParams,
    rng: &mut R,
) -> Result<Vec<CandidateSet>, SearchError> {
    let forest = SearchForest::grow(matrix, params, rng)?;

    if forest.completed().is_empty() {
        return Err(SearchError::BudgetExhausted {
            max_moves: params.max_moves,
        });
    }

    Ok(reduce(forest.into_completed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn names(sets: &[CandidateSet]) -> Vec<Vec<String>> {
        sets.iter().map(|s| s.movements().to_vec()).collect()
    }

    #[test]
    fn single_movement_single_category() {
        let matrix = CoverageMatrix::new([("A", vec!["cat1"])]);
        let result = find_warmups(&matrix, SearchParams::new(1, 7), &mut rng()).unwrap();
        assert_eq!(names(&result), vec![vec!["A".to_string()]]);
    }

    #[test]
    fn disjoint_movements_are_combined() {
        let matrix = CoverageMatrix::new([("A", vec!["cat1"]), ("B", vec!["cat2"])]);
        let result = find_warmups(&matrix, SearchParams::new(2, 7), &mut rng()).unwrap();
        assert_eq!(result, vec![CandidateSet::new(["A", "B"])]);
    }

    #[test]
    fn redundant_movements_are_reduced_away() {
        let matrix = CoverageMatrix::new([
            ("A", vec!["cat1"]),
            ("B", vec!["cat1", "cat2"]),
            ("C", vec!["cat2"]),
        ]);
        let result = find_warmups(&matrix, SearchParams::new(2, 7), &mut rng()).unwrap();

        assert_eq!(result[0], CandidateSet::new(["B"]));
        assert!(!result.contains(&CandidateSet::new(["A", "B"])));
        assert!(!result.contains(&CandidateSet::new(["B", "C"])));
        assert!(!result.contains(&CandidateSet::new(["A", "B", "C"])));
        assert_eq!(result, vec![CandidateSet::new(["B"]), CandidateSet::new(["A", "C"])]);
    }

    #[test]
    fn raw_completions_include_supersets() {
        let matrix = CoverageMatrix::new([
            ("A", vec!["cat1"]),
            ("B", vec!["cat1", "cat2"]),
            ("C", vec!["cat2"]),
        ]);
        let forest = SearchForest::grow(&matrix, SearchParams::new(2, 7), &mut rng()).unwrap();

        assert!(forest.completed().contains(&CandidateSet::new(["B"])));
        assert!(forest.completed().contains(&CandidateSet::new(["A", "B"])));
    }

    #[test]
    fn unreachable_category_exhausts_budget() {
        let matrix = CoverageMatrix::with_categories(
            ["cat1", "cat2"],
            [("A", vec!["cat1"]), ("B", vec!["cat1"])],
        );
        let result = find_warmups(&matrix, SearchParams::new(3, 7), &mut rng());
        assert_eq!(result, Err(SearchError::BudgetExhausted { max_moves: 3 }));
    }

    #[test]
    fn too_few_moves_exhausts_budget() {
        let matrix = CoverageMatrix::new([("A", vec!["x"]), ("B", vec!["y"]), ("C", vec!["z"])]);
        let result = find_warmups(&matrix, SearchParams::new(2, 7), &mut rng());
        assert_eq!(result, Err(SearchError::BudgetExhausted { max_moves: 2 }));
    }

    #[test]
    fn empty_matrix_has_no_candidates() {
        let result = find_warmups(&CoverageMatrix::default(), SearchParams::default(), &mut rng());
        assert_eq!(result, Err(SearchError::NoCandidates));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let matrix = CoverageMatrix::new([("A", vec!["x"])]);

        let result = find_warmups(&matrix, SearchParams::new(0, 7), &mut rng());
        assert!(matches!(result, Err(SearchError::InvalidParameter(_))));

        let result = find_warmups(&matrix, SearchParams::new(3, 0), &mut rng());
        assert!(matches!(result, Err(SearchError::InvalidParameter(_))));
    }

    #[test]
    fn parameters_checked_before_matrix() {
        let result = find_warmups(&CoverageMatrix::default(), SearchParams::new(0, 0), &mut rng());
        assert!(matches!(result, Err(SearchError::InvalidParameter(_))));
    }

    #[test]
    fn paths_follow_parent_links() {
        let matrix = CoverageMatrix::new([("A", vec!["x"]), ("B", vec!["y"])]);
        let forest = SearchForest::grow(&matrix, SearchParams::new(2, 7), &mut rng()).unwrap();

        let roots = forest.roots();
        assert_eq!(roots.len(), 2);

        for root in roots {
            let root_node = forest.node(root).unwrap();
            assert_eq!(root_node.depth, 1);
            assert_eq!(root_node.state, NodeState::Expanded);

            let children = forest.children(root);
            assert_eq!(children.len(), 1);

            let child = forest.node(children[0]).unwrap();
            assert_eq!(child.depth, 2);
            assert_eq!(child.parent, Some(root));
            assert_eq!(child.state, NodeState::Completed);

            let path = forest.path(children[0]);
            assert_eq!(path, vec![child.movement.clone(), root_node.movement.clone()]);
        }
    }

    #[test]
    fn nodes_end_in_terminal_states() {
        let matrix = CoverageMatrix::new([
            ("A", vec!["x", "y"]),
            ("B", vec!["y", "z"]),
            ("C", vec!["z", "w"]),
            ("D", vec!["w", "x"]),
        ]);
        let forest = SearchForest::grow(&matrix, SearchParams::new(3, 7), &mut rng()).unwrap();

        for idx in forest.graph.node_indices() {
            let node = forest.node(idx).unwrap();
            if node.state == NodeState::Expanded {
                assert!(!forest.children(idx).is_empty());
            } else {
                assert!(node.state.is_terminal(), "{} left on frontier", node.movement);
            }
        }
    }

    #[test]
    fn depth_never_exceeds_max_moves() {
        let rows: Vec<_> = (0..8).map(|i| (format!("M{}", i), vec![format!("c{}", i)])).collect();
        let matrix = CoverageMatrix::new(rows);
        let forest = SearchForest::grow(&matrix, SearchParams::new(3, 7), &mut rng()).unwrap();

        assert!(forest.depth() <= 3);
        assert!(forest.completed().is_empty());
    }

    #[test]
    fn branching_cap_shrinks_per_level() {
        // Ten interchangeable movements for each of three categories
        let rows: Vec<_> = (0..30)
            .map(|i| (format!("M{:02}", i), vec![format!("c{}", i % 3)]))
            .collect();
        let matrix = CoverageMatrix::new(rows);
        let forest = SearchForest::grow(&matrix, SearchParams::new(3, 4), &mut rng()).unwrap();

        let roots = forest.roots();
        assert_eq!(roots.len(), 4);
        for root in &roots {
            let children = forest.children(*root);
            assert_eq!(children.len(), 3);
            for child in children {
                assert_eq!(forest.children(child).len(), 2);
            }
        }
        assert_eq!(forest.completed().len(), 4 * 3 * 2);
    }

    #[test]
    fn same_seed_same_result() {
        let rows: Vec<_> = (0..12)
            .map(|i| (format!("M{}", i), vec![format!("c{}", i % 4), format!("c{}", (i + 1) % 5)]))
            .collect();
        let matrix = CoverageMatrix::new(rows);

        let a = find_warmups(&matrix, SearchParams::default(), &mut StdRng::seed_from_u64(11));
        let b = find_warmups(&matrix, SearchParams::default(), &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
