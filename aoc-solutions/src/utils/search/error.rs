//! Error types for the search engine

use thiserror::Error;

/// Internal search failures.
///
/// Running out of states is not an error; it is reported as
/// [`SearchOutcome::Exhausted`](super::SearchOutcome::Exhausted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Extraction from an empty frontier; the engine checks emptiness first, so this is a bug
    #[error("extract from an empty frontier")]
    EmptyFrontier,
    /// A parent index leads outside the node arena or back into the trail
    #[error("broken parent chain at node #{0}")]
    BrokenTrail(usize),
    /// Pruning ratio outside `(0, 1]`
    #[error("pruning ratio must be within (0, 1], got {0}")]
    InvalidPruneRatio(f64),
}
