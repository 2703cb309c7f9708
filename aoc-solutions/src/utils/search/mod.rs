//! Generic best-first search
//!
//! One engine drives every search-heavy puzzle: a problem describes its
//! state space through [`SearchProblem`], and [`Search`] explores it in
//! non-decreasing priority order until a goal is popped or nothing is left.
//!
//! # Building blocks
//!
//! - [`Frontier`]: min-priority queue, ties broken by insertion order
//! - [`SeenRegistry`]: keys already dealt with, marked per [`SeenPolicy`]
//! - [`Search`]: the loop itself, with an arena of nodes for path recovery
//!   and optional per-tier pruning via [`PruneRatio`]
//! - [`min_feasible`]: binary search over a monotone "reachable within T" predicate
//!
//! # Outcomes
//!
//! Running out of states is a normal result ([`SearchOutcome::Exhausted`]);
//! [`SearchError`] is reserved for broken engine invariants and bad configuration.
//!
//! # Example: grid shortest path
//!
//! ```rust
//! use aoc_solutions::utils::search::{Cost, SearchConfig, SearchProblem, Successor, search};
//!
//! /// 4x4 open grid from the top-left corner to the bottom-right one.
//! struct Open;
//!
//! impl SearchProblem for Open {
//!     type State = (i32, i32);
//!     type Key = (i32, i32);
//!     type Priority = (Cost, Cost);
//!
//!     fn start_states(&self) -> Vec<(i32, i32)> { vec![(0, 0)] }
//!
//!     fn successors(&self, &(r, c): &(i32, i32)) -> Vec<Successor<(i32, i32)>> {
//!         [(r + 1, c), (r - 1, c), (r, c + 1), (r, c - 1)]
//!             .into_iter()
//!             .filter(|&(r, c)| (0..4).contains(&r) && (0..4).contains(&c))
//!             .map(Successor::unit)
//!             .collect()
//!     }
//!
//!     // A* with Manhattan distance, fewer remaining steps first on ties
//!     fn priority(&self, &(r, c): &(i32, i32), cost: Cost) -> (Cost, Cost) {
//!         let h = (3 - r + 3 - c) as Cost;
//!         (cost + h, h)
//!     }
//!
//!     fn is_goal(&self, state: &(i32, i32)) -> bool { *state == (3, 3) }
//!
//!     fn key(&self, state: &(i32, i32)) -> (i32, i32) { *state }
//! }
//!
//! let solution = search(&Open, SearchConfig::default()).unwrap().found().unwrap();
//! assert_eq!(solution.cost(), 6);
//! assert_eq!(solution.stats().expanded, 7);
//! ```

mod bisect;
mod engine;
mod error;
mod frontier;
mod problem;
mod seen;

pub use bisect::{min_feasible, try_min_feasible};
pub use engine::{
    PruneRatio, Search, SearchConfig, SearchOutcome, SearchStats, SearchStatus, SeenPolicy,
    Solution, search,
};
pub use error::SearchError;
pub use frontier::{Frontier, FrontierEntry};
pub use problem::{Bound, Cost, SearchProblem, Successor};
pub use seen::SeenRegistry;

#[cfg(test)]
mod tests;
