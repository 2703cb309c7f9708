//! Trait-based definition of a search problem.

use std::hash::Hash;

/// Accumulated or incremental path cost.
pub type Cost = u32;

/// A candidate next state together with the cost of the step that reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor<S> {
    /// The state reached
    pub state: S,
    /// Cost of this single step (added to the parent's accumulated cost)
    pub cost: Cost,
}

impl<S> Successor<S> {
    /// A successor reached by one step of cost `cost`
    pub fn new(state: S, cost: Cost) -> Self {
        Self { state, cost }
    }

    /// A successor reached by one unit-cost step
    pub fn unit(state: S) -> Self {
        Self::new(state, 1)
    }
}

/// Score of a candidate within a tier (usually its elapsed time).
///
/// The engine keeps the best value seen per tier and drops candidates that
/// fall below a configured fraction of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    /// Candidates are only compared with others in the same tier
    pub tier: u32,
    /// Higher is better
    pub value: u64,
}

/// A best-first search problem.
///
/// Implement this trait to describe a state space: where it starts, how
/// states connect, how promising each state is and when the search is done.
/// The engine owns the frontier and the seen registry; implementors only
/// answer questions about individual states and never see engine internals.
///
/// # Type Parameters
///
/// - `State`: one point in the search space, never mutated once created
/// - `Key`: projection of a state used for duplicate detection; it must
///   include every component (phase, time, inventory) that makes two
///   states behave differently
/// - `Priority`: frontier ordering, lowest first
///
/// # Example
///
/// ```rust
/// use aoc_solutions::utils::search::{Cost, SearchConfig, SearchProblem, Successor, search};
///
/// /// Count from `0` up to `target` with steps of +1 or +3.
/// struct Counter { target: u32 }
///
/// impl SearchProblem for Counter {
///     type State = u32;
///     type Key = u32;
///     type Priority = Cost;
///
///     fn start_states(&self) -> Vec<u32> { vec![0] }
///
///     fn successors(&self, n: &u32) -> Vec<Successor<u32>> {
///         [n + 1, n + 3]
///             .into_iter()
///             .filter(|&m| m <= self.target)
///             .map(Successor::unit)
///             .collect()
///     }
///
///     fn priority(&self, _n: &u32, cost: Cost) -> Cost { cost }
///
///     fn is_goal(&self, n: &u32) -> bool { *n == self.target }
///
///     fn key(&self, n: &u32) -> u32 { *n }
/// }
///
/// let outcome = search(&Counter { target: 10 }, SearchConfig::default()).unwrap();
/// let solution = outcome.found().unwrap();
/// assert_eq!(solution.cost(), 4); // 3 + 3 + 3 + 1
/// assert_eq!(solution.path().len(), 5);
/// ```
pub trait SearchProblem {
    /// A point in the search space
    type State;
    /// Duplicate-detection key derived from a state
    type Key: Hash + Eq;
    /// Frontier ordering, lower explored first
    type Priority: Ord;

    /// States the search starts from; more than one gives a multi-source search.
    fn start_states(&self) -> Vec<Self::State>;

    /// Legal next states, each tagged with its step cost.
    fn successors(&self, state: &Self::State) -> Vec<Successor<Self::State>>;

    /// Frontier priority of `state` reached with accumulated cost `cost`.
    ///
    /// For shortest paths this is `cost` plus a consistent heuristic
    /// (`h(a) <= step(a, b) + h(b)` and zero at goals); the first goal popped
    /// is then optimal. An admissible but inconsistent heuristic is only
    /// exact if keys may be reopened, which neither [`SeenPolicy`] does.
    ///
    /// [`SeenPolicy`]: super::SeenPolicy
    fn priority(&self, state: &Self::State, cost: Cost) -> Self::Priority;

    /// Whether `state` terminates the search.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Duplicate-detection key of `state`.
    fn key(&self, state: &Self::State) -> Self::Key;

    /// Pruning bound of a candidate, consulted only when pruning is enabled.
    fn bound(&self, _state: &Self::State, _cost: Cost) -> Option<Bound> {
        None
    }
}
