//! The best-first search loop.

use std::collections::HashMap;

use log::{debug, trace};

use super::error::SearchError;
use super::frontier::Frontier;
use super::problem::{Bound, Cost, SearchProblem};
use super::seen::SeenRegistry;

// ============================================================================
// Configuration
// ============================================================================

/// When a state's key enters the seen registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeenPolicy {
    /// Mark when a state is expanded. Exact for consistent heuristics, at the
    /// cost of holding duplicate entries in the frontier.
    #[default]
    OnExpand,
    /// Mark when a state is scheduled. Keeps the frontier small; exact only
    /// when the key already determines the accumulated cost.
    OnSchedule,
}

/// Fraction of the best bound in a tier below which candidates are dropped.
///
/// Always within `(0, 1]`. Higher ratios prune harder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneRatio(f64);

impl PruneRatio {
    /// Keep candidates whose bound is at least half of the tier's best
    pub const HALF: PruneRatio = PruneRatio(0.5);

    /// Validate `ratio`.
    pub fn new(ratio: f64) -> Result<Self, SearchError> {
        if ratio.is_finite() && ratio > 0.0 && ratio <= 1.0 {
            Ok(Self(ratio))
        } else {
            Err(SearchError::InvalidPruneRatio(ratio))
        }
    }

    /// The raw ratio
    pub fn get(self) -> f64 {
        self.0
    }

    fn rejects(self, value: u64, best: u64) -> bool {
        (value as f64) < self.0 * best as f64
    }
}

impl Default for PruneRatio {
    fn default() -> Self {
        Self::HALF
    }
}

/// Engine settings for one search.
///
/// ```
/// use aoc_solutions::utils::search::{PruneRatio, SearchConfig, SeenPolicy};
///
/// let config = SearchConfig::default()
///     .with_policy(SeenPolicy::OnSchedule)
///     .with_prune(PruneRatio::new(0.75).unwrap());
/// assert_eq!(config.prune.map(PruneRatio::get), Some(0.75));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchConfig {
    /// When keys are marked as seen
    pub policy: SeenPolicy,
    /// Per-tier pruning; `None` keeps every candidate
    pub prune: Option<PruneRatio>,
}

impl SearchConfig {
    /// Replace the seen policy
    pub fn with_policy(mut self, policy: SeenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable pruning with `ratio`
    pub fn with_prune(mut self, ratio: PruneRatio) -> Self {
        self.prune = Some(ratio);
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken off the frontier and expanded
    pub expanded: usize,
    /// Successors produced by the problem
    pub generated: usize,
    /// Entries dropped because their key was already seen
    pub skipped: usize,
    /// Successors dropped by the pruning bound
    pub pruned: usize,
    /// Largest frontier size reached
    pub peak_frontier: usize,
}

/// Lifecycle of a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Seeded, nothing expanded yet
    Ready,
    /// Expanding
    Running,
    /// A goal state was popped
    GoalFound,
    /// The frontier ran dry without reaching a goal
    Exhausted,
}

impl SearchStatus {
    /// Whether the search has stopped
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchStatus::GoalFound | SearchStatus::Exhausted)
    }
}

/// A goal state together with how it was reached.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    goal: S,
    // start..parent of goal
    trail: Vec<S>,
    cost: Cost,
    stats: SearchStats,
}

impl<S> Solution<S> {
    /// The goal state
    pub fn state(&self) -> &S {
        &self.goal
    }

    /// Accumulated cost of the goal
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Counters at the time the goal was found
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// States from the start state to the goal, both included
    pub fn path(&self) -> Vec<&S> {
        self.trail.iter().chain(std::iter::once(&self.goal)).collect()
    }

    /// Take the goal state
    pub fn into_state(self) -> S {
        self.goal
    }
}

/// How a search ended.
#[derive(Debug, Clone)]
pub enum SearchOutcome<S> {
    /// A goal was reached
    Found(Solution<S>),
    /// Every reachable state was explored (or pruned) without reaching a goal
    Exhausted(SearchStats),
}

impl<S> SearchOutcome<S> {
    /// The solution, if one was found
    pub fn found(self) -> Option<Solution<S>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            SearchOutcome::Exhausted(_) => None,
        }
    }

    /// Whether a goal was reached
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Final counters
    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found(solution) => &solution.stats,
            SearchOutcome::Exhausted(stats) => stats,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

struct Node<S> {
    state: S,
    cost: Cost,
    parent: Option<usize>,
}

/// A single best-first search over `P`.
///
/// Nodes live in an arena and refer to their parent by index; the frontier
/// only holds arena indices. Drive it with [`Search::step`] to impose an
/// external budget, or [`Search::run`] to finish.
///
/// ```
/// use aoc_solutions::utils::search::{Cost, Search, SearchConfig, SearchProblem, SearchStatus, Successor};
///
/// struct Line;
///
/// impl SearchProblem for Line {
///     type State = u8;
///     type Key = u8;
///     type Priority = Cost;
///
///     fn start_states(&self) -> Vec<u8> { vec![0] }
///     fn successors(&self, n: &u8) -> Vec<Successor<u8>> { vec![Successor::unit(n + 1)] }
///     fn priority(&self, _: &u8, cost: Cost) -> Cost { cost }
///     fn is_goal(&self, n: &u8) -> bool { *n == 3 }
///     fn key(&self, n: &u8) -> u8 { *n }
/// }
///
/// let mut search = Search::new(&Line, SearchConfig::default());
/// assert_eq!(search.status(), SearchStatus::Ready);
/// assert_eq!(search.step().unwrap(), SearchStatus::Running);
/// assert_eq!(search.stats().expanded, 1);
///
/// let solution = search.run().unwrap().found().unwrap();
/// assert_eq!(*solution.state(), 3);
/// ```
pub struct Search<'p, P: SearchProblem> {
    problem: &'p P,
    config: SearchConfig,
    arena: Vec<Node<P::State>>,
    frontier: Frontier<usize, P::Priority>,
    seen: SeenRegistry<P::Key>,
    best_bounds: HashMap<u32, u64>,
    stats: SearchStats,
    status: SearchStatus,
    goal: Option<usize>,
}

impl<'p, P: SearchProblem> Search<'p, P> {
    /// Seed a search with every start state of `problem`.
    pub fn new(problem: &'p P, config: SearchConfig) -> Self {
        let mut search = Self {
            problem,
            config,
            arena: Vec::new(),
            frontier: Frontier::new(),
            seen: SeenRegistry::new(),
            best_bounds: HashMap::new(),
            stats: SearchStats::default(),
            status: SearchStatus::Ready,
            goal: None,
        };

        for state in problem.start_states() {
            if search.config.policy == SeenPolicy::OnSchedule
                && !search.seen.mark_seen(problem.key(&state))
            {
                search.stats.skipped += 1;
                continue;
            }
            search.schedule(state, 0, None);
        }
        search
    }

    /// Current lifecycle state
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Counters so far
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pending frontier entries
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Pop and process one frontier entry.
    ///
    /// Popping a stale duplicate counts as a step. Once terminal, further
    /// calls return the terminal status unchanged.
    pub fn step(&mut self) -> Result<SearchStatus, SearchError> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        self.status = SearchStatus::Running;

        if self.frontier.is_empty() {
            self.status = SearchStatus::Exhausted;
            debug!("search exhausted: {:?}", self.stats);
            return Ok(self.status);
        }

        let index = self.frontier.extract_min()?.item;
        let node = &self.arena[index];

        if self.config.policy == SeenPolicy::OnExpand
            && !self.seen.mark_seen(self.problem.key(&node.state))
        {
            self.stats.skipped += 1;
            return Ok(self.status);
        }

        self.stats.expanded += 1;
        trace!(
            "expand #{index} cost={} frontier={}",
            node.cost,
            self.frontier.len()
        );

        if self.problem.is_goal(&node.state) {
            self.goal = Some(index);
            self.status = SearchStatus::GoalFound;
            debug!("goal found at cost {}: {:?}", node.cost, self.stats);
            return Ok(self.status);
        }

        let cost = node.cost;
        for successor in self.problem.successors(&node.state) {
            self.stats.generated += 1;

            let key = self.problem.key(&successor.state);
            if self.seen.is_seen(&key) {
                self.stats.skipped += 1;
                continue;
            }

            let next_cost = cost + successor.cost;
            if self.is_pruned(&successor.state, next_cost) {
                self.stats.pruned += 1;
                continue;
            }

            if self.config.policy == SeenPolicy::OnSchedule {
                self.seen.mark_seen(key);
            }
            self.schedule(successor.state, next_cost, Some(index));
        }

        Ok(self.status)
    }

    /// Step until the search stops.
    pub fn run(mut self) -> Result<SearchOutcome<P::State>, SearchError> {
        while !self.step()?.is_terminal() {}
        self.into_outcome()
    }

    fn schedule(&mut self, state: P::State, cost: Cost, parent: Option<usize>) {
        let priority = self.problem.priority(&state, cost);
        let index = self.arena.len();
        self.arena.push(Node {
            state,
            cost,
            parent,
        });
        self.frontier.insert(index, priority);
        self.stats.peak_frontier = self.frontier.peak();
    }

    fn is_pruned(&mut self, state: &P::State, cost: Cost) -> bool {
        let Some(ratio) = self.config.prune else {
            return false;
        };
        let Some(Bound { tier, value }) = self.problem.bound(state, cost) else {
            return false;
        };

        let best = self.best_bounds.entry(tier).or_insert(value);
        if ratio.rejects(value, *best) {
            return true;
        }
        *best = (*best).max(value);
        false
    }

    fn into_outcome(self) -> Result<SearchOutcome<P::State>, SearchError> {
        let Some(goal) = self.goal else {
            return Ok(SearchOutcome::Exhausted(self.stats));
        };
        let (trail, goal, cost) = unwind(self.arena, goal)?;
        Ok(SearchOutcome::Found(Solution {
            goal,
            trail,
            cost,
            stats: self.stats,
        }))
    }
}

/// Split the arena into the start..parent trail of `goal`, the goal state and its cost.
fn unwind<S>(arena: Vec<Node<S>>, goal: usize) -> Result<(Vec<S>, S, Cost), SearchError> {
    let cost = arena.get(goal).ok_or(SearchError::BrokenTrail(goal))?.cost;

    let mut chain = vec![goal];
    let mut cursor = arena[goal].parent;
    while let Some(index) = cursor {
        // A chain longer than the arena has a cycle
        if chain.len() >= arena.len() {
            return Err(SearchError::BrokenTrail(index));
        }
        chain.push(index);
        cursor = arena.get(index).ok_or(SearchError::BrokenTrail(index))?.parent;
    }

    let mut slots: Vec<Option<Node<S>>> = arena.into_iter().map(Some).collect();
    let mut trail = Vec::with_capacity(chain.len());
    for &index in chain.iter().rev() {
        let node = slots[index].take().ok_or(SearchError::BrokenTrail(index))?;
        trail.push(node.state);
    }
    let goal = trail.pop().ok_or(SearchError::BrokenTrail(goal))?;
    Ok((trail, goal, cost))
}

/// Run a search over `problem` to completion.
pub fn search<P: SearchProblem>(
    problem: &P,
    config: SearchConfig,
) -> Result<SearchOutcome<P::State>, SearchError> {
    Search::new(problem, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(state: char, cost: Cost, parent: Option<usize>) -> Node<char> {
        Node {
            state,
            cost,
            parent,
        }
    }

    #[test]
    fn test_unwind_follows_parents() {
        let arena = vec![
            node('a', 0, None),
            node('x', 9, Some(0)),
            node('b', 2, Some(0)),
            node('c', 3, Some(2)),
        ];
        assert_eq!(unwind(arena, 3), Ok((vec!['a', 'b'], 'c', 3)));
    }

    #[test]
    fn test_unwind_rejects_broken_chains() {
        let dangling = vec![node('a', 0, None), node('b', 1, Some(7))];
        assert_eq!(unwind(dangling, 1), Err(SearchError::BrokenTrail(7)));

        let cyclic = vec![node('a', 0, Some(1)), node('b', 1, Some(0))];
        assert!(matches!(unwind(cyclic, 1), Err(SearchError::BrokenTrail(_))));

        assert_eq!(unwind(vec![node('a', 0, None)], 4), Err(SearchError::BrokenTrail(4)));
    }
}
