//! Tests for the search engine.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::HashSet;

use proptest::prelude::*;

use super::*;

/// Weighted directed graph over `0..nodes`.
struct Graph {
    adjacency: Vec<Vec<(usize, Cost)>>,
    starts: Vec<usize>,
    goal: usize,
    heuristic: Vec<Cost>,
    expansions: RefCell<Vec<usize>>,
}

impl Graph {
    fn new(nodes: usize, edges: &[(usize, usize, Cost)], starts: Vec<usize>, goal: usize) -> Self {
        let mut adjacency = vec![Vec::new(); nodes];
        for &(from, to, weight) in edges {
            adjacency[from].push((to, weight));
        }
        Self {
            adjacency,
            starts,
            goal,
            heuristic: vec![0; nodes],
            expansions: RefCell::new(Vec::new()),
        }
    }

    /// Use `num / den` of the true distance to the goal as heuristic.
    ///
    /// Scaling an exact distance down keeps it consistent. Nodes that cannot
    /// reach the goal get a large constant, which is consistent as well since
    /// none of their successors reach it either.
    fn with_scaled_heuristic(mut self, num: Cost, den: Cost) -> Self {
        let dist = self.distances();
        self.heuristic = dist
            .iter()
            .map(|row| row[self.goal].map_or(1000, |d| d * num / den))
            .collect();
        self
    }

    /// All-pairs shortest distances (Floyd-Warshall).
    fn distances(&self) -> Vec<Vec<Option<Cost>>> {
        let n = self.adjacency.len();
        let mut dist = vec![vec![None; n]; n];
        for (from, row) in dist.iter_mut().enumerate() {
            row[from] = Some(0);
            for &(to, weight) in &self.adjacency[from] {
                row[to] = Some(row[to].map_or(weight, |d: Cost| d.min(weight)));
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if let (Some(a), Some(b)) = (dist[i][k], dist[k][j]) {
                        if dist[i][j].is_none_or(|d| a + b < d) {
                            dist[i][j] = Some(a + b);
                        }
                    }
                }
            }
        }
        dist
    }

    fn brute_force(&self) -> Option<Cost> {
        let dist = self.distances();
        self.starts
            .iter()
            .filter_map(|&start| dist[start][self.goal])
            .min()
    }

    fn edge_weight(&self, from: usize, to: usize) -> Option<Cost> {
        self.adjacency[from]
            .iter()
            .filter(|&&(next, _)| next == to)
            .map(|&(_, weight)| weight)
            .min()
    }
}

impl SearchProblem for Graph {
    type State = usize;
    type Key = usize;
    type Priority = Cost;

    fn start_states(&self) -> Vec<usize> {
        self.starts.clone()
    }

    fn successors(&self, node: &usize) -> Vec<Successor<usize>> {
        self.adjacency[*node]
            .iter()
            .map(|&(to, weight)| Successor::new(to, weight))
            .collect()
    }

    fn priority(&self, node: &usize, cost: Cost) -> Cost {
        cost + self.heuristic[*node]
    }

    fn is_goal(&self, node: &usize) -> bool {
        // Called exactly once per expansion
        self.expansions.borrow_mut().push(*node);
        *node == self.goal
    }

    fn key(&self, node: &usize) -> usize {
        *node
    }
}

fn graph_strategy(
    min_weight: Cost,
    max_weight: Cost,
) -> impl Strategy<Value = (usize, Vec<(usize, usize, Cost)>)> {
    (2usize..9).prop_flat_map(move |n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, min_weight..=max_weight), 0..30),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_cost_matches_brute_force((n, edges) in graph_strategy(0, 9)) {
        let graph = Graph::new(n, &edges, vec![0], n - 1);
        let outcome = search(&graph, SearchConfig::default()).unwrap();

        prop_assert_eq!(outcome.found().map(|s| s.cost()), graph.brute_force());
    }

    #[test]
    fn test_consistent_heuristic_keeps_cost_optimal(
        (n, edges) in graph_strategy(0, 9),
        (num, den) in (0u32..=4, 1u32..=4)
            .prop_filter("never above the true distance", |(num, den)| num <= den),
    ) {
        let graph = Graph::new(n, &edges, vec![0], n - 1).with_scaled_heuristic(num, den);
        let outcome = search(&graph, SearchConfig::default()).unwrap();

        prop_assert_eq!(outcome.found().map(|s| s.cost()), graph.brute_force());
    }

    #[test]
    fn test_path_is_connected_and_sums_to_cost((n, edges) in graph_strategy(0, 9)) {
        let graph = Graph::new(n, &edges, vec![0], n - 1);
        if let Some(solution) = search(&graph, SearchConfig::default()).unwrap().found() {
            let path = solution.path();
            prop_assert_eq!(*path[0], 0);
            prop_assert_eq!(**path.last().unwrap(), n - 1);

            let total: Option<Cost> = path
                .windows(2)
                .map(|pair| graph.edge_weight(*pair[0], *pair[1]))
                .sum();
            prop_assert_eq!(total, Some(solution.cost()));
        }
    }

    #[test]
    fn test_multi_source_takes_closest_start(
        (n, edges) in graph_strategy(0, 9),
        extra in 0usize..9,
    ) {
        let starts = vec![0, extra % n];
        let graph = Graph::new(n, &edges, starts, n - 1);
        let outcome = search(&graph, SearchConfig::default()).unwrap();

        prop_assert_eq!(outcome.found().map(|s| s.cost()), graph.brute_force());
    }

    #[test]
    fn test_schedule_policy_exact_on_unit_costs((n, edges) in graph_strategy(1, 1)) {
        let graph = Graph::new(n, &edges, vec![0], n - 1);
        let config = SearchConfig::default().with_policy(SeenPolicy::OnSchedule);
        let outcome = search(&graph, config).unwrap();

        prop_assert_eq!(outcome.found().map(|s| s.cost()), graph.brute_force());
    }

    #[test]
    fn test_no_key_expanded_twice((n, edges) in graph_strategy(0, 9)) {
        // Unreachable goal forces a full sweep of the reachable part
        let graph = Graph::new(n + 1, &edges, vec![0], n);
        let outcome = search(&graph, SearchConfig::default()).unwrap();
        prop_assert!(!outcome.is_found());

        let expansions = graph.expansions.borrow();
        let unique: HashSet<_> = expansions.iter().collect();
        prop_assert_eq!(unique.len(), expansions.len());
        prop_assert_eq!(outcome.stats().expanded, expansions.len());
    }

    #[test]
    fn test_runs_are_deterministic((n, edges) in graph_strategy(0, 3)) {
        let first = Graph::new(n, &edges, vec![0], n - 1);
        let second = Graph::new(n, &edges, vec![0], n - 1);

        let a = search(&first, SearchConfig::default()).unwrap();
        let b = search(&second, SearchConfig::default()).unwrap();

        prop_assert_eq!(a.stats(), b.stats());
        prop_assert_eq!(&*first.expansions.borrow(), &*second.expansions.borrow());
        let path_a = a.found().map(|s| s.path().into_iter().copied().collect::<Vec<_>>());
        let path_b = b.found().map(|s| s.path().into_iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(path_a, path_b);
    }

    #[test]
    fn test_bisection_matches_linear_scan(
        lo in 0u32..100,
        len in 0u32..100,
        threshold in 0u32..250,
    ) {
        let hi = lo + len;
        let linear = (lo..=hi).find(|&t| t >= threshold);
        prop_assert_eq!(min_feasible(lo..=hi, |t| t >= threshold), linear);
    }

    #[test]
    fn test_prune_ratio_accepts_unit_interval(ratio in 0.0001f64..=1.0) {
        prop_assert_eq!(PruneRatio::new(ratio).map(PruneRatio::get), Ok(ratio));
    }
}

#[test]
fn test_prune_ratio_rejects_out_of_range() {
    for ratio in [0.0, -0.5, 1.0001, 2.0, f64::INFINITY] {
        assert_eq!(
            PruneRatio::new(ratio),
            Err(SearchError::InvalidPruneRatio(ratio))
        );
    }
    assert!(matches!(
        PruneRatio::new(f64::NAN),
        Err(SearchError::InvalidPruneRatio(_))
    ));
    assert_eq!(PruneRatio::default(), PruneRatio::HALF);
}

#[test]
fn test_inconsistent_heuristic_can_miss_the_optimum() {
    // S=0 A=1 B=2 C=3 G=4; h(A) = 11 is exact but drops by 10 on A -> C
    let mut graph = Graph::new(
        5,
        &[(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 2), (3, 4, 10)],
        vec![0],
        4,
    );
    graph.heuristic[1] = 11;
    assert_eq!(graph.brute_force(), Some(12));

    // C is expanded through B first and never reopened
    let solution = search(&graph, SearchConfig::default())
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(solution.cost(), 13);
    assert_eq!(solution.path(), vec![&0, &2, &3, &4]);
}

#[test]
fn test_no_start_states_is_exhausted() {
    let graph = Graph::new(3, &[(0, 1, 1), (1, 2, 1)], vec![], 2);
    let mut search = Search::new(&graph, SearchConfig::default());

    assert_eq!(search.step().unwrap(), SearchStatus::Exhausted);
    assert_eq!(search.stats(), &SearchStats::default());
    // Terminal status sticks
    assert_eq!(search.step().unwrap(), SearchStatus::Exhausted);
}

#[test]
fn test_unreachable_goal_counts_reachable_states() {
    let graph = Graph::new(4, &[(0, 1, 1), (1, 0, 1), (1, 2, 5), (3, 0, 1)], vec![0], 3);
    let outcome = search(&graph, SearchConfig::default()).unwrap();

    match outcome {
        SearchOutcome::Exhausted(stats) => {
            assert_eq!(stats.expanded, 3);
            assert_eq!(stats.generated, 3);
            assert_eq!(stats.skipped, 1);
        }
        SearchOutcome::Found(_) => panic!("goal 3 has no incoming edge from 0"),
    }
}

#[test]
fn test_start_state_can_be_goal() {
    let graph = Graph::new(2, &[(0, 1, 4)], vec![1, 0], 1);
    let solution = search(&graph, SearchConfig::default())
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(solution.cost(), 0);
    assert_eq!(solution.path(), vec![&1]);
}

#[test]
fn test_duplicate_starts_under_schedule_policy() {
    let graph = Graph::new(2, &[(0, 1, 1)], vec![0, 0, 0], 1);
    let config = SearchConfig::default().with_policy(SeenPolicy::OnSchedule);
    let outcome = search(&graph, config).unwrap();

    assert_eq!(outcome.stats().skipped, 2);
    assert_eq!(outcome.found().map(|s| s.cost()), Some(1));
}

#[test]
fn test_step_exposes_progress() {
    let graph = Graph::new(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)], vec![0], 3);
    let mut search = Search::new(&graph, SearchConfig::default());
    assert_eq!(search.status(), SearchStatus::Ready);
    assert_eq!(search.frontier_len(), 1);

    let mut steps = 0;
    while !search.step().unwrap().is_terminal() {
        steps += 1;
        assert_eq!(search.status(), SearchStatus::Running);
    }

    assert_eq!(steps, 3);
    assert_eq!(search.status(), SearchStatus::GoalFound);
    assert_eq!(search.stats().peak_frontier, 1);
}

/// Binary tree of depth `depth`: each step adds 0 or 10 to the score.
struct Scores {
    depth: u32,
}

impl SearchProblem for Scores {
    type State = (u32, u64);
    type Key = (u32, u64);
    type Priority = (u32, Reverse<u64>);

    fn start_states(&self) -> Vec<(u32, u64)> {
        vec![(0, 0)]
    }

    fn successors(&self, &(depth, score): &(u32, u64)) -> Vec<Successor<(u32, u64)>> {
        vec![
            Successor::unit((depth + 1, score)),
            Successor::unit((depth + 1, score + 10)),
        ]
    }

    fn priority(&self, &(depth, score): &(u32, u64), _cost: Cost) -> (u32, Reverse<u64>) {
        (depth, Reverse(score))
    }

    fn is_goal(&self, &(depth, _): &(u32, u64)) -> bool {
        depth == self.depth
    }

    fn key(&self, state: &(u32, u64)) -> (u32, u64) {
        *state
    }

    fn bound(&self, &(depth, score): &(u32, u64), _cost: Cost) -> Option<Bound> {
        Some(Bound {
            tier: depth,
            value: score,
        })
    }
}

#[test]
fn test_pruning_drops_weak_candidates_per_tier() {
    let config = SearchConfig::default().with_prune(PruneRatio::new(1.0).unwrap());
    let solution = search(&Scores { depth: 2 }, config)
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(*solution.state(), (2, 20));
    assert_eq!(solution.stats().expanded, 4);
    assert_eq!(solution.stats().generated, 6);
    // (1, 0) produced (2, 0) and (2, 10), both below the tier best of 20
    assert_eq!(solution.stats().pruned, 2);
}

#[test]
fn test_bounds_ignored_without_prune_ratio() {
    let solution = search(&Scores { depth: 2 }, SearchConfig::default())
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(*solution.state(), (2, 20));
    assert_eq!(solution.stats().pruned, 0);
}
