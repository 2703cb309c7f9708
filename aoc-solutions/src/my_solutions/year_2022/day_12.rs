use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Pos};
use crate::utils::search::{Cost, SearchConfig, SearchOutcome, SearchProblem, Successor, search};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 12, tags = ["search", "grid"])]
pub struct Solver;

/// Elevation grid with `a` as 0 and `z` as 25.
#[derive(Debug)]
pub struct HeightMap {
    heights: Grid<u8>,
    start: Pos,
    end: Pos,
}

impl AocParser for Solver {
    type SharedData<'a> = HeightMap;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut start = None;
        let mut end = None;

        let heights = Grid::parse(input, |pos, ch| match ch {
            'a'..='z' => Ok(ch as u8 - b'a'),
            'S' => mark_once(&mut start, pos, 'S').map(|_| 0),
            'E' => mark_once(&mut end, pos, 'E').map(|_| 25),
            _ => Err(ParseError::UnrecognizedVariant {
                kind: "elevation",
                token: ch.to_string(),
            }),
        })?;

        Ok(HeightMap {
            heights,
            start: start.ok_or_else(|| ParseError::MissingData("no start marker 'S'".into()))?,
            end: end.ok_or_else(|| ParseError::MissingData("no end marker 'E'".into()))?,
        })
    }
}

fn mark_once(slot: &mut Option<Pos>, pos: Pos, marker: char) -> Result<(), ParseError> {
    match slot.replace(pos) {
        None => Ok(()),
        Some(first) => Err(ParseError::InvalidFormat(format!(
            "row {}: second '{marker}' marker, first one is on row {}",
            pos.row + 1,
            first.row + 1
        ))),
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        fewest_steps(shared, vec![shared.start]).map(|steps| steps.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let lowest = shared
            .heights
            .iter()
            .filter(|&(_, &height)| height == 0)
            .map(|(pos, _)| pos)
            .collect();
        fewest_steps(shared, lowest).map(|steps| steps.to_string())
    }
}

/// Climbing from any of `starts` to the summit, at most one level up per step.
struct Climb<'m> {
    map: &'m HeightMap,
    starts: Vec<Pos>,
}

impl SearchProblem for Climb<'_> {
    type State = Pos;
    type Key = Pos;
    /// (steps + distance left, distance left)
    type Priority = (Cost, Cost);

    fn start_states(&self) -> Vec<Pos> {
        self.starts.clone()
    }

    fn successors(&self, &pos: &Pos) -> Vec<Successor<Pos>> {
        let heights = &self.map.heights;
        let Some(&here) = heights.get(pos) else {
            return Vec::new();
        };
        heights
            .neighbors(pos)
            .filter(|&next| heights.get(next).is_some_and(|&there| there <= here + 1))
            .map(Successor::unit)
            .collect()
    }

    fn priority(&self, pos: &Pos, cost: Cost) -> (Cost, Cost) {
        let remaining = pos.manhattan(self.map.end) as Cost;
        (cost + remaining, remaining)
    }

    fn is_goal(&self, pos: &Pos) -> bool {
        *pos == self.map.end
    }

    fn key(&self, pos: &Pos) -> Pos {
        *pos
    }
}

fn fewest_steps(map: &HeightMap, starts: Vec<Pos>) -> Result<Cost, SolveError> {
    let problem = Climb { map, starts };
    match search(&problem, SearchConfig::default()).map_err(|e| SolveError::SolveFailed(e.into()))? {
        SearchOutcome::Found(solution) => Ok(solution.cost()),
        SearchOutcome::Exhausted(stats) => Err(SolveError::NoSolution(format!(
            "summit unreachable, explored {} positions",
            stats.expanded
        ))),
    }
}
