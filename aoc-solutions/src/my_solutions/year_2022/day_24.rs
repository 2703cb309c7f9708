use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Pos};
use crate::utils::search::{
    Cost, SearchConfig, SearchError, SearchOutcome, SearchProblem, Successor, search,
    try_min_feasible,
};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 24, tags = ["search", "grid"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Open,
    Blizzard(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl TryFrom<char> for Tile {
    type Error = ParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            '#' => Ok(Tile::Wall),
            '.' => Ok(Tile::Open),
            '^' => Ok(Tile::Blizzard(Direction::Up)),
            'v' => Ok(Tile::Blizzard(Direction::Down)),
            '<' => Ok(Tile::Blizzard(Direction::Left)),
            '>' => Ok(Tile::Blizzard(Direction::Right)),
            _ => Err(ParseError::UnrecognizedVariant {
                kind: "tile",
                token: ch.to_string(),
            }),
        }
    }
}

/// The walled valley with every blizzard layout of one full cycle.
///
/// Positions use full-grid coordinates: the interior spans rows
/// `1..=height` and columns `1..=width`.
#[derive(Debug)]
pub struct Basin {
    width: usize,
    height: usize,
    start: Pos,
    target: Pos,
    period: usize,
    // occupied[t % period][interior index]
    occupied: Vec<Vec<bool>>,
}

impl Basin {
    fn from_grid(grid: &Grid<Tile>) -> Result<Self, ParseError> {
        if grid.width() < 3 || grid.height() < 3 {
            return Err(ParseError::InvalidFormat(format!(
                "basin of {}x{} has no interior",
                grid.width(),
                grid.height()
            )));
        }
        let width = grid.width() - 2;
        let height = grid.height() - 2;

        let start = Self::gap(grid, 0)?;
        let target = Self::gap(grid, grid.height() - 1)?;

        let mut blizzards = Vec::new();
        for (pos, tile) in grid.iter() {
            let interior = (1..=height).contains(&pos.row) && (1..=width).contains(&pos.col);
            match (*tile, interior) {
                (Tile::Blizzard(direction), true) => {
                    blizzards.push((pos.row - 1, pos.col - 1, direction))
                }
                (Tile::Open, true) | (Tile::Wall, false) => {}
                (Tile::Open, false) if pos == start || pos == target => {}
                (tile, _) => {
                    return Err(ParseError::InvalidFormat(format!(
                        "row {}: unexpected {tile:?} at column {}",
                        pos.row + 1,
                        pos.col + 1
                    )));
                }
            }
        }

        let period = lcm(width, height);
        let occupied = (0..period)
            .map(|t| {
                let mut layout = vec![false; width * height];
                for &(row, col, direction) in &blizzards {
                    let (row, col) = match direction {
                        Direction::Up => ((row + height - t % height) % height, col),
                        Direction::Down => ((row + t) % height, col),
                        Direction::Left => (row, (col + width - t % width) % width),
                        Direction::Right => (row, (col + t) % width),
                    };
                    layout[row * width + col] = true;
                }
                layout
            })
            .collect();

        Ok(Self {
            width,
            height,
            start,
            target,
            period,
            occupied,
        })
    }

    /// The single open cell in the outer wall row `row`.
    fn gap(grid: &Grid<Tile>, row: usize) -> Result<Pos, ParseError> {
        let mut gaps = (0..grid.width())
            .map(|col| Pos::new(row, col))
            .filter(|&pos| grid.get(pos) == Some(&Tile::Open));
        match (gaps.next(), gaps.next()) {
            (Some(gap), None) => Ok(gap),
            _ => Err(ParseError::InvalidFormat(format!(
                "row {}: wall needs exactly one gap",
                row + 1
            ))),
        }
    }

    /// Whether `pos` is free of walls and blizzards at minute `time`.
    fn is_open(&self, pos: Pos, time: u32) -> bool {
        if pos == self.start || pos == self.target {
            return true;
        }
        if !(1..=self.height).contains(&pos.row) || !(1..=self.width).contains(&pos.col) {
            return false;
        }
        let layout = &self.occupied[time as usize % self.period];
        !layout[(pos.row - 1) * self.width + pos.col - 1]
    }

    fn distance(&self) -> Cost {
        self.start.manhattan(self.target) as Cost
    }
}

fn lcm(a: usize, b: usize) -> usize {
    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 { a } else { gcd(b, a % b) }
    }
    a / gcd(a, b) * b
}

impl AocParser for Solver {
    type SharedData<'a> = Basin;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse(input, |_, ch| Tile::try_from(ch))?;
        Basin::from_grid(&grid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        fastest_trip(shared, Trip::OneWay).map(|minutes| minutes.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        fastest_trip(shared, Trip::ThereAndBackAgain).map(|minutes| minutes.to_string())
    }
}

/// Which leg of the journey the expedition is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Outbound,
    Returning,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trip {
    /// Start to target
    OneWay,
    /// Start to target, back to start, then to target again
    ThereAndBackAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expedition {
    pos: Pos,
    time: u32,
    phase: Phase,
}

struct Crossing<'b> {
    basin: &'b Basin,
    trip: Trip,
    ceiling: Option<u32>,
}

impl Crossing<'_> {
    /// Phase after arriving at `pos`.
    fn advance(&self, phase: Phase, pos: Pos) -> Phase {
        match (self.trip, phase) {
            (Trip::ThereAndBackAgain, Phase::Outbound) if pos == self.basin.target => {
                Phase::Returning
            }
            (Trip::ThereAndBackAgain, Phase::Returning) if pos == self.basin.start => Phase::Final,
            _ => phase,
        }
    }

    /// Admissible minutes left: the current leg plus every later one.
    fn remaining(&self, state: &Expedition) -> Cost {
        let basin = self.basin;
        let to_target = state.pos.manhattan(basin.target) as Cost;
        match (self.trip, state.phase) {
            (Trip::OneWay, _) | (Trip::ThereAndBackAgain, Phase::Final) => to_target,
            (Trip::ThereAndBackAgain, Phase::Outbound) => to_target + 2 * basin.distance(),
            (Trip::ThereAndBackAgain, Phase::Returning) => {
                state.pos.manhattan(basin.start) as Cost + basin.distance()
            }
        }
    }
}

impl SearchProblem for Crossing<'_> {
    type State = Expedition;
    type Key = (Pos, usize, Phase);
    type Priority = (Cost, Cost);

    fn start_states(&self) -> Vec<Expedition> {
        vec![Expedition {
            pos: self.basin.start,
            time: 0,
            phase: Phase::Outbound,
        }]
    }

    fn successors(&self, state: &Expedition) -> Vec<Successor<Expedition>> {
        let time = state.time + 1;
        if self.ceiling.is_some_and(|ceiling| time > ceiling) {
            return Vec::new();
        }
        std::iter::once(state.pos)
            .chain(state.pos.neighbors())
            .filter(|&pos| self.basin.is_open(pos, time))
            .map(|pos| {
                Successor::unit(Expedition {
                    pos,
                    time,
                    phase: self.advance(state.phase, pos),
                })
            })
            .collect()
    }

    fn priority(&self, state: &Expedition, cost: Cost) -> (Cost, Cost) {
        let remaining = self.remaining(state);
        (cost + remaining, remaining)
    }

    fn is_goal(&self, state: &Expedition) -> bool {
        let last = match self.trip {
            Trip::OneWay => Phase::Outbound,
            Trip::ThereAndBackAgain => Phase::Final,
        };
        state.pos == self.basin.target && state.phase == last
    }

    fn key(&self, state: &Expedition) -> (Pos, usize, Phase) {
        (state.pos, state.time as usize % self.basin.period, state.phase)
    }
}

/// Minutes of the fastest `trip`, or `None` if the blizzards never let it through
/// (or not within `ceiling` minutes).
pub fn earliest_arrival(
    basin: &Basin,
    trip: Trip,
    ceiling: Option<u32>,
) -> Result<Option<u32>, SearchError> {
    let crossing = Crossing {
        basin,
        trip,
        ceiling,
    };
    Ok(search(&crossing, SearchConfig::default())?
        .found()
        .map(|solution| solution.state().time))
}

/// Same answer as [`earliest_arrival`], found by bisecting on the time ceiling.
pub fn earliest_arrival_by_bisection(basin: &Basin, trip: Trip) -> Result<Option<u32>, SearchError> {
    // No shortest trip revisits a (position, time mod period, phase) key
    let cells = basin.width * basin.height + 2;
    let upper = u32::try_from(cells * basin.period * 3).unwrap_or(u32::MAX);
    try_min_feasible(0..=upper, |ceiling| {
        earliest_arrival(basin, trip, Some(ceiling)).map(|arrival| arrival.is_some())
    })
}

fn fastest_trip(basin: &Basin, trip: Trip) -> Result<u32, SolveError> {
    let crossing = Crossing {
        basin,
        trip,
        ceiling: None,
    };
    match search(&crossing, SearchConfig::default()).map_err(|e| SolveError::SolveFailed(e.into()))? {
        SearchOutcome::Found(solution) => Ok(solution.state().time),
        SearchOutcome::Exhausted(stats) => Err(SolveError::NoSolution(format!(
            "{trip:?} trip blocked, explored {} states",
            stats.expanded
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
#.######
#>>.<^<#
#.<..<<#
#>v.><>#
#<^v^^>#
######.#
";

    const OPEN: &str = "\
#.###
#...#
#...#
###.#
";

    // The `v` crosses the only cell next to the target on odd minutes
    const FORCED_WAIT: &str = "\
#.##
#.v#
#..#
##.#
";

    fn basin(input: &str) -> Basin {
        Solver::parse(input).unwrap()
    }

    #[test]
    fn test_example() {
        let mut shared = basin(EXAMPLE);
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "18");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "54");
    }

    #[test]
    fn test_layout_cycle() {
        let shared = basin(EXAMPLE);
        assert_eq!((shared.width, shared.height), (6, 4));
        assert_eq!(shared.period, 12);
        assert_eq!(shared.start, Pos::new(0, 1));
        assert_eq!(shared.target, Pos::new(5, 6));
        // Layouts repeat with the period
        assert_eq!(shared.is_open(Pos::new(1, 1), 0), shared.is_open(Pos::new(1, 1), 12));
        assert!(!shared.is_open(Pos::new(1, 1), 0));
        assert!(!shared.is_open(Pos::new(0, 0), 3));
    }

    #[test]
    fn test_open_basin_round_trip_is_three_legs() {
        let shared = basin(OPEN);
        let distance = shared.distance();
        assert_eq!(distance, 5);
        assert_eq!(fastest_trip(&shared, Trip::OneWay).unwrap(), distance);
        assert_eq!(fastest_trip(&shared, Trip::ThereAndBackAgain).unwrap(), 3 * distance);
    }

    #[test]
    fn test_blizzard_forces_wait() {
        let shared = basin(FORCED_WAIT);
        let distance = shared.distance();
        assert_eq!(distance, 4);
        assert_eq!(fastest_trip(&shared, Trip::OneWay).unwrap(), 5);
        assert!(fastest_trip(&shared, Trip::ThereAndBackAgain).unwrap() > 3 * distance);
    }

    #[test]
    fn test_permanent_blizzard_has_no_solution() {
        let shared = basin("#.#\n#<#\n#.#\n");
        assert!(matches!(
            fastest_trip(&shared, Trip::OneWay),
            Err(SolveError::NoSolution(_))
        ));
        assert_eq!(earliest_arrival_by_bisection(&shared, Trip::OneWay), Ok(None));
    }

    #[test]
    fn test_ceiling_cuts_off_search() {
        let shared = basin(EXAMPLE);
        assert_eq!(earliest_arrival(&shared, Trip::OneWay, Some(17)), Ok(None));
        assert_eq!(earliest_arrival(&shared, Trip::OneWay, Some(18)), Ok(Some(18)));
    }

    #[test]
    fn test_bisection_agrees_with_direct_search() {
        for input in [EXAMPLE, OPEN, FORCED_WAIT] {
            let shared = basin(input);
            for trip in [Trip::OneWay, Trip::ThereAndBackAgain] {
                assert_eq!(
                    earliest_arrival_by_bisection(&shared, trip),
                    earliest_arrival(&shared, trip, None),
                    "{trip:?}"
                );
            }
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Solver::parse("#.#\n#x#\n#.#").unwrap_err(),
            ParseError::UnrecognizedVariant {
                kind: "tile",
                token: "x".to_string()
            }
        );
        assert!(matches!(
            Solver::parse("###\n#.#\n#.#"),
            Err(ParseError::InvalidFormat(msg)) if msg.contains("row 1")
        ));
        assert!(matches!(
            Solver::parse("#.#\n..#\n#.#"),
            Err(ParseError::InvalidFormat(msg)) if msg.contains("row 2")
        ));
    }
}
