//! Sequential executor for running solvers

use crate::config::Config;
use crate::error::CliError;
use crate::input::InputStore;
use aoc_solver::{SolverError, SolverRegistry};
use chrono::TimeDelta;
use log::{info, warn};
use std::ops::RangeInclusive;

/// Result from a single part
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, CliError>,
    /// Set on the first part of each puzzle, which paid for parsing
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Runs every selected solver one after another
pub struct Executor {
    registry: SolverRegistry,
    inputs: InputStore,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Self {
        let mut inputs = InputStore::new(config.input_dir.clone());
        if let (Some(path), Some(year), Some(day)) =
            (&config.input_file, config.year_filter, config.day_filter)
        {
            inputs = inputs.with_override(year, day, path.clone());
        }

        Self {
            registry,
            inputs,
            year_filter: config.year_filter,
            day_filter: config.day_filter,
            part_filter: config.part_filter,
        }
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        self.registry
            .storage()
            .iter_info()
            .filter(|info| self.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| self.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Filter parts based on the part filter and solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0,
            None => 1..=max_parts,
        }
    }

    /// Whether the input for `work` is available
    pub fn has_input(&self, work: &WorkItem) -> bool {
        self.inputs.contains(work.year, work.day)
    }

    /// Run all work items in order, handing each part's result to `on_result` as it completes.
    ///
    /// Missing inputs and parse failures become per-part error results; the
    /// run continues with the next puzzle.
    pub fn execute<F>(&self, mut on_result: F) -> Result<(), CliError>
    where
        F: FnMut(SolverResult),
    {
        for work in self.collect_work_items() {
            self.run_solver(&work, &mut on_result)?;
        }
        Ok(())
    }

    fn run_solver<F>(&self, work: &WorkItem, on_result: &mut F) -> Result<(), CliError>
    where
        F: FnMut(SolverResult),
    {
        let (year, day) = (work.year, work.day);
        let failed = |part, error: CliError| SolverResult {
            year,
            day,
            part,
            answer: Err(error),
            parse_duration: None,
            solve_duration: TimeDelta::zero(),
        };

        let input = match self.inputs.get(year, day) {
            Ok(input) => input,
            Err(e) => {
                warn!("skipping {year}/{day:02}: {e}");
                for part in work.parts.clone() {
                    on_result(failed(part, e.clone().into()));
                }
                return Ok(());
            }
        };

        let mut solver = match self.registry.create_solver(year, day, &input) {
            Ok(solver) => solver,
            Err(SolverError::ParseError(e)) => {
                warn!("failed to parse {year}/{day:02}: {e}");
                for part in work.parts.clone() {
                    on_result(failed(part, SolverError::ParseError(e.clone()).into()));
                }
                return Ok(());
            }
            // Work items come from the registry itself
            Err(e) => return Err(e.into()),
        };

        let mut parse_duration = Some(solver.parse_duration());
        for part in work.parts.clone() {
            info!("solving {year}/{day:02} part {part}");
            let result = match solver.solve(part) {
                Ok(solved) => SolverResult {
                    year,
                    day,
                    part,
                    solve_duration: solved.duration(),
                    answer: Ok(solved.answer),
                    parse_duration: parse_duration.take(),
                },
                Err(e) => failed(part, SolverError::SolveError(e).into()),
            };
            on_result(result);
        }
        Ok(())
    }
}
