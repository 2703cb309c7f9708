//! Advent of Code Solver Library
//!
//! A small framework for puzzle solvers: each year/day parses its input once
//! into shared data and then answers one or more parts from it.
//!
//! # Overview
//!
//! - [`AocParser`] turns raw input into `SharedData`
//! - [`PartSolver<N>`] answers part `N`; `#[derive(AocSolver)]` generates the [`Solver`] dispatch
//! - [`SolverInstance`] / [`DynSolver`] time parsing and solving behind a type-erased interface
//! - [`SolverRegistryBuilder`] collects solvers, including plugins submitted via `inventory`
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, ParseError, PartSolver, SolveError, Solver, SolverRegistryBuilder};
//!
//! struct Day1;
//!
//! impl AocParser for Day1 {
//!     type SharedData<'a> = Vec<i32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl Solver for Day1 {
//!     const PARTS: u8 = 1;
//!
//!     fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
//!         match part {
//!             1 => Ok(shared.iter().sum::<i32>().to_string()),
//!             _ => Err(SolveError::PartNotImplemented(part)),
//!         }
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register::<Day1>(2022, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2022, 1, "1\n2\n3").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "6");
//! ```
//!
//! # Plugins
//!
//! ```ignore
//! #[derive(AocSolver, AutoRegisterSolver)]
//! #[aoc_solver(max_parts = 2)]
//! #[aoc(year = 2022, day = 12, tags = ["search"])]
//! pub struct Solver;
//! ```
//!
//! `SolverRegistryBuilder::register_all_plugins` then picks the solver up
//! from any linked crate.

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverFactoryStorage, SolverPlugin,
    SolverRegistry, SolverRegistryBuilder,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-exported for the code generated by `AutoRegisterSolver`
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
