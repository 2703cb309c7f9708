//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions live under [`my_solutions`], organized by year, and register
//! themselves through the `AutoRegisterSolver` derive. The search-heavy days
//! share the engine in [`utils::search`].

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
