//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input could not be loaded
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Solver error
    #[error("Solver error: {0}")]
    Solver(#[from] aoc_solver::SolverError),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),
}

/// Input loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No input file for the puzzle
    #[error("no input for {year}/{day:02} at {}", path.display())]
    Missing { year: u16, day: u8, path: PathBuf },

    /// The input file exists but could not be read
    #[error("failed to read {}: {kind}", path.display())]
    Read {
        path: PathBuf,
        kind: std::io::ErrorKind,
    },
}
