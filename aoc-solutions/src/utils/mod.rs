//! Shared building blocks for puzzle solutions

pub mod grid;
pub mod search;
