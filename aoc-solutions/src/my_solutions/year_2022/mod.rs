//! 2022 puzzles built on the shared search engine

pub mod day_12;
pub mod day_19;
pub mod day_24;
