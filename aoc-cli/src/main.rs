//! AOC CLI - Command-line interface for running Advent of Code solvers

mod cli;
mod config;
mod error;
mod executor;
mod input;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::Config;
use executor::Executor;
use log::{info, warn};
use output::OutputFormatter;

fn main() {
    let args = Args::parse();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), error::CliError> {
    // Build registry with tag filtering (only once)
    let registry = build_registry(&config.tags)?;
    info!("{} solver(s) registered", registry.storage().len());

    let executor = Executor::new(registry, config);

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    // Report missing inputs up front; those puzzles still show up as failures
    let missing: Vec<_> = work_items.iter().filter(|w| !executor.has_input(w)).collect();
    if !missing.is_empty() {
        warn!("{} input file(s) missing", missing.len());
        if !config.quiet {
            println!("Missing {} input file(s):", missing.len());
            for w in &missing {
                println!("  - {}/day{:02}", w.year, w.day);
            }
        }
    }

    if !config.quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let formatter = OutputFormatter::new(config.quiet);
    let mut results = Vec::new();
    executor.execute(|result| {
        formatter.print_result(&result);
        results.push(result);
    })?;

    formatter.print_summary(&results);
    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<aoc_solver::SolverRegistry, error::CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
