//! The 2022 search solvers register themselves and run through the registry.

use aoc_solutions::my_solutions::year_2022::{day_12, day_19, day_24};
use aoc_solver::{SolveError, SolverError, SolverRegistryBuilder};

const HILL: &str = "Sabqponm\nabcryxxl\naccszExk\nacctuvwj\nabdefghi\n";

const BASIN: &str = "#.######\n#>>.<^<#\n#.<..<<#\n#>v.><>#\n#<^v^^>#\n######.#\n";

fn search_registry() -> aoc_solver::SolverRegistry {
    // Naming the solver types keeps the crate linked for inventory
    let _ = (&day_12::Solver, &day_19::Solver, &day_24::Solver);

    SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.year == 2022 && plugin.tags.contains(&"search"))
        .unwrap()
        .build()
}

#[test]
fn test_search_days_are_registered() {
    let registry = search_registry();
    let days: Vec<_> = registry
        .storage()
        .iter_info()
        .map(|info| (info.year, info.day, info.parts))
        .collect();

    assert_eq!(days, vec![(2022, 12, 2), (2022, 19, 2), (2022, 24, 2)]);
}

#[test]
fn test_grid_tag_excludes_day_19() {
    let registry = SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"grid"))
        .unwrap()
        .build();

    assert!(registry.storage().contains(2022, 12));
    assert!(registry.storage().contains(2022, 24));
    assert!(!registry.storage().contains(2022, 19));
}

#[test]
fn test_solvers_run_through_registry() {
    let registry = search_registry();

    let mut hill = registry.create_solver(2022, 12, HILL).unwrap();
    assert_eq!(hill.solve(1).unwrap().answer, "31");
    assert_eq!(hill.solve(2).unwrap().answer, "29");

    let mut basin = registry.create_solver(2022, 24, BASIN).unwrap();
    assert_eq!(basin.solve(1).unwrap().answer, "18");
    assert!(matches!(basin.solve(3), Err(SolveError::PartOutOfRange(3))));
}

#[test]
fn test_bad_input_surfaces_parse_error() {
    let registry = search_registry();

    assert!(matches!(
        registry.create_solver(2022, 24, "#.#\n#?#\n#.#"),
        Err(SolverError::ParseError(_))
    ));
    assert!(matches!(
        registry.create_solver(2022, 12, "SzE").map(|mut s| s.solve(1)),
        Ok(Err(SolveError::NoSolution(_)))
    ));
}
