//! Configuration resolution from CLI args

use crate::cli::Args;
use crate::error::CliError;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Root of the `{year}/day{DD}.txt` input tree
    pub input_dir: PathBuf,
    /// Explicit input file for the selected year/day
    pub input_file: Option<PathBuf>,
    /// Quiet mode
    pub quiet: bool,
    /// Default log level, before RUST_LOG is applied
    pub log_level: LevelFilter,
}

impl Config {
    /// Build config from CLI args
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        // clap enforces this too; Args can also be built by hand
        if args.input.is_some() && (args.year.is_none() || args.day.is_none()) {
            return Err(CliError::Config(
                "--input needs both --year and --day".to_string(),
            ));
        }

        Ok(Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            input_dir: expand_tilde(&args.input_dir),
            input_file: args.input.as_deref().map(expand_tilde),
            quiet: args.quiet,
            log_level: log_level(args.verbose),
        })
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> Result<Config, CliError> {
        Config::from_args(Args::try_parse_from(argv.iter().copied()).unwrap())
    }

    #[test]
    fn test_verbosity_maps_to_level() {
        assert_eq!(config(&["aoc"]).unwrap().log_level, LevelFilter::Warn);
        assert_eq!(config(&["aoc", "-v"]).unwrap().log_level, LevelFilter::Info);
        assert_eq!(config(&["aoc", "-vvvv"]).unwrap().log_level, LevelFilter::Trace);
    }

    #[test]
    fn test_input_without_day_rejected() {
        let mut args = Args::try_parse_from(["aoc", "-y", "2022"]).unwrap();
        args.input = Some(PathBuf::from("day12.txt"));
        assert!(matches!(Config::from_args(args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_tilde_expansion() {
        let relative = Path::new("inputs");
        assert_eq!(expand_tilde(relative), PathBuf::from("inputs"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/aoc")), home.join("aoc"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }

    #[test]
    fn test_filters_pass_through() {
        let config = config(&["aoc", "-y", "2022", "-p", "2", "-t", "grid", "--input-dir", "data"]).unwrap();
        assert_eq!(config.year_filter, Some(2022));
        assert_eq!(config.day_filter, None);
        assert_eq!(config.part_filter, Some(2));
        assert_eq!(config.tags, vec!["grid"]);
        assert_eq!(config.input_dir, PathBuf::from("data"));
        assert!(config.input_file.is_none());
    }
}
