//! Output formatting for solver results

use crate::executor::SolverResult;
use chrono::TimeDelta;
use itertools::Itertools;

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: std::time::Instant::now(),
        }
    }

    /// Format and print a single result
    pub fn print_result(&self, result: &SolverResult) {
        if self.quiet {
            match &result.answer {
                Ok(answer) => println!("{}", answer),
                Err(e) => eprintln!("Error: {}", e),
            }
        } else {
            match format_result(result) {
                Ok(line) => println!("{}", line),
                Err(line) => eprintln!("{}", line),
            }
        }
    }

    /// Print a summary after all results, per year and overall
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }

        println!();
        println!("--- Summary ---");
        for (year, group) in &results.iter().chunk_by(|r| r.year) {
            let (solved, failed) = count(group);
            println!("{}: {} solved, {} failed", year, solved, failed);
        }

        let (solved, failed) = count(results.iter());
        let total_parse_time: TimeDelta = results.iter().filter_map(|r| r.parse_duration).sum();
        let total_solve_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| r.solve_duration)
            .sum();

        println!("Parts: {} solved, {} failed", solved, failed);
        println!("Total parse time: {}", format_duration(total_parse_time));
        println!("Total solve time: {}", format_duration(total_solve_time));
        println!(
            "Elapsed wall-clock time: {}",
            format_std_duration(self.start_time.elapsed())
        );
    }
}

fn count<'a>(results: impl Iterator<Item = &'a SolverResult>) -> (usize, usize) {
    results.fold((0, 0), |(solved, failed), r| {
        if r.answer.is_ok() {
            (solved + 1, failed)
        } else {
            (solved, failed + 1)
        }
    })
}

/// Full line for a result: `Ok` goes to stdout, `Err` to stderr
fn format_result(result: &SolverResult) -> Result<String, String> {
    let prefix = format!("{}/{:02} Part {}", result.year, result.day, result.part);

    match &result.answer {
        Ok(answer) => {
            let parse_timing = result
                .parse_duration
                .map(|d| format!("parse: {}, ", format_duration(d)))
                .unwrap_or_default();
            Ok(format!(
                "{}: {} ({}solve: {})",
                prefix,
                answer,
                parse_timing,
                format_duration(result.solve_duration)
            ))
        }
        Err(e) => Err(format!("{}: Error - {}", prefix, e)),
    }
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Format a std::time::Duration for display (used for wall-clock time)
fn format_std_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
