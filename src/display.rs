use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::schedule::{format_slots, Solution, SolveOutcome, Termination};

/// JSON shape of a finished search
#[derive(Serialize)]
pub struct Report<'a> {
    solutions_found: usize,
    #[serde(flatten)]
    outcome: &'a SolveOutcome,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a SolveOutcome) -> Self {
        Self {
            solutions_found: outcome.solutions_found(),
            outcome,
        }
    }
}

/// Formats one solution as a "Solution:" header followed by one line per class
pub fn format_solution(solution: &Solution) -> String {
    let mut out = String::from("Solution:\n");
    for pick in &solution.picks {
        let _ = writeln!(out, "\t{}: {}", pick.class, format_slots(&pick.slots));
    }
    out
}

/// Renders every solution, the total, and the search statistics
pub fn render_report(outcome: &SolveOutcome) -> String {
    let mut out = String::new();
    for solution in &outcome.solutions {
        out.push_str(&format_solution(solution));
    }

    let _ = writeln!(out, "Solutions found: {}", outcome.solutions_found());
    let _ = writeln!(out, "Search {}", outcome.statistics);
    if let Termination::Aborted(reason) = &outcome.termination {
        let _ = writeln!(out, "⚠️  Search did not finish: {}", reason);
    }
    out
}

pub fn render_json(outcome: &SolveOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report::new(outcome))
}

/// Prints a finished search in a readable format
pub fn print_report(outcome: &SolveOutcome) {
    print!("{}", render_report(outcome));
}

/// Writes a finished search to a file, as JSON or as the text report
pub fn write_report_to_file<P: AsRef<Path>>(
    path: P,
    outcome: &SolveOutcome,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    if json {
        writeln!(file, "{}", render_json(outcome)?)?;
    } else {
        file.write_all(render_report(outcome).as_bytes())?;
    }
    Ok(())
}
