use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use serde::Serialize;

use super::conflict::ConflictChecker;
use super::error::ScheduleError;
use super::odometer::Odometer;
use super::types::{CourseClass, OptionId, TimeSlot};

/// How often, in combinations, the wall clock is consulted
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Ways to cut a search short. Both are checked between combinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits<'a> {
    stop_flag: Option<&'a AtomicBool>,
    time_limit: Option<Duration>,
}

impl<'a> SearchLimits<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search once `flag` is set to `true`.
    pub fn with_stop_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    fn exceeded(&self, visited: u64, started: Instant) -> Option<String> {
        if let Some(flag) = self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return Some("Interrupt signal received".to_string());
            }
        }
        if let Some(limit) = self.time_limit {
            if visited % CLOCK_CHECK_INTERVAL == 0 && started.elapsed() >= limit {
                return Some(format!("Time limit of {:?} reached", limit));
            }
        }
        None
    }
}

/// Why a search stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Every combination was visited.
    Exhausted,
    /// A search limit tripped; the reason is attached.
    Aborted(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exhausted => write!(f, "Exhausted"),
            Termination::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    pub combinations_visited: u64,
    pub conflicts_rejected: u64,
    pub solutions_found: u64,
    pub elapsed: Duration,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited {} combinations, rejected {} with conflicts, accepted {} in {:.3}s",
            self.combinations_visited,
            self.conflicts_rejected,
            self.solutions_found,
            self.elapsed.as_secs_f64()
        )
    }
}

/// The option chosen for one class in a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub class: String,
    pub option: OptionId,
    pub slots: Vec<TimeSlot>,
}

/// A conflict-free combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Option index per class, in class order
    pub selection: Vec<usize>,
    pub picks: Vec<Pick>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub statistics: SearchStatistics,
    pub termination: Termination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveOutcome {
    /// Accepted combinations in enumeration order
    pub solutions: Vec<Solution>,
    pub statistics: SearchStatistics,
    pub termination: Termination,
}

impl SolveOutcome {
    pub fn solutions_found(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.termination == Termination::Exhausted
    }
}

/// Exhaustive search over every way of picking one option per class.
///
/// Each combination is tested on its own; nothing learned from one
/// combination is used to skip another.
#[derive(Debug, Clone)]
pub struct Solver {
    classes: Vec<CourseClass>,
}

impl Solver {
    pub fn new(classes: Vec<CourseClass>) -> Result<Self, ScheduleError> {
        if classes.is_empty() {
            return Err(ScheduleError::NoClasses);
        }
        // `CourseClass::new` already refuses empty option lists.
        debug_assert!(classes.iter().all(|c| c.option_count() > 0));
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[CourseClass] {
        &self.classes
    }

    /// Number of combinations a full search visits, `None` on overflow.
    pub fn search_space(&self) -> Option<u128> {
        self.odometer().total()
    }

    fn odometer(&self) -> Odometer {
        Odometer::new(self.classes.iter().map(CourseClass::option_count).collect())
    }

    pub fn solve(&self) -> SolveOutcome {
        self.solve_with(&SearchLimits::default())
    }

    pub fn solve_with(&self, limits: &SearchLimits<'_>) -> SolveOutcome {
        let mut solutions = Vec::new();
        let summary = self.run(limits, |solution| solutions.push(solution));
        SolveOutcome {
            solutions,
            statistics: summary.statistics,
            termination: summary.termination,
        }
    }

    /// Walks the combinations in odometer order, handing every
    /// conflict-free one to `on_solution` as soon as it is found.
    pub fn run<F>(&self, limits: &SearchLimits<'_>, mut on_solution: F) -> SearchSummary
    where
        F: FnMut(Solution),
    {
        let started = Instant::now();
        let mut odometer = self.odometer();
        let mut checker = ConflictChecker::new();
        let mut statistics = SearchStatistics::default();

        match odometer.total() {
            Some(total) => info!(
                "Searching {} classes, {} combinations",
                self.classes.len(),
                total
            ),
            None => info!(
                "Searching {} classes, combination count overflows u128",
                self.classes.len()
            ),
        }

        let termination = loop {
            if let Some(reason) = limits.exceeded(statistics.combinations_visited, started) {
                warn!(
                    "Search aborted after {} combinations: {}",
                    statistics.combinations_visited, reason
                );
                break Termination::Aborted(reason);
            }

            statistics.combinations_visited += 1;
            match checker.first_clash(&self.classes, odometer.digits()) {
                None => {
                    statistics.solutions_found += 1;
                    debug!("Solution {} at {:?}", statistics.solutions_found, odometer.digits());
                    on_solution(self.solution_at(odometer.digits()));
                }
                Some(slot) => {
                    statistics.conflicts_rejected += 1;
                    trace!("{:?} double-books {}", odometer.digits(), slot);
                }
            }

            if !odometer.advance() {
                break Termination::Exhausted;
            }
        };

        statistics.elapsed = started.elapsed();
        info!("Search finished ({}): {}", termination, statistics);

        SearchSummary {
            statistics,
            termination,
        }
    }

    fn solution_at(&self, selection: &[usize]) -> Solution {
        let picks = self
            .classes
            .iter()
            .zip(selection)
            .map(|(class, &index)| {
                let option = &class.options()[index];
                Pick {
                    class: class.name().to_string(),
                    option: option.id(),
                    slots: option.slots().to_vec(),
                }
            })
            .collect();

        Solution {
            selection: selection.to_vec(),
            picks,
        }
    }
}
