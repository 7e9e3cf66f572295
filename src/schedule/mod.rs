pub mod types;
pub mod error;
pub mod ids;
pub mod slot_utils;
pub mod odometer;
pub mod conflict;
pub mod solver;

pub use types::{ClassOption, CourseClass, Day, OptionId, Period, TimeSlot};
pub use error::ScheduleError;
pub use ids::OptionIdAllocator;
pub use slot_utils::format_slots;
pub use odometer::Odometer;
pub use conflict::ConflictChecker;
pub use solver::{Pick, SearchLimits, SearchStatistics, SearchSummary, Solution, SolveOutcome, Solver, Termination};
