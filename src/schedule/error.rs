use std::fmt;

use super::types::{OptionId, TimeSlot};

/// Rejections raised while building the input of a search.
///
/// None of these can occur once a `Solver` exists: every class it holds has
/// at least one option and every option has at least one distinct slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A class was declared without any alternative to choose from.
    NoOptions { class: String },
    /// An option was declared without any time slot.
    EmptyOption { option: OptionId },
    /// An option lists the same time slot more than once.
    DuplicateSlot { option: OptionId, slot: TimeSlot },
    /// The solver was given no classes at all.
    NoClasses,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOptions { class } => write!(f, "class '{}' has no options", class),
            Self::EmptyOption { option } => write!(f, "option {} occupies no time slot", option),
            Self::DuplicateSlot { option, slot } => {
                write!(f, "option {} lists slot {} more than once", option, slot)
            }
            Self::NoClasses => write!(f, "at least one class is required"),
        }
    }
}

impl std::error::Error for ScheduleError {}
