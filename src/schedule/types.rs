use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;
use super::slot_utils;

/// Day of the week a class meets on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
            Day::Sunday => "Sun",
        }
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        slot_utils::parse_day(s).ok_or_else(|| format!("unknown day '{}'", s.trim()))
    }
}

impl TryFrom<String> for Day {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.to_string()
    }
}

/// One of the fixed teaching periods of a day.
///
/// The discriminant is the period's position on the daily grid; the
/// afternoon rows of the grid are never offered, so the evening periods
/// start at 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    H0730To0900 = 0,
    H0905To1035 = 1,
    H1040To1210 = 2,
    H1830To2000 = 15,
    H2005To2135 = 16,
    H2140To2310 = 17,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::H0730To0900,
        Period::H0905To1035,
        Period::H1040To1210,
        Period::H1830To2000,
        Period::H2005To2135,
        Period::H2140To2310,
    ];

    pub fn grid_index(self) -> u8 {
        self as u8
    }

    /// Start and end of the period in minutes since midnight
    fn bounds_in_minutes(self) -> (u32, u32) {
        match self {
            Period::H0730To0900 => (7 * 60 + 30, 9 * 60),
            Period::H0905To1035 => (9 * 60 + 5, 10 * 60 + 35),
            Period::H1040To1210 => (10 * 60 + 40, 12 * 60 + 10),
            Period::H1830To2000 => (18 * 60 + 30, 20 * 60),
            Period::H2005To2135 => (20 * 60 + 5, 21 * 60 + 35),
            Period::H2140To2310 => (21 * 60 + 40, 23 * 60 + 10),
        }
    }

    pub fn start(self) -> NaiveTime {
        slot_utils::minutes_to_time(self.bounds_in_minutes().0)
    }

    pub fn end(self) -> NaiveTime {
        slot_utils::minutes_to_time(self.bounds_in_minutes().1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            slot_utils::format_time(self.start()),
            slot_utils::format_time(self.end())
        )
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        slot_utils::parse_period(s).ok_or_else(|| format!("unknown period '{}'", s.trim()))
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// A fixed weekly meeting time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Day,
    pub period: Period,
}

impl TimeSlot {
    pub fn new(day: Day, period: Period) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.period)
    }
}

/// Identifier handed out by an `OptionIdAllocator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub(crate) u32);

impl OptionId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One way a class could be scheduled: the set of slots it would occupy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassOption {
    id: OptionId,
    slots: Vec<TimeSlot>,
}

impl ClassOption {
    /// Builds an option from its slots, in the order given.
    ///
    /// Rejects an empty slot list and any slot listed twice, since a
    /// repeated slot would later be indistinguishable from a clash with
    /// another class.
    pub fn new(id: OptionId, slots: Vec<TimeSlot>) -> Result<Self, ScheduleError> {
        if slots.is_empty() {
            return Err(ScheduleError::EmptyOption { option: id });
        }

        let mut seen = HashSet::with_capacity(slots.len());
        for slot in &slots {
            if !seen.insert(*slot) {
                return Err(ScheduleError::DuplicateSlot { option: id, slot: *slot });
            }
        }

        Ok(Self { id, slots })
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }
}

/// A class that must be given exactly one of its options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseClass {
    name: String,
    options: Vec<ClassOption>,
}

impl CourseClass {
    pub fn new(name: impl Into<String>, options: Vec<ClassOption>) -> Result<Self, ScheduleError> {
        let name = name.into();
        if options.is_empty() {
            return Err(ScheduleError::NoOptions { class: name });
        }
        Ok(Self { name, options })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[ClassOption] {
        &self.options
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}
