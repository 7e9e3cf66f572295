use chrono::{Duration, NaiveTime, Timelike};

use super::types::{Day, Period, TimeSlot};

/// Parses a day name. Accepts English names and abbreviations as well as
/// the Portuguese abbreviations used by the course catalog (SEG..DOM).
pub fn parse_day(value: &str) -> Option<Day> {
    let lower = value.trim().to_lowercase();
    let day = match lower.as_str() {
        "monday" | "mon" | "seg" => Day::Monday,
        "tuesday" | "tue" | "ter" => Day::Tuesday,
        "wednesday" | "wed" | "qua" => Day::Wednesday,
        "thursday" | "thu" | "qui" => Day::Thursday,
        "friday" | "fri" | "sex" => Day::Friday,
        "saturday" | "sat" | "sab" | "sáb" => Day::Saturday,
        "sunday" | "sun" | "dom" => Day::Sunday,
        _ => return None,
    };
    Some(day)
}

/// Parses a time string (HH:MM)
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Formats a time as HH:MM
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Converts minutes since midnight to a time of day, wrapping past 24:00
pub fn minutes_to_time(minutes: u32) -> NaiveTime {
    NaiveTime::default() + Duration::minutes(i64::from(minutes % (24 * 60)))
}

/// Parses a period given as its time range, e.g. "07:30-09:00" or
/// "07:30 – 09:00". Only the ranges of the fixed grid are recognised.
pub fn parse_period(value: &str) -> Option<Period> {
    let normalized = value.replace('–', "-");
    let (start, end) = normalized.split_once('-')?;
    let start = parse_time(start)?;
    let end = parse_time(end)?;

    Period::ALL
        .iter()
        .copied()
        .find(|p| p.start() == start && p.end() == end)
}

/// Formats the slots of an option as "Day-HH:MM - HH:MM" entries joined by commas
pub fn format_slots(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("07:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(parse_time(" 21:40 "), NaiveTime::from_hms_opt(21, 40, 0));
        assert_eq!(parse_time("7h30"), None);
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn test_minutes_to_time() {
        assert_eq!(format_time(minutes_to_time(0)), "00:00");
        assert_eq!(format_time(minutes_to_time(9 * 60 + 5)), "09:05");
        assert_eq!(format_time(minutes_to_time(24 * 60 + 15)), "00:15");
    }

    #[test]
    fn test_parse_period_accepts_separators() {
        assert_eq!(parse_period("18:30-20:00"), Some(Period::H1830To2000));
        assert_eq!(parse_period("18:30 - 20:00"), Some(Period::H1830To2000));
        assert_eq!(parse_period("18:30 – 20:00"), Some(Period::H1830To2000));
        assert_eq!(parse_period("18:30"), None);
        assert_eq!(parse_period("18:30-20:05"), None);
    }

    #[test]
    fn test_format_slots() {
        let slots = [
            TimeSlot::new(Day::Tuesday, Period::H2140To2310),
            TimeSlot::new(Day::Monday, Period::H2140To2310),
        ];
        assert_eq!(
            format_slots(&slots),
            "Tue-21:40 - 23:10, Mon-21:40 - 23:10"
        );
    }
}
