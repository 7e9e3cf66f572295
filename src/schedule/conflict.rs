use std::collections::HashSet;

use super::types::{CourseClass, TimeSlot};

/// Tests whether a combination of options double-books any time slot.
///
/// The occupied-slot set is scratch space that is cleared at the start of
/// every check, so one checker can be reused across a whole search.
#[derive(Debug, Default)]
pub struct ConflictChecker {
    occupied: HashSet<TimeSlot>,
}

impl ConflictChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first slot claimed twice by the combination, walking the
    /// classes in order and each selected option's slots in order.
    ///
    /// `selection[i]` is the option index chosen for `classes[i]`.
    pub fn first_clash(&mut self, classes: &[CourseClass], selection: &[usize]) -> Option<TimeSlot> {
        debug_assert_eq!(classes.len(), selection.len());
        self.occupied.clear();

        for (class, &index) in classes.iter().zip(selection) {
            for slot in class.options()[index].slots() {
                if !self.occupied.insert(*slot) {
                    return Some(*slot);
                }
            }
        }
        None
    }

    pub fn is_conflict_free(&mut self, classes: &[CourseClass], selection: &[usize]) -> bool {
        self.first_clash(classes, selection).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ids::OptionIdAllocator;
    use crate::schedule::types::{Day, Period};

    fn class(ids: &mut OptionIdAllocator, name: &str, options: Vec<Vec<TimeSlot>>) -> CourseClass {
        let options = options
            .into_iter()
            .map(|slots| ids.option(slots).expect("valid option"))
            .collect();
        CourseClass::new(name, options).expect("valid class")
    }

    fn slot(day: Day, period: Period) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    #[test]
    fn test_identical_slot_is_a_conflict() {
        let mut ids = OptionIdAllocator::new();
        let shared = slot(Day::Monday, Period::H0730To0900);
        let classes = vec![
            class(&mut ids, "A", vec![vec![shared]]),
            class(&mut ids, "B", vec![vec![shared]]),
        ];

        let mut checker = ConflictChecker::new();
        assert_eq!(checker.first_clash(&classes, &[0, 0]), Some(shared));
        assert!(!checker.is_conflict_free(&classes, &[0, 0]));
    }

    #[test]
    fn test_disjoint_slots_are_conflict_free() {
        let mut ids = OptionIdAllocator::new();
        let classes = vec![
            class(&mut ids, "A", vec![vec![slot(Day::Monday, Period::H0730To0900)]]),
            class(&mut ids, "B", vec![vec![slot(Day::Tuesday, Period::H0905To1035)]]),
        ];

        let mut checker = ConflictChecker::new();
        assert!(checker.is_conflict_free(&classes, &[0, 0]));
    }

    #[test]
    fn test_same_day_different_period_is_conflict_free() {
        let mut ids = OptionIdAllocator::new();
        let classes = vec![
            class(&mut ids, "A", vec![vec![slot(Day::Monday, Period::H1830To2000)]]),
            class(&mut ids, "B", vec![vec![slot(Day::Monday, Period::H2005To2135)]]),
        ];

        assert!(ConflictChecker::new().is_conflict_free(&classes, &[0, 0]));
    }

    #[test]
    fn test_only_selected_options_are_checked() {
        let mut ids = OptionIdAllocator::new();
        let shared = slot(Day::Thursday, Period::H1830To2000);
        let classes = vec![
            class(&mut ids, "A", vec![vec![shared]]),
            class(
                &mut ids,
                "B",
                vec![vec![shared], vec![slot(Day::Friday, Period::H1830To2000)]],
            ),
        ];

        let mut checker = ConflictChecker::new();
        assert!(!checker.is_conflict_free(&classes, &[0, 0]));
        assert!(checker.is_conflict_free(&classes, &[0, 1]));
    }

    #[test]
    fn test_clash_across_multi_slot_options() {
        let mut ids = OptionIdAllocator::new();
        let classes = vec![
            class(
                &mut ids,
                "BD1",
                vec![vec![
                    slot(Day::Wednesday, Period::H2140To2310),
                    slot(Day::Tuesday, Period::H2005To2135),
                ]],
            ),
            class(
                &mut ids,
                "LP3",
                vec![vec![
                    slot(Day::Tuesday, Period::H1830To2000),
                    slot(Day::Tuesday, Period::H2005To2135),
                    slot(Day::Monday, Period::H2005To2135),
                ]],
            ),
        ];

        assert_eq!(
            ConflictChecker::new().first_clash(&classes, &[0, 0]),
            Some(slot(Day::Tuesday, Period::H2005To2135))
        );
    }

    #[test]
    fn test_scratch_set_does_not_leak_between_checks() {
        let mut ids = OptionIdAllocator::new();
        let shared = slot(Day::Monday, Period::H0730To0900);
        let classes = vec![
            class(&mut ids, "A", vec![vec![shared]]),
            class(
                &mut ids,
                "B",
                vec![vec![shared], vec![slot(Day::Sunday, Period::H0730To0900)]],
            ),
        ];

        let mut checker = ConflictChecker::new();
        assert!(!checker.is_conflict_free(&classes, &[0, 0]));
        assert!(checker.is_conflict_free(&classes, &[0, 1]));
        assert!(checker.is_conflict_free(&classes, &[0, 1]));
    }
}
