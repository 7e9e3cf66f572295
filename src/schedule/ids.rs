use super::error::ScheduleError;
use super::types::{ClassOption, OptionId, TimeSlot};

/// Hands out option identifiers while a catalog is being built.
///
/// Every option built through the same allocator gets a distinct id, in
/// increasing order of construction, whichever class it ends up in.
#[derive(Debug, Default)]
pub struct OptionIdAllocator {
    next: u32,
}

impl OptionIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> OptionId {
        let id = OptionId(self.next);
        self.next += 1;
        id
    }

    /// Builds an option with a freshly allocated id.
    ///
    /// The id is consumed even when the slots are rejected.
    pub fn option(&mut self, slots: Vec<TimeSlot>) -> Result<ClassOption, ScheduleError> {
        ClassOption::new(self.allocate(), slots)
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
