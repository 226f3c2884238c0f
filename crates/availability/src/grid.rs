use crate::time::{format_12h, SlotTime};

/// First slot of the day starts at 05:00.
pub const FIRST_SLOT_HOUR: u8 = 5;
/// Last slot of the day starts at 23:00.
pub const LAST_SLOT_HOUR: u8 = 23;
/// Number of hour slots in the daily grid.
pub const SLOTS_PER_DAY: usize = (LAST_SLOT_HOUR - FIRST_SLOT_HOUR + 1) as usize;

/// One hour on the daily grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub start: SlotTime,
}

impl Slot {
    pub fn start_24h(&self) -> String {
        self.start.to_string()
    }

    /// End boundary in 24-hour form. The 23:00 slot ends at `"00:00"`.
    pub fn end_24h(&self) -> String {
        format!("{:02}:00", self.start.end_hour() % 24)
    }

    /// e.g. `"2:00 PM - 3:00 PM"`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            format_12h(self.start.hour()),
            format_12h(self.start.end_hour())
        )
    }
}

/// The fixed 05:00–23:00 grid, in start order.
pub fn generate_slot_grid() -> Vec<Slot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .filter_map(|hour| SlotTime::from_hour(hour).ok())
        .map(|start| Slot { start })
        .collect()
}

/// Whether a start time lies on the grid.
pub fn is_on_grid(slot: SlotTime) -> bool {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&slot.hour())
}
