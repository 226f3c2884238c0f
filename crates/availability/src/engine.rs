use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::booking::{BlockingPolicy, Booking};
use crate::court::Court;
use crate::grid::{generate_slot_grid, is_on_grid, Slot};
use crate::selection::Selection;
use crate::time::{DayOfWeek, HourSet, SlotTime};

/// Hour closed every day unless configured otherwise (12:00–13:00).
pub const DEFAULT_CLOSED_HOUR: u8 = 12;

/// Classification of one slot. Exactly one applies; checks run top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStatus {
    ClosedByPolicy,
    UnavailableByCourtConfig,
    Booked,
    Bookable,
    /// Overlay on `Bookable` for slots in the current selection.
    Selected,
}

impl SlotStatus {
    /// Only bookable (or already selected) slots react to clicks.
    pub fn is_interactive(self) -> bool {
        matches!(self, SlotStatus::Bookable | SlotStatus::Selected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::ClosedByPolicy => "closed-by-policy",
            SlotStatus::UnavailableByCourtConfig => "unavailable-by-court-config",
            SlotStatus::Booked => "booked",
            SlotStatus::Bookable => "bookable",
            SlotStatus::Selected => "selected",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-wide rules that sit above any single court's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub closed_hours: HourSet,
    pub blocking: BlockingPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        let mut closed_hours = HourSet::empty();
        if let Ok(noon) = SlotTime::from_hour(DEFAULT_CLOSED_HOUR) {
            closed_hours.insert(noon);
        }
        Self {
            closed_hours,
            blocking: BlockingPolicy::default(),
        }
    }
}

impl Policy {
    /// Availability of one court on one date. `None` when no court is
    /// selected.
    pub fn day(
        &self,
        court: Option<&Court>,
        date: NaiveDate,
        bookings: &[Booking],
    ) -> Option<DayAvailability> {
        court.map(|c| DayAvailability::compute(self, c, date, bookings))
    }

    pub fn classify_slot(
        &self,
        court: Option<&Court>,
        date: NaiveDate,
        bookings: &[Booking],
        slot_start: SlotTime,
    ) -> Option<SlotStatus> {
        self.day(court, date, bookings)
            .map(|day| day.classify(slot_start))
    }

    pub fn is_day_fully_booked(
        &self,
        court: Option<&Court>,
        date: NaiveDate,
        bookings: &[Booking],
    ) -> bool {
        self.day(court, date, bookings)
            .map_or(true, |day| day.is_fully_booked())
    }
}

/// One row of a slot board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    pub slot: Slot,
    pub status: SlotStatus,
}

/// Everything needed to classify slots for one (court, date) pair, computed
/// once. Cheap to cache and to query per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    court_id: String,
    date: NaiveDate,
    weekday: DayOfWeek,
    selectable: bool,
    closed_day: bool,
    policy_closed: HourSet,
    unavailable: HourSet,
    occupied: HourSet,
}

impl DayAvailability {
    pub fn compute(policy: &Policy, court: &Court, date: NaiveDate, bookings: &[Booking]) -> Self {
        let weekday = DayOfWeek::of(date);
        let occupied = bookings
            .iter()
            .filter(|b| b.is_for(&court.id, date) && policy.blocking.blocks(&b.status))
            .map(Booking::occupied_hours)
            .fold(HourSet::empty(), HourSet::union);

        Self {
            court_id: court.id.clone(),
            date,
            weekday,
            selectable: court.is_selectable(),
            closed_day: court.is_closed_on(date),
            policy_closed: policy.closed_hours,
            unavailable: court.unavailable_hours_on(weekday),
            occupied,
        }
    }

    pub fn court_id(&self) -> &str {
        &self.court_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> DayOfWeek {
        self.weekday
    }

    /// Base classification, without the selection overlay.
    /// Hours off the 05:00–23:00 grid are never offered.
    pub fn classify(&self, slot: SlotTime) -> SlotStatus {
        if self.policy_closed.contains(slot) {
            SlotStatus::ClosedByPolicy
        } else if !is_on_grid(slot)
            || !self.selectable
            || self.closed_day
            || self.unavailable.contains(slot)
        {
            SlotStatus::UnavailableByCourtConfig
        } else if self.occupied.contains(slot) {
            SlotStatus::Booked
        } else {
            SlotStatus::Bookable
        }
    }

    /// Classification with the selection overlaid on bookable slots.
    pub fn classify_selected(&self, slot: SlotTime, selection: &Selection) -> SlotStatus {
        match self.classify(slot) {
            SlotStatus::Bookable if selection.contains(slot) => SlotStatus::Selected,
            status => status,
        }
    }

    /// The whole grid with statuses, in start order.
    pub fn board(&self, selection: &Selection) -> Vec<SlotView> {
        generate_slot_grid()
            .into_iter()
            .map(|slot| SlotView {
                slot,
                status: self.classify_selected(slot.start, selection),
            })
            .collect()
    }

    pub fn bookable_count(&self) -> usize {
        generate_slot_grid()
            .iter()
            .filter(|s| self.classify(s.start) == SlotStatus::Bookable)
            .count()
    }

    /// True when the date should be disabled in a date picker.
    pub fn is_fully_booked(&self) -> bool {
        !self.selectable || self.closed_day || self.bookable_count() == 0
    }

    /// Selected slots that are no longer bookable on this day.
    pub fn conflicts(&self, selection: &Selection) -> Vec<(SlotTime, SlotStatus)> {
        selection
            .iter()
            .map(|slot| (slot, self.classify(slot)))
            .filter(|(_, status)| *status != SlotStatus::Bookable)
            .collect()
    }
}

/// Classify one slot under the default policy.
pub fn classify_slot(
    court: Option<&Court>,
    date: NaiveDate,
    bookings: &[Booking],
    slot_start: SlotTime,
) -> Option<SlotStatus> {
    Policy::default().classify_slot(court, date, bookings, slot_start)
}

/// Day-level rollup under the default policy. A missing court blocks the day.
pub fn is_day_fully_booked(court: Option<&Court>, date: NaiveDate, bookings: &[Booking]) -> bool {
    Policy::default().is_day_fully_booked(court, date, bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus;
    use crate::court::CourtStatus;

    fn slot(s: &str) -> SlotTime {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        crate::time::parse_date(s).unwrap()
    }

    fn court(id: &str) -> Court {
        Court {
            id: id.into(),
            price: 25,
            ..Court::default()
        }
    }

    fn booking(court_id: &str, day: &str, times: &[&str], status: BookingStatus) -> Booking {
        Booking {
            court_id: court_id.into(),
            date: day.into(),
            times: times.iter().map(|t| t.to_string()).collect(),
            status,
        }
    }

    #[test]
    fn test_noon_is_closed_by_policy() {
        let c = court("c1");
        let bookings = vec![booking("c1", "2025-12-01", &["12:00"], BookingStatus::Confirmed)];
        let status = classify_slot(Some(&c), date("2025-12-01"), &bookings, slot("12:00"));
        assert_eq!(status, Some(SlotStatus::ClosedByPolicy));
    }

    #[test]
    fn test_policy_beats_court_config() {
        let c = Court {
            unavailable_hours: vec!["12:00".into()],
            status: CourtStatus::Maintenance,
            ..court("c1")
        };
        let status = classify_slot(Some(&c), date("2025-12-01"), &[], slot("12:00"));
        assert_eq!(status, Some(SlotStatus::ClosedByPolicy));
    }

    #[test]
    fn test_config_beats_booking() {
        let c = Court {
            unavailable_hours: vec!["14:00".into()],
            ..court("c1")
        };
        let bookings = vec![booking("c1", "2025-12-01", &["14:00"], BookingStatus::Confirmed)];
        let status = classify_slot(Some(&c), date("2025-12-01"), &bookings, slot("14:00"));
        assert_eq!(status, Some(SlotStatus::UnavailableByCourtConfig));
    }

    #[test]
    fn test_day_specific_hours_follow_weekday() {
        let mut c = court("c1");
        c.day_specific_unavailable_hours[DayOfWeek::Monday] = vec!["18:00".into()];
        // 2025-12-01 is a Monday, 2025-12-02 a Tuesday
        assert_eq!(
            classify_slot(Some(&c), date("2025-12-01"), &[], slot("18:00")),
            Some(SlotStatus::UnavailableByCourtConfig)
        );
        assert_eq!(
            classify_slot(Some(&c), date("2025-12-02"), &[], slot("18:00")),
            Some(SlotStatus::Bookable)
        );
    }

    #[test]
    fn test_pending_booking_does_not_block_by_default() {
        let c = court("c1");
        let bookings = vec![booking("c1", "2025-12-01", &["09:00"], BookingStatus::Pending)];
        assert_eq!(
            classify_slot(Some(&c), date("2025-12-01"), &bookings, slot("09:00")),
            Some(SlotStatus::Bookable)
        );
    }

    #[test]
    fn test_any_status_policy_blocks_pending() {
        let policy = Policy {
            blocking: BlockingPolicy::AnyStatus,
            ..Policy::default()
        };
        let c = court("c1");
        let bookings = vec![booking("c1", "2025-12-01", &["09:00"], BookingStatus::Pending)];
        assert_eq!(
            policy.classify_slot(Some(&c), date("2025-12-01"), &bookings, slot("09:00")),
            Some(SlotStatus::Booked)
        );
    }

    #[test]
    fn test_other_courts_bookings_ignored() {
        let c = court("c1");
        let bookings = vec![booking("c2", "2025-12-01", &["09:00"], BookingStatus::Confirmed)];
        assert_eq!(
            classify_slot(Some(&c), date("2025-12-01"), &bookings, slot("09:00")),
            Some(SlotStatus::Bookable)
        );
    }

    #[test]
    fn test_no_court_classifies_nothing() {
        assert_eq!(classify_slot(None, date("2025-12-01"), &[], slot("09:00")), None);
        assert!(is_day_fully_booked(None, date("2025-12-01"), &[]));
    }

    #[test]
    fn test_custom_closed_hours() {
        let policy = Policy {
            closed_hours: [slot("12:00"), slot("13:00")].into_iter().collect(),
            ..Policy::default()
        };
        let c = court("c1");
        assert_eq!(
            policy.classify_slot(Some(&c), date("2025-12-01"), &[], slot("13:00")),
            Some(SlotStatus::ClosedByPolicy)
        );
    }

    #[test]
    fn test_selected_overlay_only_on_bookable() {
        let c = Court {
            unavailable_hours: vec!["09:00".into()],
            ..court("c1")
        };
        let day = DayAvailability::compute(&Policy::default(), &c, date("2025-12-01"), &[]);
        let selection = Selection::from_slots([slot("09:00"), slot("10:00")]);
        assert_eq!(
            day.classify_selected(slot("09:00"), &selection),
            SlotStatus::UnavailableByCourtConfig
        );
        assert_eq!(day.classify_selected(slot("10:00"), &selection), SlotStatus::Selected);
        assert_eq!(day.classify_selected(slot("11:00"), &selection), SlotStatus::Bookable);
    }

    #[test]
    fn test_board_covers_grid() {
        let c = court("c1");
        let day = DayAvailability::compute(&Policy::default(), &c, date("2025-12-01"), &[]);
        let board = day.board(&Selection::new());
        assert_eq!(board.len(), 19);
        assert_eq!(board[7].status, SlotStatus::ClosedByPolicy);
        assert_eq!(day.bookable_count(), 18);
    }

    #[test]
    fn test_day_fully_booked_when_all_slots_taken() {
        let c = court("c1");
        let all: Vec<String> = generate_slot_grid().iter().map(|s| s.start_24h()).collect();
        let all: Vec<&str> = all.iter().map(String::as_str).collect();
        let bookings = vec![booking("c1", "2025-12-01", &all, BookingStatus::Confirmed)];
        assert!(is_day_fully_booked(Some(&c), date("2025-12-01"), &bookings));
        assert!(!is_day_fully_booked(Some(&c), date("2025-12-02"), &bookings));
    }

    #[test]
    fn test_day_fully_booked_with_one_slot_left() {
        let c = court("c1");
        let times: Vec<String> = generate_slot_grid()
            .iter()
            .map(|s| s.start_24h())
            .filter(|t| t != "22:00")
            .collect();
        let times: Vec<&str> = times.iter().map(String::as_str).collect();
        let bookings = vec![booking("c1", "2025-12-01", &times, BookingStatus::Confirmed)];
        assert!(!is_day_fully_booked(Some(&c), date("2025-12-01"), &bookings));
    }

    #[test]
    fn test_day_blocked_by_unavailable_date() {
        let c = Court {
            unavailable_dates: vec!["2025-12-25".into()],
            ..court("c1")
        };
        assert!(is_day_fully_booked(Some(&c), date("2025-12-25"), &[]));
        assert_eq!(
            classify_slot(Some(&c), date("2025-12-25"), &[], slot("09:00")),
            Some(SlotStatus::UnavailableByCourtConfig)
        );
    }

    #[test]
    fn test_conflicts_lists_taken_selection() {
        let c = court("c1");
        let bookings = vec![booking("c1", "2025-12-01", &["10:00"], BookingStatus::Confirmed)];
        let day = DayAvailability::compute(&Policy::default(), &c, date("2025-12-01"), &bookings);
        let selection = Selection::from_slots([slot("09:00"), slot("10:00"), slot("12:00")]);
        assert_eq!(
            day.conflicts(&selection),
            vec![
                (slot("10:00"), SlotStatus::Booked),
                (slot("12:00"), SlotStatus::ClosedByPolicy)
            ]
        );
    }

    #[test]
    fn test_hours_off_the_grid_are_never_bookable() {
        let c = court("c1");
        let day = date("2025-12-01");
        for off_grid in ["00:00", "03:00", "04:00"] {
            let status = classify_slot(Some(&c), day, &[], slot(off_grid));
            assert_eq!(status, Some(SlotStatus::UnavailableByCourtConfig), "{}", off_grid);
            let picked = crate::selection::toggle_slot(&Selection::new(), slot(off_grid), status.unwrap());
            assert!(picked.is_empty());
        }

        let avail = DayAvailability::compute(&Policy::default(), &c, day, &[]);
        let selection = Selection::from_slots([slot("03:00"), slot("09:00")]);
        assert_eq!(
            avail.conflicts(&selection),
            vec![(slot("03:00"), SlotStatus::UnavailableByCourtConfig)]
        );
    }
}
