use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::SlotStatus;
use crate::error::AvailabilityError;
use crate::grid::is_on_grid;
use crate::request::BookingRequest;
use crate::time::{format_12h, SlotTime};

/// Slot start times a user has picked for one court on one date.
///
/// Immutable: every change returns a new value, kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<SlotTime>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: impl IntoIterator<Item = SlotTime>) -> Self {
        Self(slots.into_iter().collect())
    }

    /// Parse `HH:00` strings. Any malformed or off-grid entry fails the
    /// whole parse.
    pub fn parse<S: AsRef<str>>(times: &[S]) -> Result<Self, AvailabilityError> {
        times
            .iter()
            .map(|t| {
                let slot = t.as_ref().parse::<SlotTime>()?;
                if is_on_grid(slot) {
                    Ok(slot)
                } else {
                    Err(AvailabilityError::invalid(format!("{} is not on the slot grid", slot)))
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, slot: SlotTime) -> bool {
        self.0.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.0.iter().copied()
    }

    /// Start times as zero-padded strings, ascending.
    pub fn times(&self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }

    /// Remove `slot` if present, otherwise add it if it is bookable.
    pub fn try_toggle(&self, slot: SlotTime, status: SlotStatus) -> Result<Self, AvailabilityError> {
        let mut next = self.0.clone();
        if next.remove(&slot) {
            return Ok(Self(next));
        }
        if status != SlotStatus::Bookable || !is_on_grid(slot) {
            return Err(AvailabilityError::IllegalToggle { slot, status });
        }
        next.insert(slot);
        Ok(Self(next))
    }

    /// Forgiving toggle: an illegal toggle leaves the selection unchanged.
    pub fn toggle(&self, slot: SlotTime, status: SlotStatus) -> Self {
        self.try_toggle(slot, status).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring toggle");
            self.clone()
        })
    }

    /// Start of the first slot and end hour of the last one, when the
    /// selection is a single unbroken block.
    pub fn contiguous_range(&self) -> Option<(SlotTime, u8)> {
        let first = *self.0.first()?;
        let last = *self.0.last()?;
        let span = usize::from(last.hour() - first.hour()) + 1;
        (span == self.0.len()).then(|| (first, last.end_hour()))
    }
}

/// Toggle one slot. Non-interactive slots are never added.
pub fn toggle_slot(selection: &Selection, slot_start: SlotTime, slot_status: SlotStatus) -> Selection {
    selection.toggle(slot_start, slot_status)
}

/// Price and label of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_price: i64,
    pub slot_count: usize,
    pub label: String,
}

/// Price is linear in slot count. An absurd price saturates rather than
/// wrapping.
pub fn summarize(selection: &Selection, price_per_hour: i64) -> Summary {
    let slot_count = selection.len();
    let label = if slot_count == 0 {
        "No time selected".to_string()
    } else if let Some((start, end_hour)) = selection.contiguous_range() {
        format!("{} - {}", start.label_12h(), format_12h(end_hour))
    } else {
        format!("{} slots", slot_count)
    };
    let total_price = i64::try_from(slot_count)
        .ok()
        .and_then(|count| price_per_hour.checked_mul(count))
        .unwrap_or_else(|| {
            tracing::warn!(price_per_hour, slot_count, "total price overflows, saturating");
            if price_per_hour < 0 {
                i64::MIN
            } else {
                i64::MAX
            }
        });
    Summary {
        total_price,
        slot_count,
        label,
    }
}

/// The in-progress choice of court, date and slots.
///
/// Changing the court or the date drops the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingScope {
    court_id: Option<String>,
    date: NaiveDate,
    selection: Selection,
}

impl BookingScope {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            court_id: None,
            date,
            selection: Selection::new(),
        }
    }

    pub fn court_id(&self) -> Option<&str> {
        self.court_id.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_court(&self, court_id: impl Into<String>) -> Self {
        let court_id = court_id.into();
        if self.court_id.as_deref() == Some(court_id.as_str()) {
            return self.clone();
        }
        Self {
            court_id: Some(court_id),
            date: self.date,
            selection: Selection::new(),
        }
    }

    pub fn select_date(&self, date: NaiveDate) -> Self {
        if self.date == date {
            return self.clone();
        }
        Self {
            court_id: self.court_id.clone(),
            date,
            selection: Selection::new(),
        }
    }

    /// Toggle within the scope. Ignored when no court is selected.
    pub fn toggle(&self, slot: SlotTime, status: SlotStatus) -> Self {
        if self.court_id.is_none() {
            return self.clone();
        }
        Self {
            court_id: self.court_id.clone(),
            date: self.date,
            selection: self.selection.toggle(slot, status),
        }
    }

    pub fn to_request(&self) -> Result<BookingRequest, AvailabilityError> {
        let court_id = self
            .court_id
            .clone()
            .ok_or(AvailabilityError::NoCourtSelected)?;
        BookingRequest::new(court_id, self.date, self.selection.clone())
    }
}
