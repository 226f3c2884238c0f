use chrono::{Datelike, FixedOffset, NaiveDate, Utc};

use crate::error::AvailabilityError;

/// Source of "today". All date-window logic reads the current date through
/// this so it can be pinned in tests.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock at a fixed UTC offset (the venue's local time).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn with_utc_offset_hours(hours: i32) -> Result<Self, AvailabilityError> {
        FixedOffset::east_opt(hours * 3600)
            .map(|offset| Self { offset })
            .ok_or_else(|| AvailabilityError::invalid(format!("UTC offset out of range: {}h", hours)))
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn is_today(clock: &dyn Clock, date: NaiveDate) -> bool {
    clock.today() == date
}

/// Last day of the calendar month after the one `date` falls in.
pub fn end_of_next_month(date: NaiveDate) -> NaiveDate {
    // first day of the month after next, minus one day
    let months = date.year() * 12 + date.month0() as i32 + 2;
    NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Dates offered for booking: today through the end of next month.
pub fn booking_window(clock: &dyn Clock) -> Vec<NaiveDate> {
    let today = clock.today();
    let last = end_of_next_month(today);
    today.iter_days().take_while(|d| *d <= last).collect()
}
