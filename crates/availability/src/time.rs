use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AvailabilityError;

// ── Slot start time ──

/// Start of an hour-long slot. Always rendered zero-padded (`"05:00"`), so
/// the string form sorts the same way as the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(u8);

impl SlotTime {
    pub fn from_hour(hour: u8) -> Result<Self, AvailabilityError> {
        if hour < 24 {
            Ok(Self(hour))
        } else {
            Err(AvailabilityError::invalid(format!("hour out of range: {}", hour)))
        }
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// Hour the slot ends at (24 for the 23:00 slot).
    pub fn end_hour(self) -> u8 {
        self.0 + 1
    }

    /// 12-hour label of the start boundary, e.g. `"5:00 AM"`.
    pub fn label_12h(self) -> String {
        format_12h(self.0)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for SlotTime {
    type Err = AvailabilityError;

    /// Accepts only `HH:00` with a two-digit hour.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2] == b':'
            && &s[3..] == "00";
        if !well_formed {
            return Err(AvailabilityError::invalid(format!(
                "slot start must look like HH:00, got {:?}",
                s
            )));
        }
        let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        Self::from_hour(hour)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Format a boundary hour (0..=24) as a 12-hour clock label.
pub(crate) fn format_12h(hour: u8) -> String {
    let hour = hour % 24;
    let period = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", hour12, period)
}

/// Parse `HH:MM` into minutes since midnight. `24:00` is allowed as an end
/// boundary.
pub(crate) fn parse_clock_minutes(s: &str) -> Option<u16> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hours: u16 = h.parse().ok()?;
    let minutes: u16 = m.parse().ok()?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parse a naive calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate, AvailabilityError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AvailabilityError::invalid(format!("date must be YYYY-MM-DD, got {:?}", s)))
}

// ── Hour sets ──

/// Set of hours of the day, one bit per hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HourSet(u32);

impl HourSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn single(slot: SlotTime) -> Self {
        Self(1 << slot.hour())
    }

    pub fn insert(&mut self, slot: SlotTime) {
        self.0 |= 1 << slot.hour();
    }

    pub fn contains(self, slot: SlotTime) -> bool {
        self.0 & (1 << slot.hour()) != 0
    }

    pub fn union(self, other: HourSet) -> HourSet {
        Self(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = SlotTime> {
        (0..24u8)
            .filter(move |h| self.0 & (1 << h) != 0)
            .map(SlotTime)
    }
}

impl FromIterator<SlotTime> for HourSet {
    fn from_iter<I: IntoIterator<Item = SlotTime>>(iter: I) -> Self {
        let mut set = HourSet::empty();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

// ── Weekdays ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| AvailabilityError::invalid(format!("unknown weekday {:?}", s)))
    }
}

/// Fixed mapping from each weekday to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayMap<T>([T; 7]);

impl<T> WeekdayMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &T)> {
        DayOfWeek::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<DayOfWeek> for WeekdayMap<T> {
    type Output = T;

    fn index(&self, day: DayOfWeek) -> &T {
        &self.0[day.index()]
    }
}

impl<T> IndexMut<DayOfWeek> for WeekdayMap<T> {
    fn index_mut(&mut self, day: DayOfWeek) -> &mut T {
        &mut self.0[day.index()]
    }
}

impl<T: Serialize> Serialize for WeekdayMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(day, value)| (day.name(), value)))
    }
}
