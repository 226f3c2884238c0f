use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lenient;
use crate::time::{parse_clock_minutes, parse_date, DayOfWeek, HourSet, SlotTime, WeekdayMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CourtStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl CourtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourtStatus::Active => "active",
            CourtStatus::Maintenance => "maintenance",
            CourtStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CourtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtStatus {
    type Err = std::convert::Infallible;

    /// Unknown statuses read as `Inactive` so a court never becomes bookable
    /// by accident.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "active" => CourtStatus::Active,
            "maintenance" => CourtStatus::Maintenance,
            _ => CourtStatus::Inactive,
        })
    }
}

impl Serialize for CourtStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CourtStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// A court's static configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub max_slots: u32,
    /// Hourly price in whole currency units.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub status: CourtStatus,
    #[serde(default, deserialize_with = "lenient::day_list")]
    pub unavailable_days: Vec<DayOfWeek>,
    /// `HH:00` entries, or `HH:MM-HH:MM` ranges.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub unavailable_hours: Vec<String>,
    #[serde(default, deserialize_with = "lenient::day_hours")]
    pub day_specific_unavailable_hours: WeekdayMap<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub unavailable_dates: Vec<String>,
}

impl Court {
    /// Only active courts take bookings.
    pub fn is_selectable(&self) -> bool {
        self.status == CourtStatus::Active
    }

    /// Closed for the whole day, by weekday or by explicit date.
    pub fn is_closed_on(&self, date: NaiveDate) -> bool {
        self.unavailable_days.contains(&DayOfWeek::of(date))
            || self
                .unavailable_dates
                .iter()
                .any(|d| parse_date(d).map_or(false, |d| d == date))
    }

    /// Hours blocked by court configuration on the given weekday: the
    /// all-week rules plus that day's own rules.
    pub fn unavailable_hours_on(&self, day: DayOfWeek) -> HourSet {
        compile_rules(&self.unavailable_hours)
            .union(compile_rules(&self.day_specific_unavailable_hours[day]))
    }
}

fn compile_rules(entries: &[String]) -> HourSet {
    entries
        .iter()
        .filter_map(|entry| parse_hour_rule(entry))
        .fold(HourSet::empty(), HourSet::union)
}

/// Parse one unavailability entry into the hours it blocks.
///
/// `HH:00` blocks that hour. `HH:MM-HH:MM` blocks every hour whose slot
/// overlaps the range. Blank entries are ignored; anything else is logged and
/// ignored.
pub(crate) fn parse_hour_rule(entry: &str) -> Option<HourSet> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    if let Some((from, to)) = entry.split_once('-') {
        let range = parse_clock_minutes(from).zip(parse_clock_minutes(to));
        return match range {
            Some((start, end)) if start < end => Some(
                (0..24u8)
                    .filter(|h| {
                        let slot_start = u16::from(*h) * 60;
                        slot_start < end && slot_start + 60 > start
                    })
                    .filter_map(|h| SlotTime::from_hour(h).ok())
                    .collect(),
            ),
            _ => {
                tracing::warn!(entry, "skipping malformed hour range");
                None
            }
        };
    }

    match entry.parse::<SlotTime>() {
        Ok(slot) => Some(HourSet::single(slot)),
        Err(_) => {
            tracing::warn!(entry, "skipping malformed unavailable hour");
            None
        }
    }
}
