use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AvailabilityError;
use crate::lenient;
use crate::time::{parse_date, HourSet, SlotTime};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for BookingStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            other => BookingStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(BookingStatus::from).unwrap_or_default())
    }
}

/// An existing reservation. Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "lenient::id")]
    pub court_id: String,
    /// Naive local date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub times: Vec<String>,
    /// A missing status reads as `pending`.
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_for(&self, court_id: &str, date: NaiveDate) -> bool {
        self.court_id == court_id && parse_date(&self.date).map_or(false, |d| d == date)
    }

    /// Well-formed start times of this booking. Junk entries are skipped.
    pub fn occupied_hours(&self) -> HourSet {
        self.times
            .iter()
            .filter_map(|t| match t.parse::<SlotTime>() {
                Ok(slot) => Some(slot),
                Err(_) => {
                    tracing::warn!(court_id = %self.court_id, date = %self.date, time = %t, "skipping malformed booking time");
                    None
                }
            })
            .collect()
    }
}

/// Which booking statuses take a slot off the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockingPolicy {
    /// Only confirmed bookings occupy slots.
    #[default]
    ConfirmedOnly,
    /// Every booking occupies its slots, whatever its status.
    AnyStatus,
}

impl BlockingPolicy {
    pub fn blocks(self, status: &BookingStatus) -> bool {
        match self {
            BlockingPolicy::ConfirmedOnly => *status == BookingStatus::Confirmed,
            BlockingPolicy::AnyStatus => true,
        }
    }
}

impl FromStr for BlockingPolicy {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(BlockingPolicy::ConfirmedOnly),
            "all" | "any" => Ok(BlockingPolicy::AnyStatus),
            other => Err(AvailabilityError::invalid(format!(
                "blocking policy must be \"confirmed\" or \"all\", got {:?}",
                other
            ))),
        }
    }
}
