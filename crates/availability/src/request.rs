use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AvailabilityError;
use crate::selection::Selection;
use crate::time::parse_date;

const SUMMARY_ROUTE: &str = "/booking-summary";

/// A selection ready to hand to the booking-summary step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub court_id: String,
    pub date: NaiveDate,
    pub times: Selection,
}

impl BookingRequest {
    pub fn new(
        court_id: impl Into<String>,
        date: NaiveDate,
        times: Selection,
    ) -> Result<Self, AvailabilityError> {
        let court_id = court_id.into();
        if court_id.is_empty() || court_id.contains('/') {
            return Err(AvailabilityError::invalid(format!(
                "court id {:?} cannot be used in a booking path",
                court_id
            )));
        }
        if times.is_empty() {
            return Err(AvailabilityError::invalid("no time slots selected"));
        }
        Ok(Self {
            court_id,
            date,
            times,
        })
    }

    /// `/booking-summary/{court}/{YYYY-MM-DD}/{HH:00,HH:00,...}`
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            SUMMARY_ROUTE,
            self.court_id,
            self.date.format("%Y-%m-%d"),
            self.times.times().join(",")
        )
    }

    pub fn from_path(path: &str) -> Result<Self, AvailabilityError> {
        let rest = path
            .strip_prefix(SUMMARY_ROUTE)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| AvailabilityError::invalid(format!("not a booking path: {:?}", path)))?;

        let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
        let [court_id, date, times] = parts.as_slice() else {
            return Err(AvailabilityError::invalid(format!(
                "booking path needs court, date and times: {:?}",
                path
            )));
        };

        let date = parse_date(date)?;
        let times: Vec<&str> = times.split(',').filter(|t| !t.is_empty()).collect();
        Self::new(*court_id, date, Selection::parse(times.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_format() {
        let request = BookingRequest::new(
            "2",
            parse_date("2025-11-03").unwrap(),
            Selection::parse(&["15:00", "14:00"]).unwrap(),
        )
        .unwrap();
        assert_eq!(request.path(), "/booking-summary/2/2025-11-03/14:00,15:00");
    }

    #[test]
    fn test_from_path() {
        let request = BookingRequest::from_path("/booking-summary/c1/2025-12-01/09:00,10:00").unwrap();
        assert_eq!(request.court_id, "c1");
        assert_eq!(request.date, parse_date("2025-12-01").unwrap());
        assert_eq!(request.times.times(), vec!["09:00", "10:00"]);
        assert_eq!(request.path(), "/booking-summary/c1/2025-12-01/09:00,10:00");
    }

    #[test]
    fn test_from_path_rejects_bad_input() {
        for path in [
            "/courts/c1/2025-12-01/09:00",
            "/booking-summary/c1/2025-12-01",
            "/booking-summary/c1/12-01-2025/09:00",
            "/booking-summary/c1/2025-12-01/9:00",
            "/booking-summary/c1/2025-12-01/",
            "/booking-summary//2025-12-01/09:00",
        ] {
            assert!(
                matches!(BookingRequest::from_path(path), Err(AvailabilityError::InvalidInput(_))),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_new_rejects_empty_selection() {
        let err = BookingRequest::new("c1", parse_date("2025-12-01").unwrap(), Selection::new());
        assert!(err.is_err());
    }
}
