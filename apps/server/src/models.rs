use courtside_availability::{
    lenient, Booking, BookingStatus, Court, CourtStatus, SlotStatus, SlotView, Summary,
};
use serde::{Deserialize, Serialize};

// ── Database rows ──

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourtRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub max_slots: i64,
    pub price: i64,
    pub status: String,
    pub unavailable_days: String,
    pub unavailable_hours: String,
    pub day_specific_unavailable_hours: String,
    pub unavailable_dates: String,
}

impl From<CourtRow> for Court {
    fn from(row: CourtRow) -> Self {
        Court {
            status: row.status.parse().unwrap_or(CourtStatus::Inactive),
            unavailable_days: lenient::parse_day_list(&row.unavailable_days),
            unavailable_hours: lenient::parse_string_list(&row.unavailable_hours),
            day_specific_unavailable_hours: lenient::parse_day_hours(
                &row.day_specific_unavailable_hours,
            ),
            unavailable_dates: lenient::parse_string_list(&row.unavailable_dates),
            max_slots: u32::try_from(row.max_slots).unwrap_or(0),
            price: row.price,
            name: row.name,
            location: row.location,
            id: row.id,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub court_id: String,
    pub date: String,
    pub times: String,
    pub status: String,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            times: lenient::parse_string_list(&row.times),
            status: BookingStatus::from(row.status.as_str()),
            court_id: row.court_id,
            date: row.date,
        }
    }
}

/// Everything needed to store a booking request.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub court_id: String,
    pub date: String,
    pub times: Vec<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    pub total_price: i64,
}

// ── API request/response types ──

#[derive(Debug, Serialize)]
pub struct CourtSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub max_slots: u32,
    pub price: i64,
    pub status: CourtStatus,
    pub selectable: bool,
}

impl From<&Court> for CourtSummary {
    fn from(court: &Court) -> Self {
        Self {
            id: court.id.clone(),
            name: court.name.clone(),
            location: court.location.clone(),
            max_slots: court.max_slots,
            price: court.price,
            status: court.status,
            selectable: court.is_selectable(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DaySlotsQuery {
    pub date: Option<String>,
    /// Comma-separated `HH:00` list the client currently has selected.
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotDto {
    pub start: String,
    pub end: String,
    pub label: String,
    pub status: SlotStatus,
    pub interactive: bool,
}

impl From<SlotView> for SlotDto {
    fn from(view: SlotView) -> Self {
        Self {
            start: view.slot.start_24h(),
            end: view.slot.end_24h(),
            label: view.slot.label(),
            status: view.status,
            interactive: view.status.is_interactive(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DaySlotsResponse {
    pub court_id: String,
    pub date: String,
    pub weekday: String,
    pub is_today: bool,
    pub fully_booked: bool,
    pub slots: Vec<SlotDto>,
    /// The submitted selection, minus anything no longer bookable.
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub weekday: String,
    pub is_today: bool,
    pub blocked: bool,
    pub bookable: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub court_id: String,
    pub date: String,
    #[serde(default)]
    pub times: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotConflict {
    pub time: String,
    pub status: SlotStatus,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub court_id: String,
    pub date: String,
    pub times: Vec<String>,
    #[serde(flatten)]
    pub summary: Summary,
    pub path: String,
    pub conflicts: Vec<SlotConflict>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub court_id: String,
    pub date: String,
    #[serde(default)]
    pub times: Vec<String>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct BookingCreated {
    pub id: i64,
    pub status: BookingStatus,
    pub court_id: String,
    pub date: String,
    pub times: Vec<String>,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_availability::DayOfWeek;

    #[test]
    fn test_court_row_decodes_rule_columns() {
        let row = CourtRow {
            id: "1".into(),
            name: "Court 1".into(),
            location: "Main Building".into(),
            max_slots: 4,
            price: 25,
            status: "active".into(),
            unavailable_days: r#"["saturday","sunday"]"#.into(),
            unavailable_hours: r#"["12:00-13:00"]"#.into(),
            day_specific_unavailable_hours: r#"{"monday":["08:00"]}"#.into(),
            unavailable_dates: "not json".into(),
        };
        let court = Court::from(row);
        assert_eq!(court.unavailable_days, vec![DayOfWeek::Saturday, DayOfWeek::Sunday]);
        assert_eq!(court.unavailable_hours, vec!["12:00-13:00"]);
        assert_eq!(court.day_specific_unavailable_hours[DayOfWeek::Monday], vec!["08:00"]);
        assert!(court.unavailable_dates.is_empty());
        assert!(court.is_selectable());
    }

    #[test]
    fn test_booking_row_decodes_times() {
        let booking = Booking::from(BookingRow {
            court_id: "1".into(),
            date: "2025-12-01".into(),
            times: r#"["14:00","15:00"]"#.into(),
            status: "confirmed".into(),
        });
        assert_eq!(booking.times, vec!["14:00", "15:00"]);
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_api_response_error_shape() {
        let body = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "nope");
        assert!(body["data"].is_null());
    }
}
