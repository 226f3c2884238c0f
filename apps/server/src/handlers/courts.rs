use axum::{
    extract::{Path, Query, State},
    Json,
};
use courtside_availability::{
    booking_window, clock::is_today, parse_date, Booking, DayAvailability, Selection, SlotStatus,
};
use std::collections::HashMap;
use std::sync::Arc;

use super::{day_availability, find_court, fmt_date};
use crate::db;
use crate::error::AppError;
use crate::models::{ApiResponse, CalendarDay, CourtSummary, DaySlotsQuery, DaySlotsResponse, SlotDto};
use crate::AppState;

/// GET /api/courts
pub async fn list_courts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CourtSummary>>>, AppError> {
    let courts = db::list_courts(&state.db).await?;
    Ok(Json(ApiResponse::success(
        courts.iter().map(CourtSummary::from).collect(),
    )))
}

fn parse_selected(raw: Option<&str>) -> Result<Selection, AppError> {
    let times: Vec<&str> = raw
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    Ok(Selection::parse(times.as_slice())?)
}

/// GET /api/courts/{id}/slots?date=YYYY-MM-DD&selected=09:00,10:00
///
/// The 19-slot board for one day. `date` defaults to today in the configured
/// timezone.
pub async fn day_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DaySlotsQuery>,
) -> Result<Json<ApiResponse<DaySlotsResponse>>, AppError> {
    let court = find_court(&state, &id).await?;
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => state.clock.today(),
    };
    let requested = parse_selected(query.selected.as_deref())?;

    let day = day_availability(&state, &court, date).await?;

    // Picks that stopped being bookable are dropped from the echo
    let selection = Selection::from_slots(
        requested
            .iter()
            .filter(|slot| day.classify(*slot) == SlotStatus::Bookable),
    );

    Ok(Json(ApiResponse::success(DaySlotsResponse {
        court_id: court.id,
        date: fmt_date(date),
        weekday: day.weekday().to_string(),
        is_today: is_today(state.clock.as_ref(), date),
        fully_booked: day.is_fully_booked(),
        slots: day.board(&selection).into_iter().map(SlotDto::from).collect(),
        selected: selection.times(),
    })))
}

/// GET /api/courts/{id}/dates
///
/// Every date in the booking window with its day-level state, for a date
/// picker. One bookings query covers the whole window.
pub async fn booking_dates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CalendarDay>>>, AppError> {
    let court = find_court(&state, &id).await?;
    let window = booking_window(state.clock.as_ref());
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Ok(Json(ApiResponse::success(Vec::new())));
    };

    let bookings = db::bookings_between(&state.db, &court.id, &fmt_date(*first), &fmt_date(*last)).await?;
    let mut by_date: HashMap<String, Vec<Booking>> = HashMap::new();
    for booking in bookings {
        by_date.entry(booking.date.clone()).or_default().push(booking);
    }

    let today = state.clock.today();
    let days = window
        .iter()
        .map(|&date| {
            let key = fmt_date(date);
            let on_day = by_date.get(&key).map(Vec::as_slice).unwrap_or(&[]);
            let day = DayAvailability::compute(&state.policy, &court, date, on_day);
            CalendarDay {
                weekday: day.weekday().to_string(),
                is_today: date == today,
                blocked: day.is_fully_booked(),
                bookable: day.bookable_count(),
                date: key,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(days)))
}
