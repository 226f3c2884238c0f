use axum::{extract::State, Json};
use courtside_availability::{
    booking_window, parse_date, summarize, BookingRequest, BookingStatus, Selection, SlotStatus,
    SlotTime,
};
use std::sync::Arc;

use super::{day_availability, find_court, fmt_date};
use crate::db;
use crate::error::AppError;
use crate::models::{
    ApiResponse, BookingCreated, CreateBookingRequest, NewBooking, QuoteRequest, QuoteResponse,
    SlotConflict,
};
use crate::AppState;

fn to_conflicts(conflicts: Vec<(SlotTime, SlotStatus)>) -> Vec<SlotConflict> {
    conflicts
        .into_iter()
        .map(|(slot, status)| SlotConflict {
            time: slot.to_string(),
            status,
        })
        .collect()
}

/// POST /api/quote
///
/// Price and summary-page path for a selection, plus any picked slot that is
/// no longer bookable.
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, AppError> {
    let court = find_court(&state, &body.court_id).await?;
    let date = parse_date(&body.date)?;
    let selection = Selection::parse(body.times.as_slice())?;
    let request = BookingRequest::new(court.id.clone(), date, selection)?;

    let day = day_availability(&state, &court, date).await?;
    let conflicts = to_conflicts(day.conflicts(&request.times));

    Ok(Json(ApiResponse::success(QuoteResponse {
        court_id: court.id.clone(),
        date: fmt_date(date),
        times: request.times.times(),
        summary: summarize(&request.times, court.price),
        path: request.path(),
        conflicts,
    })))
}

/// POST /api/bookings
///
/// Re-checks availability against fresh data and stores the request as
/// `pending`. Admin confirmation happens elsewhere.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingCreated>>, AppError> {
    let full_name = body.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("full name is required".into()));
    }
    let email = body.email.trim();
    if !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }

    let court = find_court(&state, &body.court_id).await?;
    if !court.is_selectable() {
        return Err(AppError::Conflict(format!(
            "{} is not taking bookings ({})",
            court.name, court.status
        )));
    }

    let date = parse_date(&body.date)?;
    if !booking_window(state.clock.as_ref()).contains(&date) {
        return Err(AppError::BadRequest(format!(
            "{} is outside the booking window",
            fmt_date(date)
        )));
    }

    let selection = Selection::parse(body.times.as_slice())?;
    let request = BookingRequest::new(court.id.clone(), date, selection)?;

    // Never trust a cached board for a write
    state.cache.invalidate(&court.id, date);
    let day = day_availability(&state, &court, date).await?;
    let conflicts = day.conflicts(&request.times);
    if !conflicts.is_empty() {
        let taken: Vec<String> = conflicts
            .iter()
            .map(|(slot, status)| format!("{} ({})", slot, status))
            .collect();
        return Err(AppError::Conflict(format!(
            "slots no longer available: {}",
            taken.join(", ")
        )));
    }

    let summary = summarize(&request.times, court.price);
    let times = request.times.times();
    let id = db::insert_booking(
        &state.db,
        &NewBooking {
            court_id: court.id.clone(),
            date: fmt_date(date),
            times: times.clone(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: body.phone.trim().to_string(),
            notes: body.notes.trim().to_string(),
            total_price: summary.total_price,
        },
    )
    .await?;
    state.cache.invalidate(&court.id, date);

    tracing::info!(
        booking_id = id,
        court_id = %court.id,
        date = %date,
        slots = summary.slot_count,
        total_price = summary.total_price,
        "Booking request stored"
    );

    Ok(Json(ApiResponse::success(BookingCreated {
        id,
        status: BookingStatus::Pending,
        court_id: court.id,
        date: fmt_date(date),
        times,
        summary,
    })))
}
