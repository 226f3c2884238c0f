pub mod bookings;
pub mod courts;
pub mod health;

use std::sync::Arc;

use chrono::NaiveDate;
use courtside_availability::{Court, DayAvailability};

use crate::db;
use crate::error::AppError;
use crate::AppState;

pub(crate) fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) async fn find_court(state: &AppState, id: &str) -> Result<Court, AppError> {
    db::get_court(&state.db, id)
        .await?
        .ok_or_else(|| AppError::CourtNotFound(id.to_string()))
}

/// Day board for a court, from the cache when fresh.
pub(crate) async fn day_availability(
    state: &AppState,
    court: &Court,
    date: NaiveDate,
) -> Result<Arc<DayAvailability>, AppError> {
    if let Some(day) = state.cache.get(&court.id, date) {
        return Ok(day);
    }
    let bookings = db::bookings_on(&state.db, &court.id, &fmt_date(date)).await?;
    let day = DayAvailability::compute(&state.policy, court, date, &bookings);
    Ok(state.cache.insert(day))
}
