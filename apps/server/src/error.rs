use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courtside_availability::AvailabilityError;
use thiserror::Error;

use crate::models::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("court {0} not found")]
    CourtNotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::IllegalToggle { .. } => AppError::Conflict(err.to_string()),
            AvailabilityError::InvalidInput(_) | AvailabilityError::NoCourtSelected => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CourtNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                "DB error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_availability::{SlotStatus, SlotTime};

    #[test]
    fn test_availability_errors_map_to_statuses() {
        let bad: AppError = AvailabilityError::InvalidInput("x".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let no_court: AppError = AvailabilityError::NoCourtSelected.into();
        assert_eq!(no_court.status(), StatusCode::BAD_REQUEST);

        let toggle: AppError = AvailabilityError::IllegalToggle {
            slot: SlotTime::from_hour(12).unwrap(),
            status: SlotStatus::ClosedByPolicy,
        }
        .into();
        assert_eq!(toggle.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_response() {
        let response = AppError::CourtNotFound("9".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
