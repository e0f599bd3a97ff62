use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use slated_core::ScheduleError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ForbiddenError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ForbiddenError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::ServiceNotFound(_) | ScheduleError::BookingNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            ScheduleError::InvalidSlot(_) => AppError::ValidationError(err.to_string()),
            ScheduleError::SlotConflict => AppError::ConflictError(err.to_string()),
            ScheduleError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
            ScheduleError::Forbidden(msg) => AppError::ForbiddenError(msg),
            // Store details are logged, never echoed to the caller
            ScheduleError::Store(store_err) => AppError::InternalServerError(store_err.to_string()),
        }
    }
}
