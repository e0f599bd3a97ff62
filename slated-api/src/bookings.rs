use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use slated_core::lifecycle::BookingAction;
use slated_domain::{ActorRole, Booking, BookingStatus, ProviderStatus};

use crate::error::AppError;
use crate::identity::ActorIdentity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", patch(update_booking))
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    service_id: Uuid,
    start_at: DateTime<Utc>,
    notes: Option<String>,
    // No amount field: totals are always computed server-side
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    id: Uuid,
    service_id: Uuid,
    provider_id: Uuid,
    user_id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    total_amount: i64,
    currency: String,
    notes: Option<String>,
    status: BookingStatus,
    provider_status: ProviderStatus,
    created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            service_id: booking.service_id,
            provider_id: booking.provider_id,
            user_id: booking.user_id,
            start_at: booking.start_at,
            end_at: booking.end_at,
            total_amount: booking.total_amount,
            currency: booking.currency,
            notes: booking.notes,
            status: booking.status,
            provider_status: booking.provider_status,
            created_at: booking.created_at,
        }
    }
}

async fn create_booking(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    if actor.role != ActorRole::User {
        return Err(AppError::ForbiddenError(
            "only users can create bookings".to_string(),
        ));
    }

    let booking = state
        .scheduler
        .reserve_slot(req.service_id, actor.id, req.start_at, req.notes)
        .await?;

    info!("Booking created: {}", booking.id);
    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[derive(Debug, Deserialize)]
struct UpdateBookingRequest {
    status: String,
}

async fn update_booking(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let action = match req.status.as_str() {
        "confirmed" => BookingAction::Confirm,
        "rejected" => BookingAction::Reject,
        "cancelled" => BookingAction::Cancel,
        "completed" => BookingAction::Complete,
        other => {
            return Err(AppError::ValidationError(format!(
                "unsupported status: {}",
                other
            )))
        }
    };

    let booking = state
        .scheduler
        .update_booking_status(id, actor, action)
        .await?;

    Ok(Json(booking.into()))
}
