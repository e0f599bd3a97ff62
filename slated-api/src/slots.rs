use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use slated_domain::CandidateSlot;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/open-slots", get(list_open_slots))
}

#[derive(Debug, Deserialize)]
struct OpenSlotsQuery {
    service_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct SlotPayload {
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
}

impl From<CandidateSlot> for SlotPayload {
    fn from(slot: CandidateSlot) -> Self {
        Self {
            start_at: slot.start_at,
            end_at: slot.end_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenSlotsResponse {
    service_id: Uuid,
    slots: Vec<SlotPayload>,
}

async fn list_open_slots(
    State(state): State<AppState>,
    Query(query): Query<OpenSlotsQuery>,
) -> Result<Json<OpenSlotsResponse>, AppError> {
    let slots = state
        .scheduler
        .get_open_slots(query.service_id, query.from, query.to)
        .await?;

    Ok(Json(OpenSlotsResponse {
        service_id: query.service_id,
        slots: slots.into_iter().map(SlotPayload::from).collect(),
    }))
}
