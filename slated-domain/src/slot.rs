use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A concrete bookable interval, derived from a service's availability.
/// Transient: slots are recomputed on every request and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateSlot {
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl CandidateSlot {
    pub fn duration(&self) -> chrono::Duration {
        self.end_at - self.start_at
    }
}
