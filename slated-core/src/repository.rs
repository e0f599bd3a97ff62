use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use slated_domain::{Booking, BookingStatus, ProviderStatus, ServiceAvailability};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out")]
    Timeout,
}

/// Result of a checked insert: either the booking won its interval or an
/// active booking already held it.
#[derive(Debug)]
pub enum ReserveOutcome {
    Inserted(Booking),
    Conflict,
}

/// Read access to service configuration.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn service_availability(
        &self,
        service_id: Uuid,
    ) -> Result<Option<ServiceAvailability>, StoreError>;
}

/// Access to the booking record store. The store is the only shared mutable
/// resource; `insert_booking` must re-check the provider's active bookings
/// for overlap inside its own critical section so that concurrent writers
/// for the same interval cannot both succeed.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Active-status bookings for a provider whose intervals overlap
    /// `[range_start, range_end)`, ascending by start.
    async fn bookings_in_range(
        &self,
        provider_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError>;

    /// Insert the booking if its interval is still free for the provider.
    async fn insert_booking(&self, booking: Booking) -> Result<ReserveOutcome, StoreError>;

    async fn booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Single-row status update; returns the updated booking, or None when
    /// the id does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        provider_status: ProviderStatus,
    ) -> Result<Option<Booking>, StoreError>;
}
