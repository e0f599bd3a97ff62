use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use slated_core::conflict;
use slated_core::repository::{BookingStore, ReserveOutcome, ServiceCatalog, StoreError};
use slated_domain::{Booking, BookingStatus, CandidateSlot, ProviderStatus, ServiceAvailability};

/// Mutex-guarded in-memory record store implementing both repository traits.
/// The booking mutex doubles as the reservation critical section, so the
/// at-most-one-winner guarantee holds here exactly as it does in Postgres.
/// Used by tests and local development; an empty store yields empty results,
/// never sample data.
#[derive(Default)]
pub struct MemoryStore {
    services: Mutex<HashMap<Uuid, ServiceAvailability>>,
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service(&self, availability: ServiceAvailability) {
        self.services
            .lock()
            .expect("service map poisoned")
            .insert(availability.service_id, availability);
    }
}

#[async_trait]
impl ServiceCatalog for MemoryStore {
    async fn service_availability(
        &self,
        service_id: Uuid,
    ) -> Result<Option<ServiceAvailability>, StoreError> {
        Ok(self
            .services
            .lock()
            .map_err(|_| StoreError::Unavailable("service map poisoned".to_string()))?
            .get(&service_id)
            .cloned())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn bookings_in_range(
        &self,
        provider_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let bookings = self
            .bookings
            .lock()
            .map_err(|_| StoreError::Unavailable("booking map poisoned".to_string()))?;

        let mut matched: Vec<Booking> = bookings
            .values()
            .filter(|booking| {
                booking.provider_id == provider_id
                    && statuses.contains(&booking.status)
                    && conflict::overlaps(
                        booking.start_at,
                        booking.end_at,
                        range_start,
                        range_end,
                    )
            })
            .cloned()
            .collect();
        matched.sort_by_key(|booking| booking.start_at);
        Ok(matched)
    }

    async fn insert_booking(&self, booking: Booking) -> Result<ReserveOutcome, StoreError> {
        let mut bookings = self
            .bookings
            .lock()
            .map_err(|_| StoreError::Unavailable("booking map poisoned".to_string()))?;

        let slot = CandidateSlot {
            service_id: booking.service_id,
            provider_id: booking.provider_id,
            start_at: booking.start_at,
            end_at: booking.end_at,
        };
        let existing: Vec<Booking> = bookings.values().cloned().collect();
        if !conflict::is_slot_free(&slot, &existing) {
            return Ok(ReserveOutcome::Conflict);
        }

        bookings.insert(booking.id, booking.clone());
        Ok(ReserveOutcome::Inserted(booking))
    }

    async fn booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .map_err(|_| StoreError::Unavailable("booking map poisoned".to_string()))?
            .get(&id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        provider_status: ProviderStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let mut bookings = self
            .bookings
            .lock()
            .map_err(|_| StoreError::Unavailable("booking map poisoned".to_string()))?;

        Ok(bookings.get_mut(&id).map(|booking| {
            booking.status = status;
            booking.provider_status = provider_status;
            booking.updated_at = Utc::now();
            booking.clone()
        }))
    }
}
