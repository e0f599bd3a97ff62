use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use slated_domain::{Actor, Booking, BookingStatus, CandidateSlot, DailyWindow, ServiceAvailability};

use crate::availability::{candidate_slots, validate_candidate};
use crate::conflict::is_slot_free;
use crate::lifecycle::{transition, BookingAction};
use crate::repository::{BookingStore, ReserveOutcome, ServiceCatalog, StoreError};
use crate::{ScheduleError, ScheduleResult};

/// Operational knobs for the scheduler, loaded from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerRules {
    /// Window applied when a service does not configure its own.
    pub default_window: DailyWindow,
    /// Upper bound on a single open-slot query, in calendar days.
    pub max_range_days: i64,
}

impl Default for SchedulerRules {
    fn default() -> Self {
        Self {
            default_window: DailyWindow::default(),
            max_range_days: 60,
        }
    }
}

/// Orchestrates availability expansion and conflict checking over the record
/// store, and owns the atomic reservation path.
pub struct BookingScheduler {
    catalog: Arc<dyn ServiceCatalog>,
    bookings: Arc<dyn BookingStore>,
    rules: SchedulerRules,
}

impl BookingScheduler {
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        bookings: Arc<dyn BookingStore>,
        rules: SchedulerRules,
    ) -> Self {
        Self {
            catalog,
            bookings,
            rules,
        }
    }

    /// List the service's currently bookable slots in `[range_start, range_end]`.
    /// A service with no active availability yields an empty list, not an
    /// error. Read-only and idempotent.
    pub async fn get_open_slots(
        &self,
        service_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> ScheduleResult<Vec<CandidateSlot>> {
        let availability = self.load_availability(service_id).await?;
        if !availability.is_bookable() {
            return Ok(Vec::new());
        }

        let range_end = self.clamp_range(range_start, range_end);
        let now = Utc::now();
        let candidates: Vec<CandidateSlot> =
            candidate_slots(&availability, range_start, range_end, now).collect();
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let existing = self
            .load_bookings(availability.provider_id, range_start, range_end)
            .await?;

        let open: Vec<CandidateSlot> = candidates
            .into_iter()
            .filter(|slot| is_slot_free(slot, &existing))
            .collect();

        debug!(
            "open-slot query for service {}: {} candidates survive {} existing bookings",
            service_id,
            open.len(),
            existing.len()
        );
        Ok(open)
    }

    /// Reserve `start_at` for `user_id`. The candidate is re-validated against
    /// a fresh availability snapshot, priced server-side, and handed to the
    /// store, whose checked insert decides the race. Exactly one concurrent
    /// caller wins a given interval; everyone else sees `SlotConflict` and no
    /// partial writes.
    pub async fn reserve_slot(
        &self,
        service_id: Uuid,
        user_id: Uuid,
        start_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> ScheduleResult<Booking> {
        let availability = self.load_availability(service_id).await?;
        let slot = validate_candidate(&availability, start_at, Utc::now())?;

        let booking = Booking::reserve(
            &slot,
            user_id,
            availability.unit_price(),
            availability.price_currency.clone(),
            notes,
        );

        match self.bookings.insert_booking(booking).await {
            Ok(ReserveOutcome::Inserted(booking)) => {
                info!(
                    "reserved slot {} - {} with provider {} as booking {}",
                    booking.start_at, booking.end_at, booking.provider_id, booking.id
                );
                Ok(booking)
            }
            Ok(ReserveOutcome::Conflict) => {
                warn!(
                    "reservation lost the race for provider {} at {}",
                    slot.provider_id, slot.start_at
                );
                Err(ScheduleError::SlotConflict)
            }
            // The transaction is all-or-nothing, so a timed-out attempt left
            // no partial state and retrying is safe. Callers handle it the
            // same way as losing the race: re-list, then retry.
            Err(StoreError::Timeout) => {
                warn!(
                    "reservation for provider {} at {} timed out",
                    slot.provider_id, slot.start_at
                );
                Err(ScheduleError::SlotConflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a status transition on behalf of an explicit actor.
    pub async fn update_booking_status(
        &self,
        booking_id: Uuid,
        actor: Actor,
        action: BookingAction,
    ) -> ScheduleResult<Booking> {
        let booking = match self.bookings.booking(booking_id).await {
            Ok(found) => found,
            Err(err) => {
                debug!("retrying booking read after store error: {}", err);
                self.bookings.booking(booking_id).await?
            }
        }
        .ok_or(ScheduleError::BookingNotFound(booking_id))?;

        let (status, provider_status) = transition(&booking, &actor, action)?;

        let updated = self
            .bookings
            .update_status(booking_id, status, provider_status)
            .await?
            .ok_or(ScheduleError::BookingNotFound(booking_id))?;

        info!(
            "booking {} moved to {}/{} by {:?} {}",
            booking_id,
            status.as_str(),
            provider_status.as_str(),
            actor.role,
            actor.id
        );
        Ok(updated)
    }

    /// Availability snapshot with the configured default window filled in.
    /// Reads are idempotent, so a store error is retried once.
    async fn load_availability(&self, service_id: Uuid) -> ScheduleResult<ServiceAvailability> {
        let fetched = match self.catalog.service_availability(service_id).await {
            Ok(found) => found,
            Err(err) => {
                debug!("retrying availability read after store error: {}", err);
                self.catalog.service_availability(service_id).await?
            }
        };

        let mut availability = fetched.ok_or(ScheduleError::ServiceNotFound(service_id))?;
        availability
            .daily_window
            .get_or_insert(self.rules.default_window);
        Ok(availability)
    }

    async fn load_bookings(
        &self,
        provider_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Booking>> {
        let existing = match self
            .bookings
            .bookings_in_range(provider_id, range_start, range_end, &BookingStatus::ACTIVE)
            .await
        {
            Ok(found) => found,
            Err(err) => {
                debug!("retrying booking read after store error: {}", err);
                self.bookings
                    .bookings_in_range(provider_id, range_start, range_end, &BookingStatus::ACTIVE)
                    .await?
            }
        };
        Ok(existing)
    }

    fn clamp_range(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> DateTime<Utc> {
        let cap = range_start + Duration::days(self.rules.max_range_days);
        if range_end > cap {
            debug!(
                "clamping open-slot range to {} days ending {}",
                self.rules.max_range_days, cap
            );
            cap
        } else {
            range_end
        }
    }
}
