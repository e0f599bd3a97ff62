use chrono::{DateTime, Utc};

use slated_domain::{Booking, CandidateSlot};

/// Half-open interval overlap: `[a_start, a_end)` against `[b_start, b_end)`.
/// Touching endpoints do not overlap, so back-to-back bookings are fine.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A slot is free iff no supplied booking for the same provider, in a
/// slot-blocking status, overlaps it. Pure: the caller is responsible for
/// handing in a freshly read booking set for the affected window.
pub fn is_slot_free(candidate: &CandidateSlot, existing: &[Booking]) -> bool {
    first_conflict(candidate, existing).is_none()
}

/// The earliest booking that blocks the candidate, if any.
pub fn first_conflict<'a>(candidate: &CandidateSlot, existing: &'a [Booking]) -> Option<&'a Booking> {
    existing.iter().find(|booking| {
        booking.provider_id == candidate.provider_id
            && booking.blocks_slot()
            && overlaps(
                candidate.start_at,
                candidate.end_at,
                booking.start_at,
                booking.end_at,
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use slated_domain::{BookingStatus, ProviderStatus};
    use uuid::Uuid;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, h, 0, 0).unwrap()
    }

    fn booking(provider_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            provider_id,
            user_id: Uuid::new_v4(),
            start_at: start,
            end_at: end,
            duration_minutes: (end - start).num_minutes() as i32,
            total_amount: 5000,
            currency: "USD".to_string(),
            notes: None,
            status: BookingStatus::Confirmed,
            provider_status: ProviderStatus::Confirmed,
            created_at: start - Duration::days(1),
            updated_at: start - Duration::days(1),
        }
    }

    fn slot(provider_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> CandidateSlot {
        CandidateSlot {
            service_id: Uuid::new_v4(),
            provider_id,
            start_at: start,
            end_at: end,
        }
    }

    #[test]
    fn test_contained_candidate_is_never_free() {
        let provider = Uuid::new_v4();
        let existing = vec![booking(provider, hour(9), hour(12))];
        assert!(!is_slot_free(&slot(provider, hour(10), hour(11)), &existing));
    }

    #[test]
    fn test_disjoint_candidate_is_free() {
        let provider = Uuid::new_v4();
        let existing = vec![booking(provider, hour(9), hour(10))];
        assert!(is_slot_free(&slot(provider, hour(14), hour(15)), &existing));
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        let provider = Uuid::new_v4();
        let existing = vec![booking(provider, hour(9), hour(10))];
        // candidate.start == existing.end and the mirror case
        assert!(is_slot_free(&slot(provider, hour(10), hour(11)), &existing));
        assert!(is_slot_free(&slot(provider, hour(8), hour(9)), &existing));
    }

    #[test]
    fn test_partial_overlap_conflicts_both_directions() {
        let provider = Uuid::new_v4();
        let existing = vec![booking(provider, hour(10), hour(12))];
        assert!(!is_slot_free(&slot(provider, hour(9), hour(11)), &existing));
        assert!(!is_slot_free(&slot(provider, hour(11), hour(13)), &existing));
    }

    #[test]
    fn test_other_providers_do_not_block() {
        let provider = Uuid::new_v4();
        let existing = vec![booking(Uuid::new_v4(), hour(9), hour(12))];
        assert!(is_slot_free(&slot(provider, hour(10), hour(11)), &existing));
    }

    #[test]
    fn test_inactive_bookings_do_not_block() {
        let provider = Uuid::new_v4();
        let mut cancelled = booking(provider, hour(9), hour(12));
        cancelled.status = BookingStatus::Cancelled;
        let mut completed = booking(provider, hour(9), hour(12));
        completed.status = BookingStatus::Completed;

        assert!(is_slot_free(
            &slot(provider, hour(10), hour(11)),
            &[cancelled, completed]
        ));
    }

    #[test]
    fn test_pending_bookings_block() {
        let provider = Uuid::new_v4();
        let mut pending = booking(provider, hour(9), hour(10));
        pending.status = BookingStatus::Pending;
        pending.provider_status = ProviderStatus::Pending;
        assert!(!is_slot_free(&slot(provider, hour(9), hour(10)), &[pending]));
    }
}
