use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::CandidateSlot;

/// Booking status as seen by the booking user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold the provider's time. Cancelled and completed
    /// bookings never block a slot.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct ParseStatusError(String);

impl std::str::FromStr for BookingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// The provider's side of the handshake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Confirmed => "confirmed",
            ProviderStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ProviderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProviderStatus::Pending),
            "confirmed" => Ok(ProviderStatus::Confirmed),
            "rejected" => Ok(ProviderStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// The unit of contention: one reserved interval of a provider's time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub total_amount: i64,
    pub currency: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub provider_status: ProviderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh pending/pending booking for a validated slot. Pricing is the
    /// caller's job; the amount is always computed server-side.
    pub fn reserve(
        slot: &CandidateSlot,
        user_id: Uuid,
        total_amount: i64,
        currency: String,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            service_id: slot.service_id,
            provider_id: slot.provider_id,
            user_id,
            start_at: slot.start_at,
            end_at: slot.end_at,
            duration_minutes: (slot.end_at - slot.start_at).num_minutes() as i32,
            total_amount,
            currency,
            notes,
            status: BookingStatus::Pending,
            provider_status: ProviderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this booking currently blocks its interval.
    pub fn blocks_slot(&self) -> bool {
        BookingStatus::ACTIVE.contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn slot() -> CandidateSlot {
        let start = Utc::now() + Duration::days(1);
        CandidateSlot {
            service_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            start_at: start,
            end_at: start + Duration::minutes(90),
        }
    }

    #[test]
    fn test_reserve_starts_pending() {
        let booking = Booking::reserve(&slot(), Uuid::new_v4(), 7500, "USD".to_string(), None);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.provider_status, ProviderStatus::Pending);
        assert_eq!(booking.duration_minutes, 90);
        assert!(booking.blocks_slot());
    }

    #[test]
    fn test_terminal_statuses_release_the_slot() {
        let mut booking = Booking::reserve(&slot(), Uuid::new_v4(), 7500, "USD".to_string(), None);
        booking.status = BookingStatus::Cancelled;
        assert!(!booking.blocks_slot());
        booking.status = BookingStatus::Completed;
        assert!(!booking.blocks_slot());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            "confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            "rejected".parse::<ProviderStatus>().unwrap(),
            ProviderStatus::Rejected
        );
        assert!("paid".parse::<BookingStatus>().is_err());
    }
}
