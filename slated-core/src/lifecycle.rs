use slated_domain::{Actor, ActorRole, Booking, BookingStatus, ProviderStatus};

use crate::ScheduleError;

/// Status-changing actions on a booking. Confirm/reject/complete belong to
/// the provider, cancel to the booking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Reject,
    Cancel,
    Complete,
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirmed",
            BookingAction::Reject => "rejected",
            BookingAction::Cancel => "cancelled",
            BookingAction::Complete => "completed",
        }
    }
}

/// Validate an action against the booking's current state and the actor's
/// role and ownership, returning the resulting status pair. Ownership is
/// checked before state so a stranger learns nothing about the lifecycle.
pub fn transition(
    booking: &Booking,
    actor: &Actor,
    action: BookingAction,
) -> Result<(BookingStatus, ProviderStatus), ScheduleError> {
    match action {
        BookingAction::Confirm | BookingAction::Reject | BookingAction::Complete => {
            if actor.role != ActorRole::Provider || actor.id != booking.provider_id {
                return Err(ScheduleError::Forbidden(
                    "only the booking's provider may perform this transition".to_string(),
                ));
            }
        }
        BookingAction::Cancel => {
            if actor.role != ActorRole::User || actor.id != booking.user_id {
                return Err(ScheduleError::Forbidden(
                    "only the booking user may cancel".to_string(),
                ));
            }
        }
    }

    match action {
        BookingAction::Confirm => {
            expect_state(booking, BookingStatus::Pending, action)?;
            Ok((BookingStatus::Confirmed, ProviderStatus::Confirmed))
        }
        BookingAction::Reject => {
            expect_state(booking, BookingStatus::Pending, action)?;
            // Rejection also cancels the booking for the user
            Ok((BookingStatus::Cancelled, ProviderStatus::Rejected))
        }
        BookingAction::Cancel => {
            expect_state(booking, BookingStatus::Pending, action)?;
            Ok((BookingStatus::Cancelled, booking.provider_status))
        }
        BookingAction::Complete => {
            expect_state(booking, BookingStatus::Confirmed, action)?;
            Ok((BookingStatus::Completed, booking.provider_status))
        }
    }
}

fn expect_state(
    booking: &Booking,
    expected: BookingStatus,
    action: BookingAction,
) -> Result<(), ScheduleError> {
    if booking.status != expected {
        return Err(ScheduleError::InvalidTransition {
            from: booking.status.as_str().to_string(),
            to: action.as_str().to_string(),
        });
    }
    Ok(())
}
