pub mod availability;
pub mod conflict;
pub mod lifecycle;
pub mod repository;
pub mod scheduler;

use uuid::Uuid;

pub use availability::InvalidSlotReason;
pub use repository::{BookingStore, ReserveOutcome, ServiceCatalog, StoreError};
pub use scheduler::{BookingScheduler, SchedulerRules};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("service {0} not found")]
    ServiceNotFound(Uuid),
    #[error("booking {0} not found")]
    BookingNotFound(Uuid),
    #[error("invalid slot: {0}")]
    InvalidSlot(#[from] InvalidSlotReason),
    #[error("slot is no longer available")]
    SlotConflict,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
