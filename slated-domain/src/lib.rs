pub mod actor;
pub mod availability;
pub mod booking;
pub mod slot;

pub use actor::{Actor, ActorRole};
pub use availability::{DailyWindow, DayOfWeek, ServiceAvailability};
pub use booking::{Booking, BookingStatus, ProviderStatus};
pub use slot::CandidateSlot;
