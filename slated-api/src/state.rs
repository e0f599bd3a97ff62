use std::sync::Arc;

use slated_core::BookingScheduler;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<BookingScheduler>,
}
