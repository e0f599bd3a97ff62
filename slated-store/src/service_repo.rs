use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::PgPool;
use uuid::Uuid;

use slated_core::repository::{ServiceCatalog, StoreError};
use slated_domain::{DailyWindow, DayOfWeek, ServiceAvailability};

use crate::database::map_sqlx_error;

pub struct PgServiceCatalog {
    pool: PgPool,
}

impl PgServiceCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    provider_id: Uuid,
    price_amount: i64,
    price_currency: String,
    duration_minutes: i32,
    recurring_days: Vec<String>,
    window_start: Option<NaiveTime>,
    window_end: Option<NaiveTime>,
}

impl TryFrom<ServiceRow> for ServiceAvailability {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let recurring_days = row
            .recurring_days
            .iter()
            .map(|day| day.parse::<DayOfWeek>())
            .collect::<Result<Vec<DayOfWeek>, _>>()
            .map_err(|err| StoreError::Query(err.to_string()))?;

        // A window needs both bounds; a half-set pair falls back to the default
        let daily_window = match (row.window_start, row.window_end) {
            (Some(start), Some(end)) => Some(DailyWindow { start, end }),
            _ => None,
        };

        Ok(ServiceAvailability {
            service_id: row.id,
            provider_id: row.provider_id,
            price_amount: row.price_amount,
            price_currency: row.price_currency,
            duration_minutes: row.duration_minutes,
            recurring_days,
            daily_window,
        })
    }
}

#[async_trait]
impl ServiceCatalog for PgServiceCatalog {
    async fn service_availability(
        &self,
        service_id: Uuid,
    ) -> Result<Option<ServiceAvailability>, StoreError> {
        let row: Option<ServiceRow> = sqlx::query_as(
            "SELECT id, provider_id, price_amount, price_currency, duration_minutes, \
                 recurring_days, window_start, window_end \
             FROM services WHERE id = $1",
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ServiceAvailability::try_from).transpose()
    }
}
