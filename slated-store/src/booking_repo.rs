use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use slated_core::repository::{BookingStore, ReserveOutcome, StoreError};
use slated_domain::{Booking, BookingStatus, ProviderStatus};

use crate::database::map_sqlx_error;

/// Postgres code for an exclusion-constraint violation; the bookings table
/// carries a GiST exclusion over (provider_id, tstzrange) as the last line
/// of defense behind the in-transaction overlap check.
const EXCLUSION_VIOLATION: &str = "23P01";
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    service_id: Uuid,
    provider_id: Uuid,
    user_id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    duration_minutes: i32,
    total_amount: i64,
    currency: String,
    notes: Option<String>,
    status: String,
    provider_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|err: slated_domain::booking::ParseStatusError| {
                StoreError::Query(err.to_string())
            })?;
        let provider_status: ProviderStatus = row
            .provider_status
            .parse()
            .map_err(|err: slated_domain::booking::ParseStatusError| {
                StoreError::Query(err.to_string())
            })?;

        Ok(Booking {
            id: row.id,
            service_id: row.service_id,
            provider_id: row.provider_id,
            user_id: row.user_id,
            start_at: row.start_at,
            end_at: row.end_at,
            duration_minutes: row.duration_minutes,
            total_amount: row.total_amount,
            currency: row.currency,
            notes: row.notes,
            status,
            provider_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, service_id, provider_id, user_id, start_at, end_at, \
     duration_minutes, total_amount, currency, notes, status, provider_status, \
     created_at, updated_at";

fn status_names(statuses: &[BookingStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn bookings_in_range(
        &self,
        provider_id: Uuid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, StoreError> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE provider_id = $1 AND status = ANY($2) \
               AND start_at < $4 AND end_at > $3 \
             ORDER BY start_at ASC"
        );

        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(provider_id)
            .bind(status_names(statuses))
            .bind(range_start)
            .bind(range_end)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn insert_booking(&self, booking: Booking) -> Result<ReserveOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Serialize writers per provider for the duration of the transaction;
        // the lock is released automatically on commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(booking.provider_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        // Re-check under the lock: the slot may have been taken between
        // listing and reserving.
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE provider_id = $1 AND status = ANY($2) \
               AND start_at < $4 AND end_at > $3",
        )
        .bind(booking.provider_id)
        .bind(status_names(&BookingStatus::ACTIVE))
        .bind(booking.start_at)
        .bind(booking.end_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if conflicts > 0 {
            debug!(
                "checked insert found {} overlapping bookings for provider {}",
                conflicts, booking.provider_id
            );
            return Ok(ReserveOutcome::Conflict);
        }

        let inserted = sqlx::query(
            "INSERT INTO bookings (id, service_id, provider_id, user_id, start_at, end_at, \
                 duration_minutes, total_amount, currency, notes, status, provider_status, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(booking.id)
        .bind(booking.service_id)
        .bind(booking.provider_id)
        .bind(booking.user_id)
        .bind(booking.start_at)
        .bind(booking.end_at)
        .bind(booking.duration_minutes)
        .bind(booking.total_amount)
        .bind(&booking.currency)
        .bind(&booking.notes)
        .bind(booking.status.as_str())
        .bind(booking.provider_status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await.map_err(map_sqlx_error)?;
                Ok(ReserveOutcome::Inserted(booking))
            }
            Err(sqlx::Error::Database(db_err))
                if matches!(
                    db_err.code().as_deref(),
                    Some(EXCLUSION_VIOLATION) | Some(UNIQUE_VIOLATION)
                ) =>
            {
                Ok(ReserveOutcome::Conflict)
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(Booking::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        provider_status: ProviderStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let sql = format!(
            "UPDATE bookings \
             SET status = $2, provider_status = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BOOKING_COLUMNS}"
        );

        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(provider_status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(Booking::try_from).transpose()
    }
}
