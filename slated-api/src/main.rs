use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slated_api::{app, AppState};
use slated_core::BookingScheduler;
use slated_store::{DbClient, PgBookingStore, PgServiceCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slated_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = slated_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Slated API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let catalog = Arc::new(PgServiceCatalog::new(db.pool.clone()));
    let bookings = Arc::new(PgBookingStore::new(db.pool.clone()));
    let scheduler = Arc::new(BookingScheduler::new(
        catalog,
        bookings,
        config.booking.scheduler_rules(),
    ));

    let app = app(AppState { scheduler });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
