//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but request-level
//! errors are rendered through `kernel::error::AppError`.

mod app;
mod config;
mod health;

use admission::{AdmissionConfig, AdmissionGate};
use chat::{ChatConfig, PgChatRepository, chat_router};
use platform::rate_limit::BucketStore;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{build_app, cors_layer};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,admission=info,chat=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration is validated before anything is served
    let server_config = ServerConfig::from_env()?;
    let admission_config = AdmissionConfig::from_env()?;

    tracing::info!(
        capacity = admission_config.rate_limit.capacity(),
        refill_per_minute = admission_config.rate_limit.refill_tokens(),
        "Rate limiting configured"
    );

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(server_config.database_max_connections)
        .connect(&server_config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // One bucket store for the whole process
    let buckets = Arc::new(BucketStore::new(admission_config.rate_limit));

    if let Some(max_idle) = admission_config.idle_eviction {
        spawn_idle_sweep(Arc::clone(&buckets), max_idle);
    }

    let gate = AdmissionGate::new(admission_config, buckets);

    let chat_repo = PgChatRepository::new(pool.clone());
    let app = build_app(
        chat_router(chat_repo, ChatConfig::default()),
        gate,
        cors_layer(&server_config.cors_origins),
    );

    // Start server
    let addr = server_config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Periodically drop buckets that have been idle for `max_idle`.
fn spawn_idle_sweep(buckets: Arc<BucketStore>, max_idle: Duration) {
    let period = (max_idle / 2).max(Duration::from_secs(1));

    tracing::info!(
        max_idle_secs = max_idle.as_secs(),
        "Idle rate limit bucket sweep enabled"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = buckets.evict_idle(max_idle);
            if evicted > 0 {
                tracing::debug!(
                    evicted,
                    remaining = buckets.len(),
                    "Evicted idle rate limit buckets"
                );
            }
        }
    });
}
