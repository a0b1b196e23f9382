//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are
//! `auth::AuthError` rendered through `kernel::error::AppError`.

mod config;

use auth::{GatewayRepository, MemoryAuthRepository, PgAuthRepository, gateway_router};
use axum::http::{Method, header};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(PgAuthRepository::new(pool), config).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users and sessions live in memory");
            serve(MemoryAuthRepository::new(), config).await
        }
    }
}

async fn serve<R>(repo: R, config: GatewayConfig) -> anyhow::Result<()>
where
    R: GatewayRepository,
{
    // Startup cleanup: errors here should not prevent server startup
    if let Err(e) = repo.cleanup_expired().await {
        tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
    }

    spawn_session_cleanup(repo.clone(), config.session_cleanup_interval);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    // Build router
    let app = gateway_router(repo, config.auth)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically remove expired sessions
fn spawn_session_cleanup<R>(repo: R, every: Duration)
where
    R: GatewayRepository,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; startup already cleaned up
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = repo.cleanup_expired().await {
                tracing::warn!(error = %e, "Periodic session cleanup failed");
            }
        }
    });
}
