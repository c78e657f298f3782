//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the HTTP surface (with
//! OpenAPI/Swagger UI). The workspace's main `mdr-run` binary serves the same router after
//! loading `.env`.

use api_rest::{router, AppState};
use mdr_core::config::config_from_env_values;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the MDR REST API server
///
/// # Environment Variables
/// - `MDR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MDR_SEED_FILE`: JSON seed for the directory (optional)
/// - `MDR_DATE_FORMAT`: chrono format for the created-at column (default: "%d/%m/%Y")
/// - `MDR_OTP_EXPIRY_SECS`, `MDR_OTP_LENGTH`: OTP settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or seed file is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("mdr_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MDR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = config_from_env_values(
        std::env::var("MDR_SEED_FILE").ok(),
        std::env::var("MDR_DATE_FORMAT").ok(),
        std::env::var("MDR_OTP_EXPIRY_SECS").ok(),
        std::env::var("MDR_OTP_LENGTH").ok(),
    )?;

    tracing::info!("-- Starting MDR REST API on {}", addr);

    let state = AppState::bootstrap(cfg).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
