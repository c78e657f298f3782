use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use mdr_core::config::config_from_env_values;

/// Main entry point for the MDR application
///
/// Loads `.env`, builds the directory from the configured seed file and serves the REST API
/// (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `MDR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MDR_SEED_FILE`: JSON seed holding doctors, specializations and affiliations
/// - `MDR_DATE_FORMAT`: chrono format for the created-at column (default: "%d/%m/%Y")
/// - `MDR_OTP_EXPIRY_SECS`: OTP expiry in seconds (default: 60)
/// - `MDR_OTP_LENGTH`: OTP digit count (default: 6)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mdr_run=info".parse()?)
                .add_directive("mdr_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MDR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = config_from_env_values(
        std::env::var("MDR_SEED_FILE").ok(),
        std::env::var("MDR_DATE_FORMAT").ok(),
        std::env::var("MDR_OTP_EXPIRY_SECS").ok(),
        std::env::var("MDR_OTP_LENGTH").ok(),
    )?;

    tracing::info!("++ Starting MDR REST on {}", rest_addr);

    let state = AppState::bootstrap(cfg).await?;
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
