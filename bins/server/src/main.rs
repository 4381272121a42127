//! Vertice API Server
//!
//! Main entry point for the Vertice back-office service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vertice_api::{AppState, create_router};
use vertice_core::balance::{BalanceEngine, BalancePolicy, BusinessCalendar};
use vertice_db::connect;
use vertice_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // LOG_FORMAT=json for structured output
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "vertice_server=debug,vertice_api=debug,vertice_db=debug,tower_http=debug".into()
                }),
        )
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let timezone = config.balance.tz()?;
    let engine = BalanceEngine::new(
        BalancePolicy {
            maturity_window_days: config.balance.maturity_window_days,
        },
        BusinessCalendar::new(timezone),
    );
    info!(
        maturity_window_days = config.balance.maturity_window_days,
        timezone = %timezone,
        "Balance engine configured"
    );
    if config.pix.key.trim().is_empty() {
        warn!("pix.key is not set; PIX charges will be unavailable");
    }

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(&config.jwt)),
        engine,
        pix: Arc::new(config.pix),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
