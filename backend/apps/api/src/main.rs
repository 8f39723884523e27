//! API Server Entry Point
//!
//! Demo site served behind the age gate.
//! Uses `anyhow` for startup errors; request-time errors go through
//! `agegate::GateError` and `kernel::error::AppError`.

mod site;

use std::env;
use std::net::{IpAddr, SocketAddr};

use agegate::{AgeGate, GateConfig, SystemClock, with_age_gate};
use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,agegate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GateConfig::from_env().context("invalid age gate configuration")?;
    tracing::info!(
        enabled = config.enabled,
        minimum_age = %config.minimum_age,
        mode = ?config.mode(),
        date_format = %config.date_format,
        "Age gate configured"
    );

    let gate = AgeGate::new(config, SystemClock);

    let app = with_age_gate(site::router(), gate).layer(TraceLayer::new_for_http());

    // Start server
    let host: IpAddr = env::var("APP_HOST")
        .unwrap_or_else(|_| "0.0.0.0".to_string())
        .parse()
        .context("APP_HOST must be an IP address")?;
    let port: u16 = env::var("APP_PORT")
        .unwrap_or_else(|_| "31113".to_string())
        .parse()
        .context("APP_PORT must be a port number")?;
    let addr = SocketAddr::new(host, port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
