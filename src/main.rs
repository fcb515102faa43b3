use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use risk_pulse::adapters::http::{build_router, AppServices};
use risk_pulse::config::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;
    match config.server.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().pretty().with_env_filter(filter).init(),
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Risk Pulse starting"
    );
    if config.auth.uses_demo_secret() {
        tracing::warn!("Using the built-in demo JWT secret; set RISK_PULSE__AUTH__JWT_SECRET");
    }

    let services = AppServices::demo(&config.auth)?;
    let app = build_router(&services, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening (REST under /api, WebSocket at /ws)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
