mod config;
mod configurator;
mod errors;
mod routes;
mod sessions;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::sessions::{spawn_idle_sweeper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // EnvFilter targets use module paths, so the crate name needs
            // its hyphen replaced.
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartWall configurator API v{}", env!("CARGO_PKG_VERSION"));

    let sessions = SessionStore::new(Duration::from_millis(config.input_debounce_ms));
    info!(
        "Session store ready (debounce window: {} ms, accessory enforcement: {:?})",
        config.input_debounce_ms, config.accessory_enforcement
    );

    spawn_idle_sweeper(
        sessions.clone(),
        Duration::from_secs(config.session_sweep_interval_seconds),
        chrono::Duration::minutes(config.session_idle_timeout_minutes),
    );
    info!(
        "Idle sweeper running (timeout: {} min, sweep every {} s)",
        config.session_idle_timeout_minutes, config.session_sweep_interval_seconds
    );

    let state = AppState {
        config: config.clone(),
        sessions,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
