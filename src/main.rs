// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Poast Board Service
//!
//! Serves a small in-memory message board:
//!
//! - `GET /poast`: newest-first JSON array of poasts, with `ETag`
//! - `POST /poast`: submit `{"Username": .., "Poast": ..}`
//! - `GET /client.html`: browser client
//! - `GET /health`, `GET /metrics`
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 127.0.0.1:8080)
//! - `STATIC_DIR`: Directory holding client.html (default: static)
//! - `MAX_POASTS`: Poasts kept in memory (default: 100)
//! - `MAX_USERNAME_CHARS`: Username limit (default: 20)
//! - `MAX_POAST_CHARS`: Poast limit (default: 1000)
//! - `METRICS_ENABLED`: Expose Prometheus metrics (default: true)
//! - `METRICS_PATH`: Metrics endpoint path (default: /metrics)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use poast_board::{
    config::{BoardConfig, Config, MetricsConfig},
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        capacity = config.board.capacity,
        max_username_chars = config.board.max_username_chars,
        max_poast_chars = config.board.max_poast_chars,
        metrics_enabled = config.metrics.enabled,
        "Starting poast board"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);

    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        static_dir: std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir),
        board: BoardConfig {
            capacity: env_or("MAX_POASTS", defaults.board.capacity),
            max_username_chars: env_or("MAX_USERNAME_CHARS", defaults.board.max_username_chars),
            max_poast_chars: env_or("MAX_POAST_CHARS", defaults.board.max_poast_chars),
        },
        metrics: MetricsConfig {
            enabled: env_or("METRICS_ENABLED", defaults.metrics.enabled),
            path: std::env::var("METRICS_PATH").unwrap_or(defaults.metrics.path),
        },
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
