//! Complaint Service - HTTP front door for booking complaints.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env` when present)
//! - Serves the complaint and health endpoints
//! - Forwards each accepted complaint to the primary queue
//! - Shuts down gracefully on SIGINT/SIGTERM

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use complaints::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Configuration comes first so DEBUG can pick the log level.
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(
        service = %config.app_name,
        version = %config.app_version,
        queue = %config.queue_name,
        audit_enabled = config.audit_enabled(),
        audit_queue = %config.audit_queue_name,
        send_timeout_ms = config.send_timeout_ms,
        debug = config.debug,
        "service_starting"
    );

    let addr = config.bind_addr();
    let app_name = config.app_name.clone();
    let app = build_router(AppState::from_config(config));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(service = %app_name, "service_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
