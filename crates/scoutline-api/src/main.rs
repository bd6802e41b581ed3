//! Main entry point for the Scoutline API server

use scoutline_api::build_router;
use scoutline_core::context_error::{Result, ResultExt};
use scoutline_core::{Config, context_error, init_logging};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine outside development
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Failed to load config ({err}), using defaults");
        Config::default()
    });

    init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Scoutline API server"
    );

    let repo = scoutline_database::connect(&config).await.map_err(|e| {
        error!("Failed to initialize store: {}", e);
        context_error!("Store initialization failed: {}", e)
    })?;

    if let Err(e) = repo.health_check().await {
        error!("Store health check failed: {}", e);
        return Err(context_error!("Store health check failed: {}", e));
    }
    info!(backend = repo.backend_name(), "Store health check passed");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    let app = build_router(config, repo)?;

    let listener = TcpListener::bind(&addr)
        .await
        .context(|| format!("Failed to bind to {addr}"))?;

    info!("API:    http://{}/api/v1", addr);
    info!("Health: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(|| "Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve once Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
