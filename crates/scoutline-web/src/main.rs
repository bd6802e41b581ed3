//! Web server for the Scoutline client side
#![forbid(unsafe_code)]

use scoutline_core::context_error::{Result, ResultExt};
use scoutline_core::{Config, context_error};
use scoutline_web::build_app;
use std::net::{IpAddr, SocketAddr};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });

    scoutline_core::init_logging(&config.logging)?;

    let host: IpAddr = config.client.web_host.parse().map_err(|e| {
        context_error!(
            "Invalid web server host '{}': {}",
            config.client.web_host,
            e
        )
    })?;
    let addr = SocketAddr::new(host, config.client.web_port);
    let api_base = config.client.api_base_url.clone();

    let app = build_app(config).context(|| "Failed to build web app")?;

    info!("Starting Scoutline web server on {} (API: {})", addr, api_base);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(|| format!("Failed to bind to {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(|| "Server error")?;

    info!("Web server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
