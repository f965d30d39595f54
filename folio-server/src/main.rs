//! Folio Web Server - portfolio content and contact relay.
//!
//! This binary:
//! - Resolves portfolio content from the CMS, falling back to the bundled
//!   static document, and serves it as JSON
//! - Validates, signs and forwards contact form submissions
//!
//! Content is resolved once in the background at startup; requests that
//! arrive before it finishes wait on the same resolution.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to read .env file");
        }
    }

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    let config = Config::from_env();
    info!(
        port = config.port,
        sanity_configured = config.sanity_project_id.is_some() || config.sanity_api_host.is_some(),
        sanity_dataset = %config.sanity_dataset,
        static_config_path = %config.static_config_path.display(),
        contact_webhook_configured = config.contact_webhook_url.is_some(),
        contact_signing_configured = config.contact_webhook_secret.is_some(),
        "config_loaded"
    );
    if config.contact_webhook_url.is_none() || config.contact_webhook_secret.is_none() {
        warn!("contact_relay_disabled");
    }

    let port = config.port;
    let state = AppState::from_config(config).context("Failed to build HTTP client")?;

    // Warm the content cache
    let resolver = state.resolver.clone();
    tokio::spawn(async move {
        if let Err(e) = resolver.resolve().await {
            warn!(error = %e, "config_warmup_failed");
        }
    });

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Completes when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
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
