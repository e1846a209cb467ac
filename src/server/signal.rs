//! Shutdown signals
//!
//! SIGINT (Ctrl+C) and SIGTERM both request a graceful shutdown; other
//! platforms only get Ctrl+C. A handler that cannot be installed is logged
//! and never fires.

use std::future::pending;

use tracing::{info, warn};

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        pending::<()>().await;
    }
}

/// Resolves once a shutdown signal has been received
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c() => info!("SIGINT received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
    info!("Ctrl+C received, shutting down");
}
