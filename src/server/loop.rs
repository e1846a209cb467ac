//! Server accept loop with graceful shutdown

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::connection::accept_connection;
use crate::config::AppState;

const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` resolves
///
/// After shutdown the listener is closed first; in-flight connections then
/// get up to the connection timeout to finish.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => match accept_result {
                Ok((stream, peer_addr)) => {
                    accept_connection(stream, peer_addr, &state, &active_connections);
                }
                Err(e) => error!("Failed to accept connection: {e}"),
            },
            () = &mut shutdown => break,
        }
    }

    drop(listener);
    let grace = Duration::from_secs(state.config.performance.connection_timeout);
    drain_connections(&active_connections, grace).await;
    Ok(())
}

async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            info!("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!("Shutting down with {remaining} connections still open");
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let active = AtomicUsize::new(0);
        tokio::time::timeout(Duration::from_secs(1), drain_connections(&active, Duration::from_secs(30)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let active = AtomicUsize::new(3);
        tokio::time::timeout(
            Duration::from_secs(5),
            drain_connections(&active, Duration::from_millis(100)),
        )
        .await
        .unwrap();
        assert_eq!(active.load(Ordering::SeqCst), 3);
    }
}
