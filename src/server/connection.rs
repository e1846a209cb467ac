//! Connection handling
//!
//! One spawned task per accepted TCP connection, serving HTTP/1.1 with the
//! request adapter and bounded by the configured connection timeout.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::config::AppState;
use crate::handler;

/// Accept a connection unless the connection limit is reached
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // increment first, then check, so two accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            warn!("Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected.");
            drop(stream);
            return;
        }
    }

    debug!(peer = %peer_addr, "Accepted connection");
    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_secs = state.config.performance.connection_timeout;

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );

        // 0 disables the timeout
        let result = if timeout_secs == 0 {
            Ok(conn.await)
        } else {
            tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await
        };

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => debug!(peer = %peer_addr, "Connection error: {err}"),
            Err(_) => debug!(peer = %peer_addr, "Connection closed after {timeout_secs}s timeout"),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
