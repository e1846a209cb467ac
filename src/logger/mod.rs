//! Logger module
//!
//! Installs the `tracing` subscriber and provides the few log lines that
//! are shared between the binary and the server loop. Access log lines go
//! to the `access` target so they can be filtered separately, e.g.
//! `RUST_LOG=info,access=off`.

mod format;

pub use format::AccessLogEntry;

use std::fs::OpenOptions;
use std::io;
use std::net::SocketAddr;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LoggingConfig};

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. When a log file
/// is configured the returned guard must be kept alive until shutdown so
/// buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(io::Error::other)?;
            Ok(Some(guard))
        }
        None => {
            builder.try_init().map_err(io::Error::other)?;
            Ok(None)
        }
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    info!("Listening on: http://{addr}");
    info!(roots = ?config.home, "Serving directories");
    if let Some(workers) = config.server.workers {
        info!("Worker threads: {workers}");
    }
    if let Some(origin) = &config.http.cors {
        info!(origin = %origin, "CORS enabled");
    }
    if let Some(path) = &config.logging.log_file {
        info!("Log file: {path}");
    }
}

/// Emit a formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    info!(target: "access", "{}", entry.format(format));
}
