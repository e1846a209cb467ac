//! Configuration types
//!
//! Plain data deserialized by the `config` crate; every field has a
//! default so an empty environment yields a working server.

use std::collections::HashMap;

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    /// Root directories, searched in order
    #[serde(default = "default_home")]
    pub home: Vec<String>,
    /// Options handed to plugins as-is
    #[serde(default)]
    pub plugins: HashMap<String, String>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (runtime default when unset)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Suppress per-request logging in the dispatcher
    pub quiet: bool,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Allowed origin; CORS is off when unset
    #[serde(default)]
    pub cors: Option<String>,
    pub cors_allow_headers: String,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Per-connection timeout in seconds
    pub connection_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

fn default_home() -> Vec<String> {
    vec![".".to_string()]
}
