//! Configuration module entry point
//!
//! Layers, lowest precedence first: built-in defaults, `webroot.toml` (or
//! the file named on the command line), `WEBROOT_*` environment variables,
//! command-line flags.

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::error::StartupError;
use crate::http::CorsPolicy;
use crate::plugin::PluginOptions;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file name, looked up without extension
pub const DEFAULT_CONFIG_FILE: &str = "webroot";

/// Values given on the command line, applied on top of every other layer
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub quiet: bool,
    pub dirs: Vec<String>,
    pub cors: Option<String>,
    pub plugin_options: Vec<(String, String)>,
}

impl Config {
    /// Load configuration and apply command-line overrides
    ///
    /// A config file named explicitly must exist; the default one is
    /// optional.
    pub fn load(overrides: &Overrides) -> Result<Self, StartupError> {
        let file = match &overrides.config_file {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.quiet", false)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.cors_allow_headers", crate::http::cors::DEFAULT_ALLOWED_HEADERS)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("WEBROOT")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("home")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply(overrides);
        Ok(config)
    }

    fn apply(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if overrides.quiet {
            self.logging.quiet = true;
        }
        if !overrides.dirs.is_empty() {
            self.home.clone_from(&overrides.dirs);
        }
        if let Some(origin) = &overrides.cors {
            self.http.cors = Some(origin.clone());
        }
        for (key, value) in &overrides.plugin_options {
            self.plugins.insert(key.clone(), value.clone());
        }
    }

    /// Resolve `host:port`, taking the first address the host resolves to
    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(StartupError::InvalidAddress(addr))
    }

    /// Canonical root directories, in configured order
    pub fn roots(&self) -> Result<Vec<PathBuf>, StartupError> {
        self.home
            .iter()
            .map(|dir| {
                let root = PathBuf::from(dir)
                    .canonicalize()
                    .map_err(|source| StartupError::InvalidRoot {
                        path: PathBuf::from(dir),
                        source,
                    })?;
                if root.is_dir() {
                    Ok(root)
                } else {
                    Err(StartupError::NotADirectory(root))
                }
            })
            .collect()
    }

    pub fn cors_policy(&self) -> Option<CorsPolicy> {
        self.http
            .cors
            .as_ref()
            .map(|origin| CorsPolicy::new(origin).with_allow_headers(&self.http.cors_allow_headers))
    }

    /// Startup options handed to every plugin
    ///
    /// `home` is the colon-joined list of `roots`; plugin options are added
    /// last and may shadow the built-in keys.
    pub fn plugin_options(&self, roots: &[PathBuf]) -> PluginOptions {
        let home = roots
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(":");

        let mut options = PluginOptions::new();
        options.insert("host".to_string(), self.server.host.clone());
        options.insert("port".to_string(), self.server.port.to_string());
        options.insert("quiet".to_string(), self.logging.quiet.to_string());
        options.insert("home".to_string(), home);
        options.extend(self.plugins.iter().map(|(k, v)| (k.clone(), v.clone())));
        options
    }
}
