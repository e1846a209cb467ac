//! Application state shared by all connections

use std::sync::Arc;

use super::types::Config;
use crate::handler::Dispatcher;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn access_log_format(&self) -> &str {
        &self.config.logging.access_log_format
    }
}
