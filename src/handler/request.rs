//! Per-request context and URI normalization

use std::collections::HashMap;

use hyper::{HeaderMap, Method};

use crate::error::ServeError;

/// Request context handed to the dispatcher and to plugins
///
/// `uri` is already percent-decoded; `params` holds the decoded query.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: Method, uri: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers,
            params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Normalize a decoded request URI for filesystem lookup
///
/// Trims surrounding whitespace, turns `\` into `/` and drops anything
/// after the first `?`. Any `../` segment is rejected outright.
pub fn normalize_uri(uri: &str) -> Result<String, ServeError> {
    let mut uri = uri.trim().replace('\\', "/");
    if let Some(pos) = uri.find('?') {
        uri.truncate(pos);
    }

    if uri.contains("../") || uri.ends_with("/..") {
        return Err(ServeError::forbidden(
            "Won't serve ../ for security reasons.",
        ));
    }

    Ok(uri)
}
