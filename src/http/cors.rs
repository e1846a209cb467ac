//! Cross-origin resource sharing headers

use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};
use tracing::warn;

use super::Response;

pub const DEFAULT_ALLOWED_HEADERS: &str = "origin,accept,content-type";
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, HEAD";
/// 42 hours
pub const MAX_AGE_SECS: u32 = 42 * 60 * 60;

/// CORS settings; present only when an origin is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub origin: String,
    pub allow_headers: String,
}

impl CorsPolicy {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            allow_headers: DEFAULT_ALLOWED_HEADERS.to_string(),
        }
    }

    #[must_use]
    pub fn with_allow_headers(mut self, allow_headers: impl Into<String>) -> Self {
        self.allow_headers = allow_headers.into();
        self
    }

    /// Attach the CORS headers to a response, replacing any previous values
    pub fn apply(&self, res: &mut Response) {
        let headers = res.headers_mut();
        match HeaderValue::from_str(&self.origin) {
            Ok(v) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, v);
            }
            Err(e) => warn!(origin = %self.origin, "invalid CORS origin: {e}"),
        }
        match HeaderValue::from_str(&self.allow_headers) {
            Ok(v) => {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, v);
            }
            Err(e) => warn!(allow_headers = %self.allow_headers, "invalid CORS allow headers: {e}"),
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(MAX_AGE_SECS));
    }
}
