//! HTTP cache validation module
//!
//! Provides `ETag` generation and evaluation of the conditional request
//! headers (`If-None-Match`, `If-Range`).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use hyper::header::{HeaderMap, HeaderName, IF_NONE_MATCH, IF_RANGE, RANGE};

/// Generate an `ETag` from a file's identity and version
///
/// Combines the absolute path, last modification time (milliseconds since
/// the epoch) and length. The value is a caching heuristic, not a digest.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(path: &Path, modified_ms: u128, len: u64) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    modified_ms.hash(&mut hasher);
    len.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// `If-Range` allows the range when it is absent or exactly the current `ETag`
pub fn if_range_allows(if_range: Option<&str>, etag: &str) -> bool {
    if_range.map_or(true, |v| v == etag)
}

/// Conditional request headers relevant to file serving
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConditionalHeaders {
    pub range: Option<String>,
    pub if_range: Option<String>,
    pub if_none_match: Option<String>,
}

impl ConditionalHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            range: get(RANGE),
            if_range: get(IF_RANGE),
            if_none_match: get(IF_NONE_MATCH),
        }
    }
}
