//! MIME type defaults
//!
//! Seed table for the registry's extension-to-mime mapping, plus the
//! extension extraction rule used for lookups.

use std::collections::HashMap;

/// Mime type used when an extension is unknown
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const DEFAULT_MIME_TYPES: &[(&str, &str)] = &[
    // Text
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/plain; charset=utf-8"),
    ("xml", "application/xml"),
    ("csv", "text/csv"),
    // JavaScript/WASM
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("wasm", "application/wasm"),
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    // Video
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("ogg", "video/ogg"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    // Fonts
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("eot", "application/vnd.ms-fontobject"),
    // Documents
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("gzip", "application/gzip"),
    ("tar", "application/x-tar"),
];

/// Build the default extension-to-mime table
pub fn default_mime_types() -> HashMap<String, String> {
    DEFAULT_MIME_TYPES
        .iter()
        .map(|(ext, mime)| ((*ext).to_string(), (*mime).to_string()))
        .collect()
}

/// Lower-cased extension of the final path segment, if any
///
/// # Examples
/// ```
/// use webroot::http::mime::extension_of;
/// assert_eq!(extension_of("/docs/README.MD").as_deref(), Some("md"));
/// assert_eq!(extension_of("/v1.2/notes"), None);
/// ```
pub fn extension_of(uri: &str) -> Option<String> {
    let segment = uri.rsplit('/').next().unwrap_or(uri);
    segment
        .rfind('.')
        .map(|dot| segment[dot + 1..].to_ascii_lowercase())
}
