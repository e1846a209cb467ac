//! HTTP response building module
//!
//! Builders for every response variant the server produces. Builder
//! failures (invalid header values) are logged and degrade to a bare
//! response with the same status instead of panicking.

use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LOCATION,
};
use hyper::StatusCode;

use super::body::Body;
use super::path_codec::encode_path;
use super::Response;

pub const MIME_PLAINTEXT: &str = "text/plain";
pub const MIME_HTML: &str = "text/html; charset=utf-8";

/// Build a plaintext response with the given status
pub fn build_plain_response(status: StatusCode, text: impl Into<String>) -> Response {
    let text = text.into();
    hyper::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, MIME_PLAINTEXT)
        .header(CONTENT_LENGTH, text.len())
        .body(Body::from(text))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Build generic 200 HTML response
pub fn build_html_response(content: String) -> Response {
    hyper::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, MIME_HTML)
        .header(CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build OPTIONS preflight response (empty 200)
pub fn build_options_response() -> Response {
    hyper::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, MIME_PLAINTEXT)
        .header(CONTENT_LENGTH, 0)
        .body(Body::Empty)
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 301 redirect to a directory URI with its trailing slash
pub fn build_redirect_response(target: &str) -> Response {
    let location = encode_path(target);
    let html = format!(
        "<html><body>Redirected: <a href=\"{location}\">{}</a></body></html>",
        escape_html(target)
    );
    hyper::Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, &location)
        .header(CONTENT_TYPE, MIME_HTML)
        .header(CONTENT_LENGTH, html.len())
        .body(Body::from(html))
        .unwrap_or_else(|e| fallback(StatusCode::MOVED_PERMANENTLY, &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(mime_type: &str, etag: &str) -> Response {
    hyper::Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(CONTENT_TYPE, mime_type)
        .header(ETAG, etag)
        .body(Body::Empty)
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64, etag: &str) -> Response {
    hyper::Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, MIME_PLAINTEXT)
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .header(CONTENT_LENGTH, 0)
        .header(ETAG, etag)
        .body(Body::Empty)
        .unwrap_or_else(|e| fallback(StatusCode::RANGE_NOT_SATISFIABLE, &e))
}

/// Build full 200 response for a file body
pub fn build_file_response(body: Body, mime_type: &str, etag: &str) -> Response {
    hyper::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mime_type)
        .header(ACCEPT_RANGES, "bytes")
        .header(CONTENT_LENGTH, body.len())
        .header(ETAG, etag)
        .body(body)
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    body: Body,
    mime_type: &str,
    etag: &str,
    start: u64,
    end: u64,
    total_size: u64,
) -> Response {
    hyper::Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, mime_type)
        .header(ACCEPT_RANGES, "bytes")
        .header(CONTENT_LENGTH, body.len())
        .header(CONTENT_RANGE, format!("bytes {start}-{end}/{total_size}"))
        .header(ETAG, etag)
        .body(body)
        .unwrap_or_else(|e| fallback(StatusCode::PARTIAL_CONTENT, &e))
}

/// Minimal HTML escaping (sufficient for file names and URIs)
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn fallback(status: StatusCode, error: &hyper::http::Error) -> Response {
    tracing::error!("Failed to build {status} response: {error}");
    let mut res = Response::new(Body::Bytes(Bytes::new()));
    *res.status_mut() = status;
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_has_location_and_link() {
        let res = build_redirect_response("/docs/");
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.headers()[LOCATION], "/docs/");
        let body = res.into_body().into_bytes().unwrap();
        assert_eq!(
            body,
            "<html><body>Redirected: <a href=\"/docs/\">/docs/</a></body></html>"
        );
    }

    #[test]
    fn test_redirect_encodes_location() {
        let res = build_redirect_response("/my docs/");
        assert_eq!(res.headers()[LOCATION], "/my%20docs/");
    }

    #[test]
    fn test_416_headers() {
        let res = build_416_response(2048, "\"e\"");
        assert_eq!(res.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes */2048");
        assert_eq!(res.headers()[ETAG], "\"e\"");
    }

    #[test]
    fn test_partial_headers() {
        let res = build_partial_response(Body::from("0123456789"), "text/plain", "\"e\"", 0, 9, 2048);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes 0-9/2048");
        assert_eq!(res.headers()[CONTENT_LENGTH], "10");
        assert_eq!(res.headers()[ACCEPT_RANGES], "bytes");
    }

    #[test]
    fn test_invalid_header_falls_back() {
        let res = build_304_response("text/plain\n", "\"e\"");
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert!(res.headers().get(ETAG).is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }
}
