//! Static file serving module
//!
//! Serves a single file with entity tags, byte ranges and conditional
//! request handling. The body is the open file itself, positioned at the
//! first byte to send.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;
use std::time::UNIX_EPOCH;

use hyper::HeaderMap;
use tracing::{debug, warn};

use crate::error::ServeError;
use crate::http::cache::{self, ConditionalHeaders};
use crate::http::range::{parse_range_header, RangeParseResult};
use crate::http::{response, Body, Response};

/// Serve `file` honoring `Range`, `If-Range` and `If-None-Match`
///
/// Any metadata, open or seek failure turns into a 403.
pub fn serve_file(headers: &HeaderMap, file: &Path, mime_type: &str) -> Response {
    match build_file_response(headers, file, mime_type) {
        Ok(res) => res,
        Err(e) => {
            warn!(path = %file.display(), "Failed to read file: {e}");
            ServeError::forbidden("Reading file failed.").into_response()
        }
    }
}

fn build_file_response(headers: &HeaderMap, file: &Path, mime_type: &str) -> io::Result<Response> {
    let meta = fs::metadata(file)?;
    let file_len = meta.len();
    let modified_ms = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_millis());
    let absolute = fs::canonicalize(file)?;
    let etag = cache::generate_etag(&absolute, modified_ms, file_len);

    let cond = ConditionalHeaders::from_headers(headers);
    let not_modified = cache::check_etag_match(cond.if_none_match.as_deref(), &etag);

    let range = if cache::if_range_allows(cond.if_range.as_deref(), &etag) {
        parse_range_header(cond.range.as_deref(), file_len)
    } else {
        RangeParseResult::None
    };

    match range {
        RangeParseResult::Valid(range) => {
            if not_modified {
                return Ok(response::build_304_response(mime_type, &etag));
            }
            let end = range.end_position(file_len);
            let len = range.content_length(file_len);
            debug!(path = %file.display(), start = range.start, end, "Serving byte range");

            let mut f = File::open(file)?;
            f.seek(SeekFrom::Start(range.start))?;
            Ok(response::build_partial_response(
                Body::File { file: f, len },
                mime_type,
                &etag,
                range.start,
                end,
                file_len,
            ))
        }
        RangeParseResult::NotSatisfiable => Ok(response::build_416_response(file_len, &etag)),
        RangeParseResult::None if not_modified => {
            Ok(response::build_304_response(mime_type, &etag))
        }
        RangeParseResult::None => {
            let f = File::open(file)?;
            Ok(response::build_file_response(
                Body::File { file: f, len: file_len },
                mime_type,
                &etag,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{
        HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
        IF_NONE_MATCH, IF_RANGE, RANGE,
    };
    use hyper::StatusCode;
    use std::path::PathBuf;

    const MIME: &str = "text/plain; charset=utf-8";

    fn fixture(len: usize) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let content: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn headers(pairs: &[(hyper::header::HeaderName, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (name, value) in pairs {
            h.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        h
    }

    fn etag_of(path: &Path) -> String {
        let res = serve_file(&HeaderMap::new(), path, MIME);
        res.headers()[ETAG].to_str().unwrap().to_string()
    }

    #[test]
    fn test_full_file() {
        let (_dir, path) = fixture(100);
        let res = serve_file(&HeaderMap::new(), &path, MIME);

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[ACCEPT_RANGES], "bytes");
        assert_eq!(res.headers()[CONTENT_LENGTH], "100");
        assert_eq!(res.headers()[CONTENT_TYPE], MIME);
        let etag = res.headers()[ETAG].clone();
        assert_eq!(res.into_body().into_bytes().unwrap().len(), 100);

        // stable across requests
        assert_eq!(etag_of(&path), etag);
    }

    #[test]
    fn test_etag_changes_with_content() {
        let (_dir, path) = fixture(100);
        let before = etag_of(&path);
        fs::write(&path, vec![b'x'; 101]).unwrap();
        assert_ne!(etag_of(&path), before);
    }

    #[test]
    fn test_range() {
        let (_dir, path) = fixture(2048);
        let res = serve_file(&headers(&[(RANGE, "bytes=0-9")]), &path, MIME);

        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes 0-9/2048");
        assert_eq!(res.headers()[CONTENT_LENGTH], "10");
        assert_eq!(res.into_body().into_bytes().unwrap(), "abcdefghij");
    }

    #[test]
    fn test_open_range_and_clamp() {
        let (_dir, path) = fixture(100);

        let res = serve_file(&headers(&[(RANGE, "bytes=90-")]), &path, MIME);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes 90-99/100");
        assert_eq!(res.into_body().into_bytes().unwrap().len(), 10);

        let res = serve_file(&headers(&[(RANGE, "bytes=95-500")]), &path, MIME);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes 95-99/100");
        assert_eq!(res.into_body().into_bytes().unwrap().len(), 5);
    }

    #[test]
    fn test_suffix_range() {
        let (_dir, path) = fixture(100);
        let res = serve_file(&headers(&[(RANGE, "bytes=-4")]), &path, MIME);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes 96-99/100");
    }

    #[test]
    fn test_unsatisfiable_range() {
        let (_dir, path) = fixture(100);
        let res = serve_file(&headers(&[(RANGE, "bytes=100-")]), &path, MIME);

        assert_eq!(res.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(res.headers()[CONTENT_RANGE], "bytes */100");
        assert!(res.headers().contains_key(ETAG));
    }

    #[test]
    fn test_malformed_range_is_ignored() {
        let (_dir, path) = fixture(100);
        for value in ["bytes=9-0", "bytes=a-b", "bytes=0-1,5-6", "items=0-1"] {
            let res = serve_file(&headers(&[(RANGE, value)]), &path, MIME);
            assert_eq!(res.status(), StatusCode::OK, "{value}");
        }
    }

    #[test]
    fn test_if_none_match() {
        let (_dir, path) = fixture(100);
        let etag = etag_of(&path);

        let res = serve_file(&headers(&[(IF_NONE_MATCH, etag.as_str())]), &path, MIME);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(res.headers()[ETAG], etag.as_str());
        assert_eq!(res.headers()[CONTENT_TYPE], MIME);
        assert!(res.into_body().is_empty());

        let res = serve_file(&headers(&[(IF_NONE_MATCH, "*")]), &path, MIME);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

        let res = serve_file(&headers(&[(IF_NONE_MATCH, "\"other\"")]), &path, MIME);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn test_if_none_match_with_range() {
        let (_dir, path) = fixture(100);
        let etag = etag_of(&path);
        let res = serve_file(&headers(&[(RANGE, "bytes=0-9"), (IF_NONE_MATCH, etag.as_str())]), &path, MIME);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_if_range() {
        let (_dir, path) = fixture(100);
        let etag = etag_of(&path);

        let res = serve_file(&headers(&[(RANGE, "bytes=0-9"), (IF_RANGE, etag.as_str())]), &path, MIME);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);

        let res = serve_file(&headers(&[(RANGE, "bytes=0-9"), (IF_RANGE, "\"stale\"")]), &path, MIME);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_LENGTH], "100");
    }

    #[test]
    fn test_stale_if_range_with_matching_etag() {
        let (_dir, path) = fixture(100);
        let etag = etag_of(&path);

        let res = serve_file(
            &headers(&[
                (RANGE, "bytes=0-9"),
                (IF_RANGE, "\"stale\""),
                (IF_NONE_MATCH, etag.as_str()),
            ]),
            &path,
            MIME,
        );
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(res.headers()[ETAG], etag.as_str());
        assert!(!res.headers().contains_key(CONTENT_RANGE));
    }

    #[test]
    fn test_missing_file_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let res = serve_file(&HeaderMap::new(), &dir.path().join("gone"), MIME);
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(!res.headers().contains_key(ETAG));
        assert_eq!(
            res.into_body().into_bytes().unwrap(),
            "FORBIDDEN: Reading file failed."
        );
    }
}
