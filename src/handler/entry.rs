//! Hyper request adapter
//!
//! Turns a hyper request into a [`RequestContext`], runs the synchronous
//! dispatcher on the blocking pool and materializes the response body.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Request, Version};
use percent_encoding::percent_decode_str;
use tracing::error;
use url::form_urlencoded;

use super::request::RequestContext;
use crate::config::AppState;
use crate::error::ServeError;
use crate::http::Body;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = request_context(&req);
    let is_head = ctx.method == Method::HEAD;
    let path = ctx.uri.clone();

    let dispatcher = Arc::clone(&state.dispatcher);
    let joined = tokio::task::spawn_blocking(move || {
        let (parts, body) = dispatcher.serve(&ctx).into_parts();
        // headers still describe the full body
        let body = if is_head { Body::Empty } else { body };
        body.into_bytes().map(|bytes| (parts, bytes)).map_err(|e| {
            error!("Failed to read response body: {e}");
            ServeError::forbidden("Reading file failed.")
        })
    })
    .await;

    let (parts, bytes) = match joined {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => into_parts(e),
        Err(e) => {
            error!("Request handler failed: {e}");
            into_parts(ServeError::internal("request handler failed."))
        }
    };
    let bytes = if is_head { Bytes::new() } else { bytes };

    if state.access_log() {
        let mut entry = access_entry(&req, &path, peer);
        entry.status = parts.status.as_u16();
        entry.body_bytes = bytes.len() as u64;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.access_log_format());
    }

    Ok(hyper::Response::from_parts(parts, Full::new(bytes)))
}

fn into_parts(e: ServeError) -> (hyper::http::response::Parts, Bytes) {
    let (parts, body) = e.into_response().into_parts();
    (parts, body.into_bytes().unwrap_or_default())
}

/// Decoded path and query of a hyper request
fn request_context<B>(req: &Request<B>) -> RequestContext {
    let path = percent_decode_str(req.uri().path())
        .decode_utf8_lossy()
        .into_owned();
    let params: HashMap<String, String> = req
        .uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    RequestContext::new(req.method().clone(), path, req.headers().clone()).with_params(params)
}

fn access_entry<B>(req: &Request<B>, path: &str, peer: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(peer.ip().to_string(), req.method().as_str(), path);
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
