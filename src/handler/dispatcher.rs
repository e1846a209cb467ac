//! Request resolution
//!
//! Maps a request URI onto the configured root directories and decides how
//! it is answered: redirect, index file, directory listing, plugin output or
//! a plain file. Index lookups and plugin rewrites re-run resolution in the
//! same loop, which is bounded by [`MAX_HOPS`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyper::{HeaderMap, Method};
use tracing::{debug, info, warn};

use super::listing::list_directory;
use super::request::{normalize_uri, RequestContext};
use super::static_files::serve_file;
use crate::error::ServeError;
use crate::http::{response, CorsPolicy, Response};
use crate::plugin::{InternalRewrite, Plugin, PluginOutcome, Registry};

/// Maximum number of index hops and internal rewrites per request
pub const MAX_HOPS: usize = 8;

enum Step {
    Done(Response),
    Index(String),
    Rewrite(InternalRewrite),
}

/// Synchronous request resolver shared by all connections
#[derive(Debug)]
pub struct Dispatcher {
    roots: Vec<PathBuf>,
    registry: Arc<Registry>,
    cors: Option<CorsPolicy>,
    quiet: bool,
}

impl Dispatcher {
    /// Create a dispatcher over `roots`, searched in order
    pub fn new(roots: Vec<PathBuf>, registry: Arc<Registry>) -> Self {
        Self {
            roots,
            registry,
            cors: None,
            quiet: false,
        }
    }

    #[must_use]
    pub fn with_cors(mut self, cors: Option<CorsPolicy>) -> Self {
        self.cors = cors;
        self
    }

    /// Suppress per-request logging
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Answer one request
    ///
    /// Never fails: every error is rendered as a plaintext response. When
    /// CORS is enabled the headers are attached to whatever comes out.
    pub fn serve(&self, request: &RequestContext) -> Response {
        if !self.quiet {
            info!(method = %request.method, uri = %request.uri, "Request");
            debug!(headers = ?request.headers, "Request headers");
            debug!(params = ?request.params, "Request params");
        }

        let mut res = match &self.cors {
            Some(_) if request.method == Method::OPTIONS => response::build_options_response(),
            _ => self.resolve(request),
        };

        if let Some(cors) = &self.cors {
            cors.apply(&mut res);
        }
        res
    }

    fn resolve(&self, request: &RequestContext) -> Response {
        if let Some(root) = self.roots.iter().find(|root| !root.is_dir()) {
            return ServeError::internal(format!(
                "given path is not a directory ({}).",
                root.display()
            ))
            .into_response();
        }

        let mut uri = request.uri.clone();
        let mut rewritten: Option<HeaderMap> = None;

        for _ in 0..MAX_HOPS {
            let headers = rewritten.as_ref().unwrap_or(&request.headers);
            match self.step(&uri, headers, request) {
                Ok(Step::Done(res)) => return res,
                Ok(Step::Index(next)) => uri = next,
                Ok(Step::Rewrite(rewrite)) => {
                    debug!(from = %uri, to = %rewrite.uri, "Internal rewrite");
                    uri = rewrite.uri;
                    rewritten = Some(rewrite.headers);
                }
                Err(e) => return e.into_response(),
            }
        }

        warn!(uri = %request.uri, "Gave up after {MAX_HOPS} internal rewrites");
        ServeError::internal("too many internal rewrites.").into_response()
    }

    /// One resolution pass for `uri`
    fn step(
        &self,
        uri: &str,
        headers: &HeaderMap,
        request: &RequestContext,
    ) -> Result<Step, ServeError> {
        let uri = normalize_uri(uri)?;
        let mime_type = self.registry.mime_type_for(&uri);
        let plugin = self.registry.plugin_for(mime_type);

        let root = self
            .roots
            .iter()
            .find(|root| can_serve(&uri, root, plugin))
            .ok_or(ServeError::NotFound)?;
        let path = root.join(uri.trim_start_matches('/'));

        if path.is_dir() {
            if !uri.ends_with('/') {
                return Ok(Step::Done(response::build_redirect_response(&format!(
                    "{uri}/"
                ))));
            }

            if let Some(index) = self.find_index(&path) {
                return Ok(Step::Index(format!("{uri}{index}")));
            }

            return match list_directory(&uri, &path) {
                Ok(page) => Ok(Step::Done(response::build_html_response(page))),
                Err(e) => {
                    warn!(path = %path.display(), "Failed to list directory: {e}");
                    Err(ServeError::forbidden("No directory listing."))
                }
            };
        }

        if let Some(plugin) = plugin.filter(|p| p.can_serve(&uri, root)) {
            match plugin.serve_file(&uri, headers, request, &path, mime_type) {
                PluginOutcome::Served(res) => return Ok(Step::Done(res)),
                PluginOutcome::Rewrite(rewrite) => return Ok(Step::Rewrite(rewrite)),
                PluginOutcome::NotServed if !path.is_file() => return Err(ServeError::NotFound),
                PluginOutcome::NotServed => {
                    debug!(uri = %uri, "Plugin declined, serving file as is");
                }
            }
        }

        Ok(Step::Done(serve_file(headers, &path, mime_type)))
    }

    fn find_index(&self, directory: &Path) -> Option<&str> {
        self.registry
            .index_files()
            .iter()
            .find(|name| directory.join(name).is_file())
            .map(String::as_str)
    }
}

fn can_serve(uri: &str, root: &Path, plugin: Option<&dyn Plugin>) -> bool {
    root.join(uri.trim_start_matches('/')).exists()
        || plugin.is_some_and(|p| p.can_serve(uri, root))
}
