//! Content plugins
//!
//! A plugin claims a mime type and may take over serving for files of that
//! type, for example to render a markup format to HTML. Plugins are
//! discovered through a [`PluginInfo`] descriptor at startup and stored in
//! the [`Registry`].

pub mod markdown;
mod registry;

use std::collections::HashMap;
use std::path::Path;

use hyper::HeaderMap;

use crate::handler::RequestContext;
use crate::http::Response;

pub use registry::Registry;

/// Startup configuration handed to every plugin (`host`, `port`, `quiet`,
/// `home`, plus plugin-namespaced options)
pub type PluginOptions = HashMap<String, String>;

/// Same-request re-dispatch issued by a plugin
///
/// Never sent to a client: the dispatcher resolves `uri` again using
/// `headers` in place of the original request headers.
#[derive(Debug, Clone)]
pub struct InternalRewrite {
    pub uri: String,
    pub headers: HeaderMap,
}

impl InternalRewrite {
    pub fn new(uri: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            uri: uri.into(),
            headers,
        }
    }
}

/// Result of asking a plugin to serve a file
#[derive(Debug)]
pub enum PluginOutcome {
    Served(Response),
    Rewrite(InternalRewrite),
    /// The plugin could not produce content; the dispatcher falls back.
    NotServed,
}

/// Capability set of a content plugin
///
/// Implementations must not panic on I/O or encoding problems: log them and
/// return [`PluginOutcome::NotServed`].
pub trait Plugin: Send + Sync {
    /// Called exactly once, before the plugin serves anything.
    fn initialize(&mut self, _options: &PluginOptions) {}

    /// Whether this plugin can produce content for `uri` under `root`.
    fn can_serve(&self, uri: &str, root: &Path) -> bool;

    fn serve_file(
        &self,
        uri: &str,
        headers: &HeaderMap,
        request: &RequestContext,
        file: &Path,
        mime_type: &str,
    ) -> PluginOutcome;
}

/// Plugin descriptor used for discovery at startup
pub trait PluginInfo {
    fn mime_types(&self) -> Vec<String>;

    fn index_files_for_mime_type(&self, mime_type: &str) -> Vec<String>;

    fn plugin_for(&self, mime_type: &str) -> Option<Box<dyn Plugin>>;
}
