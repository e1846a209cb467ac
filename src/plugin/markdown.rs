//! Markdown plugin
//!
//! Renders `.md` files to HTML on the fly. A request carrying the `raw`
//! query parameter is handed back to the dispatcher, which then serves the
//! source bytes.

use std::fs;
use std::path::Path;

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{HeaderMap, StatusCode};
use pulldown_cmark::{html, Options, Parser};
use tracing::error;

use super::{Plugin, PluginInfo, PluginOptions, PluginOutcome};
use crate::handler::RequestContext;
use crate::http::response::{escape_html, MIME_HTML};
use crate::http::Body;

pub const MIME_MARKDOWN: &str = "text/markdown";
pub const INDEX_FILE: &str = "index.md";
/// Set to `false` to render plain CommonMark without extensions
pub const OPTION_EXTENSIONS: &str = "markdown.extensions";

#[derive(Debug)]
pub struct MarkdownPlugin {
    options: Options,
}

impl MarkdownPlugin {
    pub fn new() -> Self {
        Self {
            options: extended_options(),
        }
    }

    fn render_page(&self, title: &str, source: &str) -> String {
        let parser = Parser::new_ext(source, self.options);
        let mut body = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut body, parser);

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
            escape_html(title)
        )
    }
}

impl Default for MarkdownPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn extended_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

impl Plugin for MarkdownPlugin {
    fn initialize(&mut self, options: &PluginOptions) {
        if options
            .get(OPTION_EXTENSIONS)
            .is_some_and(|v| v.eq_ignore_ascii_case("false"))
        {
            self.options = Options::empty();
        }
    }

    fn can_serve(&self, uri: &str, root: &Path) -> bool {
        root.join(uri.trim_start_matches('/')).exists()
    }

    fn serve_file(
        &self,
        uri: &str,
        _headers: &HeaderMap,
        request: &RequestContext,
        file: &Path,
        _mime_type: &str,
    ) -> PluginOutcome {
        if request.params.contains_key("raw") {
            return PluginOutcome::NotServed;
        }

        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                error!(path = %file.display(), "could not read markdown source: {e}");
                return PluginOutcome::NotServed;
            }
        };

        let page = self.render_page(uri, &source);
        let res = hyper::Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, MIME_HTML)
            .header(CONTENT_LENGTH, page.len())
            .body(Body::from(page));

        match res {
            Ok(res) => PluginOutcome::Served(res),
            Err(e) => {
                error!("failed to build markdown response: {e}");
                PluginOutcome::NotServed
            }
        }
    }
}

/// Descriptor registering [`MarkdownPlugin`] for `text/markdown`
#[derive(Debug, Default)]
pub struct MarkdownPluginInfo;

impl PluginInfo for MarkdownPluginInfo {
    fn mime_types(&self) -> Vec<String> {
        vec![MIME_MARKDOWN.to_string()]
    }

    fn index_files_for_mime_type(&self, _mime_type: &str) -> Vec<String> {
        vec![INDEX_FILE.to_string()]
    }

    fn plugin_for(&self, mime_type: &str) -> Option<Box<dyn Plugin>> {
        (mime_type == MIME_MARKDOWN).then(|| Box::new(MarkdownPlugin::new()) as Box<dyn Plugin>)
    }
}
