//! Mime table, plugin table and index file names
//!
//! Built once at startup, then shared read-only by the dispatcher. All
//! mutation goes through `&mut self`, so a registry that has been moved
//! behind an `Arc` can no longer change.

use std::collections::HashMap;
use std::fmt;

use tracing::info;

use super::{Plugin, PluginInfo, PluginOptions};
use crate::http::mime::{default_mime_types, extension_of, DEFAULT_MIME_TYPE};

const DEFAULT_INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

pub struct Registry {
    mime_types: HashMap<String, String>,
    plugins: HashMap<String, Box<dyn Plugin>>,
    index_files: Vec<String>,
}

impl Registry {
    /// Registry seeded with the default mime table and index file names
    pub fn new() -> Self {
        Self {
            mime_types: default_mime_types(),
            plugins: HashMap::new(),
            index_files: DEFAULT_INDEX_FILES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Register `plugin` for `mime_type`
    ///
    /// Does nothing when the mime type is empty or the plugin is absent.
    /// Each index file name maps its extension (text after the first `.`)
    /// to `mime_type` and is appended to the index file search order. The
    /// plugin is initialized with `options` before it is stored; a later
    /// registration for the same mime type replaces it.
    pub fn register_plugin(
        &mut self,
        index_files: &[String],
        mime_type: &str,
        plugin: Option<Box<dyn Plugin>>,
        options: &PluginOptions,
    ) {
        let Some(mut plugin) = plugin else {
            return;
        };
        if mime_type.is_empty() {
            return;
        }

        for filename in index_files {
            if let Some((_, extension)) = filename.split_once('.') {
                self.mime_types
                    .insert(extension.to_lowercase(), mime_type.to_string());
            }
        }
        self.index_files.extend(index_files.iter().cloned());

        plugin.initialize(options);
        self.plugins.insert(mime_type.to_string(), plugin);
    }

    /// Register every mime type a plugin descriptor offers
    pub fn register_info(&mut self, info: &dyn PluginInfo, options: &PluginOptions) {
        for mime in info.mime_types() {
            let index_files = info.index_files_for_mime_type(&mime);
            info!(
                mime_type = %mime,
                index_files = ?index_files,
                "Found plugin for mime type"
            );
            self.register_plugin(&index_files, &mime, info.plugin_for(&mime), options);
        }
    }

    /// Mime type for a URI, by the extension of its final path segment
    pub fn mime_type_for(&self, uri: &str) -> &str {
        extension_of(uri)
            .and_then(|ext| self.mime_types.get(&ext))
            .map_or(DEFAULT_MIME_TYPE, String::as_str)
    }

    pub fn plugin_for(&self, mime_type: &str) -> Option<&dyn Plugin> {
        self.plugins.get(mime_type).map(|p| &**p)
    }

    /// Candidate index file names, in search order
    pub fn index_files(&self) -> &[String] {
        &self.index_files
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut plugins: Vec<_> = self.plugins.keys().collect();
        plugins.sort();
        f.debug_struct("Registry")
            .field("mime_types", &self.mime_types.len())
            .field("plugins", &plugins)
            .field("index_files", &self.index_files)
            .finish()
    }
}
