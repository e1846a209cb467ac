//! webroot - an embeddable static-content HTTP server
//!
//! Serves files from an ordered set of root directories with `ETag`,
//! Range and conditional request support, renders directory listings,
//! and lets mime-type scoped plugins take over serving for selected files.
//!
//! The request pipeline lives in [`handler::Dispatcher`]; it is synchronous
//! and engine-agnostic. [`server`] wires it to hyper/tokio.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod plugin;
pub mod server;

pub use error::{ServeError, StartupError};
pub use handler::{Dispatcher, RequestContext};
pub use http::{Body, Response};
pub use plugin::{InternalRewrite, Plugin, PluginInfo, PluginOutcome, Registry};
