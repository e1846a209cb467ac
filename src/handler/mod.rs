//! Request handler module
//!
//! The synchronous core (`Dispatcher`, file server, directory lister) and
//! the async adapter that connects it to hyper.

mod dispatcher;
mod entry;
pub mod listing;
mod request;
pub mod static_files;

pub use dispatcher::{Dispatcher, MAX_HOPS};
pub use entry::handle_request;
pub use request::{normalize_uri, RequestContext};
