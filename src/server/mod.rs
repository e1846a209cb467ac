//! Server module entry
//!
//! Listener setup, per-connection serving and the accept loop.

pub mod connection;
pub mod listener;
mod signal;

// `loop` is a keyword
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::shutdown_signal;
