//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the dispatcher and the file
//! server: response bodies and builders, entity tags, byte ranges, mime
//! defaults, path encoding and CORS.

pub mod body;
pub mod cache;
pub mod cors;
pub mod mime;
pub mod path_codec;
pub mod range;
pub mod response;

pub use body::Body;
pub use cache::ConditionalHeaders;
pub use cors::CorsPolicy;
pub use path_codec::encode_path;
pub use range::parse_range_header;

/// Response type produced by the dispatcher and by plugins.
pub type Response = hyper::Response<Body>;
