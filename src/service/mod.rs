//! Request handling: path token in, HTTP response out.

pub(crate) mod handler;
pub(crate) mod http;
pub(crate) mod response;

pub use handler::{DEFAULT_CACHE_MAX_AGE, Service, ServiceOpts, token_from_path};
pub use http::HttpServer;
pub use response::{Body, JSON, Response};
