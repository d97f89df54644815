// crates/endpoint/src/lib.rs
//! Endpoint descriptors for HTTP requests

mod endpoint;
mod error;
mod method;

pub use endpoint::{assemble_url, Endpoint, RequestTemplate};
pub use error::{EndpointError, EndpointResult};
pub use method::Method;
pub use url::Url;
