// crates/endpoint/src/error.rs
//! Error types for descriptor assembly

use thiserror::Error;

/// Result type for descriptor operations
pub type EndpointResult<T> = Result<T, EndpointError>;

/// Errors that can occur while assembling a request from a descriptor
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Descriptor fields do not form a valid absolute URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
