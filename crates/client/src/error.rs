// crates/client/src/error.rs
//! Error types for request execution

use serde::Deserialize;
use thiserror::Error;

/// Result type for request execution
pub type RequestResult<T> = Result<T, RequestError>;

/// Failures produced by executing a request and classifying its response
#[derive(Debug, Error)]
pub enum RequestError {
    /// Descriptor fields do not assemble into a valid URL
    #[error("invalid request URL")]
    InvalidUrl,

    /// The exchange completed but no HTTP response was captured
    #[error("no HTTP response received")]
    NoResponse,

    /// The server rejected the request (status 400) with a message
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server rejected the credentials (status 401)
    #[error("unauthorized")]
    Unauthorized,

    /// The server answered with a status outside the handled set
    #[error("{0}")]
    UnexpectedStatusCode(String),

    /// The response body could not be decoded into the expected type
    #[error("unexpected error: {0}")]
    UnexpectedError(String),

    /// Transport failure: offline, connection refused, or timed out
    #[error("internet connection problem: {0}")]
    InternetConnection(String),

    /// Transport failure with no further classification
    #[error("unknown request failure")]
    Unknown,
}

/// Server-provided error payload delivered with status 400
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RequestError::BadRequest("missing field".to_string());
        assert!(err.to_string().contains("bad request"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_unauthorized_display() {
        let err = RequestError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized");
    }

    #[test]
    fn test_internet_connection_display() {
        let err = RequestError::InternetConnection("connection refused".to_string());
        assert!(err.to_string().contains("internet connection"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_response_decodes() {
        let payload: ErrorResponse = serde_json::from_str(r#"{"message":"missing field"}"#).unwrap();
        assert_eq!(payload.message, "missing field");
    }

    #[test]
    fn test_error_response_ignores_extra_fields() {
        let payload: ErrorResponse =
            serde_json::from_str(r#"{"message":"nope","code":42}"#).unwrap();
        assert_eq!(payload.message, "nope");
    }
}
