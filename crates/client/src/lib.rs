// crates/client/src/lib.rs
//! Typed HTTP client over endpoint descriptors

mod background;
mod client;
mod error;
mod response;

pub use background::{
    decode_download, submit_download, BackgroundSession, DownloadTask, SessionDelegate,
};
pub use client::{send, ApiClient, Client};
pub use error::{ErrorResponse, RequestError, RequestResult};
pub use response::{classify, classify_transport, UNEXPECTED_STATUS_MESSAGE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        // Verify all types are exported
        let _client: ApiClient = ApiClient;
        let result: RequestResult<serde_json::Value> = classify(401, b"");
        assert!(matches!(result, Err(RequestError::Unauthorized)));
        assert!(!UNEXPECTED_STATUS_MESSAGE.is_empty());
    }
}
