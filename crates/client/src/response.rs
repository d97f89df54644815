// crates/client/src/response.rs
//! Status-code classification and transport-failure mapping

use serde::de::DeserializeOwned;

use crate::error::{ErrorResponse, RequestError, RequestResult};

/// User-facing message attached to statuses outside the handled set
pub const UNEXPECTED_STATUS_MESSAGE: &str = "The server returned an unexpected status code";

/// Classifies one HTTP response by status code and decodes its body.
///
/// - 200..=299 decodes the body as JSON into `T`
/// - 400 extracts the server message from an [`ErrorResponse`] body
/// - 401 maps to `Unauthorized` without inspecting the body
/// - everything else maps to `UnexpectedStatusCode` with a fixed message,
///   regardless of body content
///
/// A body that fails to decode on the 2xx or 400 paths maps to
/// `UnexpectedError` carrying the decoder's message.
pub fn classify<T: DeserializeOwned>(status: u16, body: &[u8]) -> RequestResult<T> {
    match status {
        200..=299 => {
            serde_json::from_slice(body).map_err(|e| RequestError::UnexpectedError(e.to_string()))
        }
        400 => match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(payload) => Err(RequestError::BadRequest(payload.message)),
            Err(e) => Err(RequestError::UnexpectedError(e.to_string())),
        },
        401 => Err(RequestError::Unauthorized),
        _ => Err(RequestError::UnexpectedStatusCode(
            UNEXPECTED_STATUS_MESSAGE.to_string(),
        )),
    }
}

/// Maps a transport-level failure to a request error.
///
/// Timeouts and connect-level failures (offline, refused, unreachable)
/// surface as `InternetConnection`; anything else is `Unknown`.
pub fn classify_transport(error: reqwest::Error) -> RequestError {
    if error.is_timeout() || error.is_connect() {
        RequestError::InternetConnection(error.to_string())
    } else {
        RequestError::Unknown
    }
}
