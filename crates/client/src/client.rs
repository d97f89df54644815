// crates/client/src/client.rs
//! Foreground request execution

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use courier_endpoint::{Endpoint, Method};
use serde::de::DeserializeOwned;

use crate::error::{RequestError, RequestResult};
use crate::response::{classify, classify_transport};

/// Fixed request-phase timeout, applied to connection establishment
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fixed resource timeout, applied to the whole exchange
pub(crate) const RESOURCE_TIMEOUT: Duration = Duration::from_secs(15);

/// Client capability over endpoint descriptors.
///
/// The provided `request` implementation delegates to [`send`], which
/// performs exactly one exchange per call on a fresh, non-shared platform
/// client. Implementors can override `request` to route descriptors
/// differently, e.g. through a recording client in tests.
#[async_trait]
pub trait Client: Send + Sync {
    /// Executes the described request and decodes the JSON response into `T`
    async fn request<T>(&self, endpoint: &dyn Endpoint) -> RequestResult<T>
    where
        T: DeserializeOwned + Send,
    {
        send(endpoint).await
    }
}

/// Stateless client using the provided request behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiClient;

#[async_trait]
impl Client for ApiClient {}

/// Performs one foreground exchange described by `endpoint` and decodes the
/// JSON response into `T`.
///
/// The caller is suspended until the exchange and decode complete or fail.
/// Each call builds its own short-lived platform client with fixed 15 second
/// connect and overall timeouts and no cookie or cache persistence, so no
/// state is shared between calls. Failures are returned as values; nothing
/// is retried.
pub async fn send<T>(endpoint: &dyn Endpoint) -> RequestResult<T>
where
    T: DeserializeOwned + Send,
{
    let url = match endpoint.url() {
        Ok(url) => url,
        Err(e) => {
            log::warn!("request dropped before send: {e}");
            return Err(RequestError::InvalidUrl);
        }
    };

    let client = reqwest::Client::builder()
        .connect_timeout(REQUEST_TIMEOUT)
        .timeout(RESOURCE_TIMEOUT)
        .build()
        .map_err(|_| RequestError::Unknown)?;

    let request = build_request(&client, endpoint, url.clone());

    log::debug!("sending {} {}", endpoint.method(), url);

    let response = request.send().await.map_err(classify_transport)?;
    let status = response.status().as_u16();
    let body: Bytes = response.bytes().await.map_err(classify_transport)?;

    let result = classify(status, &body);
    match &result {
        Ok(_) => log::debug!("{} {} returned {} ({} bytes)", endpoint.method(), url, status, body.len()),
        Err(error) => log::debug!("{} {} failed with {}: {}", endpoint.method(), url, status, error),
    }
    result
}

/// Builds a platform request from a descriptor: method, headers attached
/// verbatim, body bytes if present.
pub(crate) fn build_request(
    client: &reqwest::Client,
    endpoint: &dyn Endpoint,
    url: reqwest::Url,
) -> reqwest::RequestBuilder {
    let mut request = client.request(platform_method(endpoint.method()), url);
    if let Some(headers) = endpoint.headers() {
        for (name, value) in headers {
            request = request.header(&name, &value);
        }
    }
    if let Some(body) = endpoint.body() {
        request = request.body(body);
    }
    request
}

/// Converts a descriptor method to the platform method type
pub(crate) fn platform_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_endpoint::RequestTemplate;

    #[test]
    fn test_invalid_descriptor_fails_before_send() {
        let endpoint = RequestTemplate::new(String::new(), "/users".to_string());

        let result: RequestResult<serde_json::Value> = tokio_test::block_on(send(&endpoint));
        assert!(matches!(result, Err(RequestError::InvalidUrl)));
    }

    #[test]
    fn test_platform_method_mapping() {
        assert_eq!(platform_method(Method::Get), reqwest::Method::GET);
        assert_eq!(platform_method(Method::Post), reqwest::Method::POST);
        assert_eq!(platform_method(Method::Put), reqwest::Method::PUT);
        assert_eq!(platform_method(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(platform_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(platform_method(Method::Head), reqwest::Method::HEAD);
    }

    #[test]
    fn test_timeouts_are_fixed() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(15));
        assert_eq!(RESOURCE_TIMEOUT, Duration::from_secs(15));
    }
}
