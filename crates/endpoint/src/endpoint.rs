// crates/endpoint/src/endpoint.rs
//! Endpoint descriptor trait and the standard template implementation

use std::collections::HashMap;

use url::Url;

use crate::error::{EndpointError, EndpointResult};
use crate::method::Method;

/// Describes the shape of one HTTP request.
///
/// A descriptor is a passive value: it carries everything needed to build a
/// request but performs no network activity itself. Implementors supply the
/// required fields; the optional ones default to `None`. The provided
/// `url` method assembles the absolute request URL from the descriptor's
/// fields and fails before any request is built if they do not form one.
pub trait Endpoint: Send + Sync {
    /// URL scheme, e.g. "https"
    fn scheme(&self) -> &str {
        "https"
    }

    /// Host name, e.g. "api.example.com"
    fn host(&self) -> &str;

    /// API version prefix prepended to the path, e.g. "/v1"
    fn version(&self) -> &str;

    /// Resource path, e.g. "/users"
    fn path(&self) -> &str;

    /// HTTP method for the request
    fn method(&self) -> Method;

    /// Header name/value pairs attached verbatim to the request
    fn headers(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Query parameters, appended to the URL in declared order
    fn parameters(&self) -> Option<Vec<(String, String)>> {
        None
    }

    /// Raw request body bytes
    fn body(&self) -> Option<Vec<u8>> {
        None
    }

    /// Multipart boundary string.
    ///
    /// Declared for callers that build multipart bodies; request assembly
    /// does not consume it. Callers embed the boundary in their own
    /// `Content-Type` header.
    fn boundary(&self) -> Option<String> {
        None
    }

    /// Assembles the absolute request URL from the descriptor's fields
    fn url(&self) -> EndpointResult<Url> {
        assemble_url(self)
    }
}

/// Assembles an absolute URL from a descriptor's scheme, host, version,
/// path, and query parameters.
///
/// Identical descriptor fields always produce the identical URL string.
pub fn assemble_url<E: Endpoint + ?Sized>(endpoint: &E) -> EndpointResult<Url> {
    let host = endpoint.host();
    if host.is_empty() {
        return Err(EndpointError::InvalidUrl("empty host".to_string()));
    }

    let base = format!("{}://{}", endpoint.scheme(), host);
    let mut url = Url::parse(&base).map_err(|e| EndpointError::InvalidUrl(e.to_string()))?;
    url.set_path(&format!("{}{}", endpoint.version(), endpoint.path()));

    if let Some(parameters) = endpoint.parameters() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &parameters {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Standard endpoint descriptor built field by field.
///
/// For callers that do not want to implement `Endpoint` on their own type.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    scheme: String,
    host: String,
    version: String,
    path: String,
    method: Method,
    headers: Option<HashMap<String, String>>,
    parameters: Option<Vec<(String, String)>>,
    body: Option<Vec<u8>>,
    boundary: Option<String>,
}

impl RequestTemplate {
    /// Creates a GET template for `host` and `path` over https
    pub fn new(host: String, path: String) -> Self {
        Self {
            scheme: "https".to_string(),
            host,
            version: String::new(),
            path,
            method: Method::Get,
            headers: None,
            parameters: None,
            body: None,
            boundary: None,
        }
    }

    pub fn with_scheme(mut self, scheme: String) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_version(mut self, version: String) -> Self {
        self.version = version;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: String, value: String) -> Self {
        self.headers.get_or_insert_with(HashMap::new).insert(name, value);
        self
    }

    pub fn with_parameter(mut self, name: String, value: String) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push((name, value));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_boundary(mut self, boundary: String) -> Self {
        self.boundary = Some(boundary);
        self
    }
}

impl Endpoint for RequestTemplate {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> Method {
        self.method
    }

    fn headers(&self) -> Option<HashMap<String, String>> {
        self.headers.clone()
    }

    fn parameters(&self) -> Option<Vec<(String, String)>> {
        self.parameters.clone()
    }

    fn body(&self) -> Option<Vec<u8>> {
        self.body.clone()
    }

    fn boundary(&self) -> Option<String> {
        self.boundary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_endpoint() -> RequestTemplate {
        RequestTemplate::new("api.example.com".to_string(), "/users".to_string())
            .with_version("/v1".to_string())
    }

    #[test]
    fn test_url_assembly() {
        let url = users_endpoint().url().unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn test_url_assembly_is_deterministic() {
        let first = users_endpoint()
            .with_parameter("limit".to_string(), "10".to_string())
            .with_parameter("offset".to_string(), "20".to_string())
            .url()
            .unwrap();
        let second = users_endpoint()
            .with_parameter("limit".to_string(), "10".to_string())
            .with_parameter("offset".to_string(), "20".to_string())
            .url()
            .unwrap();

        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_parameters_keep_declared_order() {
        let url = users_endpoint()
            .with_parameter("b".to_string(), "2".to_string())
            .with_parameter("a".to_string(), "1".to_string())
            .url()
            .unwrap();

        assert_eq!(url.query(), Some("b=2&a=1"));
    }

    #[test]
    fn test_parameter_values_are_encoded() {
        let url = users_endpoint()
            .with_parameter("q".to_string(), "ada lovelace".to_string())
            .url()
            .unwrap();

        assert_eq!(url.query(), Some("q=ada+lovelace"));
    }

    #[test]
    fn test_empty_host_fails() {
        let template = RequestTemplate::new(String::new(), "/users".to_string());
        let result = template.url();

        assert!(matches!(result, Err(EndpointError::InvalidUrl(_))));
    }

    #[test]
    fn test_malformed_scheme_fails() {
        let template = users_endpoint().with_scheme("not a scheme".to_string());
        let result = template.url();

        assert!(matches!(result, Err(EndpointError::InvalidUrl(_))));
    }

    #[test]
    fn test_template_defaults() {
        let template = RequestTemplate::new("example.com".to_string(), "/ping".to_string());

        assert_eq!(template.scheme(), "https");
        assert_eq!(template.method(), Method::Get);
        assert!(template.headers().is_none());
        assert!(template.parameters().is_none());
        assert!(template.body().is_none());
        assert!(template.boundary().is_none());
    }

    #[test]
    fn test_template_builder() {
        let template = users_endpoint()
            .with_method(Method::Post)
            .with_header("Content-Type".to_string(), "application/json".to_string())
            .with_body(b"{}".to_vec())
            .with_boundary("----boundary".to_string());

        assert_eq!(template.method(), Method::Post);
        let headers = template.headers().unwrap();
        assert_eq!(headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(template.body(), Some(b"{}".to_vec()));
        assert_eq!(template.boundary(), Some("----boundary".to_string()));
    }

    #[test]
    fn test_assemble_url_standalone() {
        let template = users_endpoint();
        let from_fn = assemble_url(&template).unwrap();
        let from_trait = template.url().unwrap();

        assert_eq!(from_fn, from_trait);
    }
}
