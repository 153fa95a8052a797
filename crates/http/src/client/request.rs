//! Outbound request descriptor

use super::ClientError;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

/// An outbound call that can be dispatched more than once.
///
/// `reqwest::RequestBuilder` is consumed on send, so the client keeps this
/// descriptor around to replay a request after a token refresh. The
/// `retried` marker makes that replay happen at most once.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    retried: bool,
    authenticated: bool,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
            authenticated: true,
        }
    }

    /// Public call: no bearer token, and a 401 never triggers a refresh
    #[must_use]
    pub fn without_session(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set a header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any earlier value
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains bytes not allowed in a header
    pub fn set_bearer(&mut self, token: &str) -> Result<(), ClientError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Token currently carried in `Authorization: Bearer <token>`, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub(crate) const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_bearer_replaces_previous_token() {
        let mut request = PendingRequest::new(Method::GET, "/shops");
        request.set_bearer("A1").unwrap();
        request.set_bearer("A2").unwrap();

        let values: Vec<_> = request.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].to_str().unwrap(), "Bearer A2");
        assert_eq!(request.bearer_token(), Some("A2"));
    }

    #[test]
    fn test_bearer_token_absent_without_header() {
        let request = PendingRequest::new(Method::GET, "/shops");
        assert_eq!(request.bearer_token(), None);
    }

    #[test]
    fn test_set_bearer_rejects_control_characters() {
        let mut request = PendingRequest::new(Method::GET, "/shops");
        let result = request.set_bearer("bad\ntoken");
        assert!(matches!(result, Err(ClientError::InvalidHeader(_))));
    }

    #[test]
    fn test_new_request_is_authenticated_and_fresh() {
        let request = PendingRequest::new(Method::POST, "/auth/login").without_session();
        assert!(!request.is_authenticated());
        assert!(!request.is_retried());
    }
}
