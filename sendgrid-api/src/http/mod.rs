// sendgrid-api/src/http/mod.rs
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt;

/// Header SendGrid reads to run a request as a subuser
pub const ON_BEHALF_OF_HEADER: &str = "on-behalf-of";

// Characters that would end or split a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a caller-supplied value for use as one path segment
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A single API call described as plain data.
///
/// `path` is relative to the API base URL (e.g. `teammates/pending`); the
/// transport joins it with the base URL and adds authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query-string argument
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Add the impersonation header when a subuser is given
    pub fn on_behalf_of(self, subuser: Option<&str>) -> Self {
        match subuser {
            Some(user) => self.header(ON_BEHALF_OF_HEADER, user),
            None => self,
        }
    }

    /// Body decoded as JSON, for inspection in tests and logs
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Error from HTTP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: Option<u16>,
    pub message: String,
}

impl HttpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Connection failures, rate limiting and server errors
    pub fn is_transient(&self) -> bool {
        match self.status {
            None => true,
            Some(code) => code == 429 || code >= 500,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "HTTP error {}: {}", status, self.message)
        } else {
            write!(f, "HTTP error: {}", self.message)
        }
    }
}

impl std::error::Error for HttpError {}

/// Transport used by the resource façades. Implementations apply the base
/// URL and credentials, and turn non-success statuses into `HttpError`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute the request and return the response body
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, HttpError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, HttpError> {
        (**self).send(request).await
    }
}

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "reqwest")]
pub use reqwest::{ReqwestClient, DEFAULT_BASE_URL};


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::get("teammates")
            .query("limit", 10)
            .query("offset", 0)
            .on_behalf_of(Some("subuser1"));
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "teammates");
        assert_eq!(
            req.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "0".to_string())
            ]
        );
        assert_eq!(req.header_value("On-Behalf-Of"), Some("subuser1"));
        assert!(req.body.is_none());
    }

    #[test]
    fn test_on_behalf_of_none_adds_no_header() {
        let req = ApiRequest::delete("teammates/bob").on_behalf_of(None);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_json_body() {
        let req = ApiRequest::post("scopes").json(&json!({"a": 1})).unwrap();
        assert_eq!(req.json_body(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_encode_segment_escapes_reserved_characters() {
        assert_eq!(encode_segment("ab#cd"), "ab%23cd");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(encode_segment("50%"), "50%25");
        assert_eq!(encode_segment("jane.doe@example.com"), "jane.doe@example.com");
        assert_eq!(encode_segment("YWRhQGV4YW1wbGUuY29t"), "YWRhQGV4YW1wbGUuY29t");
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::status(404, "not found").to_string(),
            "HTTP error 404: not found"
        );
        assert_eq!(
            HttpError::transport("connection reset").to_string(),
            "HTTP error: connection reset"
        );
    }

    #[test]
    fn test_http_error_is_transient() {
        assert!(HttpError::transport("timeout").is_transient());
        assert!(HttpError::status(429, "slow down").is_transient());
        assert!(HttpError::status(502, "bad gateway").is_transient());
        assert!(!HttpError::status(400, "bad request").is_transient());
    }
}
