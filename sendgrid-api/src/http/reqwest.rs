// sendgrid-api/src/http/reqwest.rs
use super::{ApiRequest, HttpClient, HttpError, Method};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com/v3";

const USER_AGENT: &str = concat!("sendgrid-api-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            timeout: None,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.bearer_token = Some(token);
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: ApiRequest) -> Result<Vec<u8>, HttpError> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut req = self
            .inner
            .request(to_reqwest_method(request.method), &url)
            .header("user-agent", &self.user_agent)
            .header("accept", "application/json");

        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.header("content-type", "application/json").body(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "request failed");
            HttpError::transport(e.to_string())
        })?;

        let status = resp.status();
        let is_success = status.is_success();
        let status_code = status.as_u16();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError::status(status_code, e.to_string()))?
            .to_vec();

        if !is_success {
            let message = String::from_utf8_lossy(&bytes).to_string();
            tracing::warn!(status = status_code, url = %url, "request rejected");
            return Err(HttpError::status(status_code, message));
        }

        tracing::debug!(status = status_code, bytes = bytes.len(), "response received");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(ReqwestClient::new().base_url(), "https://api.sendgrid.com/v3");
    }

    #[test]
    fn test_url_joining_trims_slashes() {
        let client = ReqwestClient::new().with_base_url("http://localhost:8080/v3/");
        assert_eq!(
            client.url_for("/teammates/pending"),
            "http://localhost:8080/v3/teammates/pending"
        );
        assert_eq!(client.url_for("scopes"), "http://localhost:8080/v3/scopes");
    }
}
