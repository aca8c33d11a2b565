//! HTTP transport for the Tether service.
//!
//! The transport is injected into everything that talks to the service so
//! the queue manager and gateway stay agnostic to the concrete HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::{ApiRequest, ApiResponse, Method};
use crate::error::TetherError;

/// An injected callable transport: one request in, one decoded response out.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to the service.
    ///
    /// # Errors
    ///
    /// Connectivity-level failures are reported as [`TetherError::Network`];
    /// non-success responses as [`TetherError::Api`].
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TetherError>;
}

/// `reqwest`-backed transport with a fixed base URL and request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TetherError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TetherError> {
        let url = format!("{}{}", self.base_url, request.path);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(TetherError::from_transport)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(TetherError::from_transport)?;

        if !(200..300).contains(&status) {
            // Error bodies are not always JSON (proxies, gateways)
            let message = serde_json::from_str::<Value>(&text)
                .map_or_else(|_| text.trim().to_string(), |body| extract_message(&body));
            return Err(TetherError::Api { status, message });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse { status, body })
    }
}

/// Pull a human-readable message out of an error response body.
fn extract_message(body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map_or_else(|| body.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let transport =
            HttpTransport::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_extract_message_prefers_message_field() {
        let body = serde_json::json!({"message": "task not found", "code": 404});
        assert_eq!(extract_message(&body), "task not found");
    }

    #[test]
    fn test_extract_message_falls_back_to_error_field() {
        let body = serde_json::json!({"error": "unauthorized"});
        assert_eq!(extract_message(&body), "unauthorized");
    }

    #[test]
    fn test_extract_message_falls_back_to_raw_body() {
        let body = serde_json::json!({"detail": "odd shape"});
        assert_eq!(extract_message(&body), r#"{"detail":"odd shape"}"#);
    }
}
