use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DispatchError, InvocationError, InvocationErrorKind};

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError>;
}

/// Real HTTP client using reqwest
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DispatchError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an HTTP status to the kind of failure it represents
pub fn classify_status(status: u16) -> InvocationErrorKind {
    match status {
        408 => InvocationErrorKind::Timeout,
        429 => InvocationErrorKind::RateLimited,
        400 | 401 | 403 | 404 | 422 => InvocationErrorKind::Permanent,
        _ => InvocationErrorKind::Transient,
    }
}

fn transport_error(error: reqwest::Error) -> InvocationError {
    if error.is_timeout() {
        InvocationError::timeout("http", format!("Request timed out: {}", error))
    } else {
        InvocationError::transient("http", format!("Request failed: {}", error))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, InvocationError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(InvocationError::new(
                classify_status(status.as_u16()),
                "http",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                InvocationError::transient("http", format!("Failed to parse response: {}", e))
            }
        })
    }
}
