//! Single-call HTTP execution with bearer credentials.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::request::{ApiResponse, RequestSpec, error_message};

/// Issues one request and classifies the outcome. No retries.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send `spec`, attaching `access_token` as a bearer credential when
    /// present.
    async fn issue(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed executor rooted at a service base URL.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    http: Client,
    base_url: String,
}

impl HttpExecutor {
    pub fn new(http: Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn issue(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.http.request(spec.method.clone(), &url);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        debug!(method = %spec.method, path = %spec.path, "issuing catalog request");

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("{} {} failed: {e}", spec.method, spec.path)))?;

        let outcome = read_response(response).await;
        if let Err(e) = &outcome {
            debug!(method = %spec.method, path = %spec.path, error = %e, "catalog request failed");
        }
        outcome
    }
}

/// Read a `reqwest` response body and classify it by status.
pub(crate) async fn read_response(response: reqwest::Response) -> Result<ApiResponse, ApiError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::network(format!("reading response body: {e}")))?;
    let body = if text.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
    };
    classify(status, body)
}

/// Map a status and body to success or one of the three failure kinds.
pub fn classify(status: u16, body: serde_json::Value) -> Result<ApiResponse, ApiError> {
    if (200..300).contains(&status) {
        return Ok(ApiResponse::new(status, body));
    }
    let message = error_message(&body).unwrap_or_else(|| match &body {
        serde_json::Value::String(text) if !text.is_empty() => text.clone(),
        _ => format!("HTTP {status}"),
    });
    Err(ApiError::from_status(status, message))
}
