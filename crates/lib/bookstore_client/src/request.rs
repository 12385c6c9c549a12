//! Request descriptions and raw responses.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// One catalog-service call, described as a value so it can be issued again
/// after a token refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// A body that cannot be encoded never reaches the service; it is
    /// reported as `ServerOrNetwork` with no status.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::ServerOrNetwork {
            status: None,
            message: format!("request body could not be encoded: {e}"),
        })?;
        self.body = Some(value);
        Ok(self)
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Decode the body into a typed envelope.
    pub fn decode<T: DeserializeOwned>(&self, what: &str) -> Result<T, ApiError> {
        T::deserialize(&self.body).map_err(|e| ApiError::malformed(what, e))
    }
}

/// Pull the human-readable message out of an error body.
///
/// Services answer failures with `{"error": "..."}`; some use `message`.
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_query_and_body() {
        let spec = RequestSpec::get("/books")
            .query("q", "tolkien")
            .query("page", 2)
            .query("limit", 10);
        assert_eq!(spec.method, Method::GET);
        assert_eq!(
            spec.query,
            vec![
                ("q".to_string(), "tolkien".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert!(spec.body.is_none());

        let spec = RequestSpec::delete("/cart")
            .json(&serde_json::json!({"isbn": "0001"}))
            .unwrap();
        assert_eq!(spec.body, Some(serde_json::json!({"isbn": "0001"})));
    }

    #[test]
    fn error_message_prefers_error_field() {
        let body = serde_json::json!({"error": "Book not found", "message": "other"});
        assert_eq!(error_message(&body).as_deref(), Some("Book not found"));

        let body = serde_json::json!({"message": "Order placed successfully!"});
        assert_eq!(
            error_message(&body).as_deref(),
            Some("Order placed successfully!")
        );

        assert!(error_message(&serde_json::json!("plain")).is_none());
    }

    #[test]
    fn decode_reports_malformed_body() {
        #[derive(Debug, serde::Deserialize)]
        struct Total {
            #[serde(rename = "totalBooks")]
            _total: u64,
        }
        let resp = ApiResponse::new(200, serde_json::json!({"unexpected": true}));
        let err = resp.decode::<Total>("total books").unwrap_err();
        assert!(matches!(err, ApiError::ServerOrNetwork { status: None, .. }));
    }

    #[test]
    fn unencodable_body_carries_no_status() {
        let body = std::collections::HashMap::from([((1, 2), 3)]);
        let err = RequestSpec::post("/order").json(&body).unwrap_err();
        assert!(matches!(err, ApiError::ServerOrNetwork { status: None, .. }));
    }
}
