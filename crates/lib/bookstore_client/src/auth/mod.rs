//! Auth-service client: login, registration and token refresh.

pub mod claims;
pub mod flow;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::executor::read_response;
use crate::models::TokenPair;
use crate::request::ApiResponse;

pub use flow::{SignIn, sign_in, sign_out, sign_up};

/// Exchanges a refresh credential for a new access credential.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the new access token.
    ///
    /// Fails with `RefreshInvalid` when the service rejects the refresh token
    /// or answers without an access token. Server and transport failures
    /// surface as `ServerOrNetwork`.
    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP client for the auth service (`/auth/*`).
#[derive(Clone, Debug)]
pub struct AuthService {
    http: Client,
    base_url: String,
}

impl AuthService {
    pub fn new(http: Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// `POST /auth/login`.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let resp = self
            .post("/auth/login", &Credentials { username, password })
            .await?;
        resp.decode("login")
    }

    /// `POST /auth/register`. New accounts get the `user` role.
    pub async fn register(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let resp = self
            .post("/auth/register", &Credentials { username, password })
            .await?;
        resp.decode("register")
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "calling auth service");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(format!("POST {path} failed: {e}")))?;
        read_response(response).await
    }
}

#[async_trait]
impl Authenticator for AuthService {
    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let outcome = self
            .post("/auth/refresh", &RefreshRequest { refresh_token })
            .await;
        refresh_outcome(outcome)
    }
}

/// Interpret the refresh endpoint's answer.
pub(crate) fn refresh_outcome(
    outcome: Result<ApiResponse, ApiError>,
) -> Result<String, ApiError> {
    match outcome {
        Ok(resp) => match resp.body.get("access_token").and_then(|v| v.as_str()) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => {
                warn!("refresh response carried no access token");
                Err(ApiError::RefreshInvalid(
                    "refresh response carried no access token".into(),
                ))
            }
        },
        Err(ApiError::Unauthorized(message)) | Err(ApiError::Client { message, .. }) => {
            warn!(reason = %message, "refresh token rejected");
            Err(ApiError::RefreshInvalid(message))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_success_yields_token() {
        let resp = ApiResponse::new(200, serde_json::json!({"access_token": "new"}));
        assert_eq!(refresh_outcome(Ok(resp)).unwrap(), "new");
    }

    #[test]
    fn refresh_without_token_is_invalid() {
        let resp = ApiResponse::new(200, serde_json::json!({}));
        assert!(matches!(
            refresh_outcome(Ok(resp)),
            Err(ApiError::RefreshInvalid(_))
        ));

        let resp = ApiResponse::new(200, serde_json::json!({"access_token": ""}));
        assert!(matches!(
            refresh_outcome(Ok(resp)),
            Err(ApiError::RefreshInvalid(_))
        ));
    }

    #[test]
    fn rejected_refresh_is_invalid() {
        let err = refresh_outcome(Err(ApiError::Unauthorized("Refresh token expired".into())))
            .unwrap_err();
        assert_eq!(err, ApiError::RefreshInvalid("Refresh token expired".into()));

        let err = refresh_outcome(Err(ApiError::from_status(400, "Refresh token required")))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::RefreshInvalid("Refresh token required".into())
        );
    }

    #[test]
    fn server_failure_during_refresh_is_not_terminal() {
        let err = refresh_outcome(Err(ApiError::network("connection refused"))).unwrap_err();
        assert!(!err.is_terminal_auth());
    }
}
