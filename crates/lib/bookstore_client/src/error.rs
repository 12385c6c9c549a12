//! Client error taxonomy.

use thiserror::Error;

/// Fallback text when the server gave no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again later";

/// Failures surfaced by every client operation.
///
/// `Unauthorized` is recoverable exactly once via a token refresh. Once it
/// reaches a caller, together with `RefreshInvalid`, it means the session is
/// unusable and the user has to sign in again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Refresh token invalid: {0}")]
    RefreshInvalid(String),

    #[error("Request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Service unavailable: {message}")]
    ServerOrNetwork { status: Option<u16>, message: String },
}

impl ApiError {
    /// Build the error for a non-success HTTP status.
    ///
    /// 401 is `Unauthorized`, other 4xx are `Client`, everything else
    /// (5xx, unexpected 1xx/3xx) is `ServerOrNetwork`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ApiError::Unauthorized(message),
            400..=499 => ApiError::Client { status, message },
            _ => ApiError::ServerOrNetwork {
                status: Some(status),
                message,
            },
        }
    }

    /// Transport-level failure (connect, timeout, broken body).
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::ServerOrNetwork {
            status: None,
            message: message.into(),
        }
    }

    /// A success response whose body did not have the expected shape.
    pub fn malformed(what: &str, err: impl std::fmt::Display) -> Self {
        ApiError::ServerOrNetwork {
            status: None,
            message: format!("malformed {what} response: {err}"),
        }
    }

    /// Whether the caller must discard the session and sign in again.
    pub fn is_terminal_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::RefreshInvalid(_))
    }

    /// Text suitable for showing to the user.
    ///
    /// Client rejections carry the server's own message verbatim; server and
    /// network failures collapse to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(_) | ApiError::RefreshInvalid(_) => {
                "Your session has expired, please log in again".to_string()
            }
            ApiError::Client { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Client { .. } | ApiError::ServerOrNetwork { .. } => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}
