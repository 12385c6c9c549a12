use bookstore_client::{ApiError, ConfigError};
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Json: {}", .0)]
    Json(#[from] serde_json::Error),

    #[error("Config: {}", .0)]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("Logging: {}", .0)]
    Logging(String),
}

impl Error {
    /// Message printed to the terminal before exiting.
    pub fn report(&self) -> String {
        match self {
            Error::Api(e) if e.is_terminal_auth() => "session expired, please log in again".into(),
            other => other.to_string(),
        }
    }
}
