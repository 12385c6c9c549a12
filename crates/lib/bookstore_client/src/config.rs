//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3050";
pub const DEFAULT_AUTH_URL: &str = "http://localhost:3100";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where the services live and how long a single call may take.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the book-catalog service.
    pub catalog_url: Url,
    /// Base URL of the auth service.
    pub auth_url: Url,
    /// Per-request timeout handed to the HTTP client.
    pub timeout: Duration,
    /// File the session is kept in between runs. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                                  |
    /// |--------------------------|------------------------------------------|
    /// | `CATALOG_URL`            | `http://localhost:3050`                  |
    /// | `AUTH_URL`               | `http://localhost:3100`                  |
    /// | `HTTP_TIMEOUT_SECS`      | `30`                                     |
    /// | `BOOKSTORE_SESSION_FILE` | `<data dir>/bookstore/session.json`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = lookup("CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.into());
        let auth = lookup("AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into());
        let timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let session_file = lookup("BOOKSTORE_SESSION_FILE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(default_session_path);

        Ok(Self {
            catalog_url: parse_url("CATALOG_URL", &catalog)?,
            auth_url: parse_url("AUTH_URL", &auth)?,
            timeout,
            session_file,
        })
    }

    /// Build a config from explicit values, keeping the session in memory.
    pub fn new(catalog_url: &str, auth_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_url: parse_url("catalog_url", catalog_url)?,
            auth_url: parse_url("auth_url", auth_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
        })
    }
}

pub fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: "HTTP_TIMEOUT_SECS",
            value: raw.to_string(),
        }),
    }
}

/// `<data dir>/bookstore/session.json`.
pub fn default_session_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("bookstore").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_parses_urls() {
        let config = ClientConfig::new("http://127.0.0.1:3050", "http://127.0.0.1:3100").unwrap();
        assert_eq!(config.catalog_url.port(), Some(3050));
        assert_eq!(config.auth_url.port(), Some(3100));
        assert!(config.session_file.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn bad_url_is_reported_by_name() {
        let err = ClientConfig::new("not a url", DEFAULT_AUTH_URL).unwrap_err();
        assert!(err.to_string().contains("catalog_url"), "{err}");
    }

    #[test]
    fn timeout_must_be_positive_seconds() {
        assert_eq!(parse_timeout(" 5 ").unwrap(), Duration::from_secs(5));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn default_session_path_lives_under_bookstore() {
        if let Some(path) = default_session_path() {
            assert!(path.ends_with("bookstore/session.json"));
        }
    }

    #[test]
    fn lookup_without_variables_uses_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.catalog_url.as_str(), "http://localhost:3050/");
        assert_eq!(config.auth_url.as_str(), "http://localhost:3100/");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.session_file, default_session_path());
    }

    #[test]
    fn lookup_reads_every_variable() {
        let vars = std::collections::HashMap::from([
            ("CATALOG_URL", "http://catalog.internal:8080"),
            ("AUTH_URL", "http://auth.internal:9090"),
            ("HTTP_TIMEOUT_SECS", "7"),
            ("BOOKSTORE_SESSION_FILE", "/var/lib/bookstore/session.json"),
        ]);
        let config = ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.catalog_url.port(), Some(8080));
        assert_eq!(config.auth_url.host_str(), Some("auth.internal"));
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/var/lib/bookstore/session.json"))
        );
    }

    #[test]
    fn lookup_rejects_bad_values() {
        let err = ClientConfig::from_lookup(|name| {
            (name == "HTTP_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "HTTP_TIMEOUT_SECS", .. }));

        let err = ClientConfig::from_lookup(|name| (name == "AUTH_URL").then(|| "::".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "AUTH_URL", .. }));
    }
}
