use tracing_subscriber::EnvFilter;

use crate::Error;

const DEFAULT_FILTER: &str = "warn,bookstore_client=info";

/// Logs go to stderr; stdout carries command output only.
pub fn init() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(())
}
