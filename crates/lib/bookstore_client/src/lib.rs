//! # bookstore_client
//!
//! Client for the bookstore catalog and auth services.
//!
//! Every catalog call goes through [`AuthenticatedClient`], which attaches the
//! session's bearer token and, on a 401, refreshes the token once (sharing
//! the refresh with concurrent callers) before retrying. [`CatalogApi`] puts
//! a typed method on each endpoint and [`CartOrderSaga`] turns the cart into
//! an order.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod navigation;
pub mod refresh;
pub mod request;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use auth::{AuthService, Authenticator, SignIn};
pub use cart::CartView;
pub use catalog::CatalogApi;
pub use checkout::CartOrderSaga;
pub use client::AuthenticatedClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use executor::{HttpExecutor, RequestExecutor};
pub use navigation::Area;
pub use request::{ApiResponse, RequestSpec};
pub use session::SessionStore;

/// Everything a storefront front-end needs, wired from one config.
#[derive(Clone)]
pub struct Storefront {
    pub auth: AuthService,
    pub catalog: CatalogApi,
    pub session: SessionStore,
}

impl Storefront {
    /// Wire HTTP executors for both services around one session store.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::network(format!("building HTTP client: {e}")))?;

        let session = match &config.session_file {
            Some(path) => SessionStore::persistent(path),
            None => SessionStore::new(),
        };
        let auth = AuthService::new(http.clone(), &config.auth_url);
        let executor = HttpExecutor::new(http, &config.catalog_url);
        let client = AuthenticatedClient::new(
            Arc::new(executor),
            Arc::new(auth.clone()),
            session.clone(),
        );

        Ok(Self {
            auth,
            catalog: CatalogApi::new(client),
            session,
        })
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignIn, ApiError> {
        auth::sign_in(&self.auth, &self.session, username, password).await
    }

    pub async fn sign_up(&self, username: &str, password: &str) -> Result<SignIn, ApiError> {
        auth::sign_up(&self.auth, &self.session, username, password).await
    }

    pub async fn sign_out(&self) {
        auth::sign_out(&self.session).await
    }

    /// Run the checkout saga against `view`.
    pub async fn checkout(
        &self,
        view: &mut CartView,
        address: &str,
    ) -> Result<models::Order, ApiError> {
        CartOrderSaga::new(&self.catalog).checkout(view, address).await
    }
}

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }

    #[tokio::test]
    async fn connect_without_session_file_starts_signed_out() {
        let config = ClientConfig::new("http://127.0.0.1:1", "http://127.0.0.1:2").unwrap();
        let storefront = Storefront::connect(&config).unwrap();
        assert!(storefront.session.get().await.is_none());
    }
}
