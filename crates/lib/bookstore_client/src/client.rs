//! Authenticated request facade.
//!
//! Every catalog call goes through [`AuthenticatedClient::call`]: issue with
//! the current access token; on 401, refresh once (shared with any
//! concurrent refresh) and retry the same request once.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::Authenticator;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::refresh::RefreshCoordinator;
use crate::request::{ApiResponse, RequestSpec};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthenticatedClient {
    executor: Arc<dyn RequestExecutor>,
    refresher: Arc<RefreshCoordinator>,
    session: SessionStore,
}

impl AuthenticatedClient {
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        authenticator: Arc<dyn Authenticator>,
        session: SessionStore,
    ) -> Self {
        let refresher = Arc::new(RefreshCoordinator::new(authenticator, session.clone()));
        Self {
            executor,
            refresher,
            session,
        }
    }

    /// Issue `spec`, refreshing the access token and retrying at most once
    /// on `Unauthorized`.
    pub async fn call(&self, spec: &RequestSpec) -> Result<ApiResponse, ApiError> {
        let sent = self.session.get().await;
        let sent_token = sent.as_ref().map(|s| s.access_token.clone());
        let rejection = match self.executor.issue(spec, sent_token.as_deref()).await {
            Err(ApiError::Unauthorized(message)) => message,
            other => return other,
        };

        let Some(refresh_token) = sent.and_then(|s| s.refresh_token) else {
            debug!(path = %spec.path, "unauthorized and no refresh token");
            return Err(ApiError::Unauthorized(rejection));
        };

        let token = match self.session.get().await {
            // Signed out, or someone else signed in, while the request was out.
            None => return Err(ApiError::Unauthorized(rejection)),
            Some(current) if current.refresh_token.as_deref() != Some(refresh_token.as_str()) => {
                debug!(path = %spec.path, "session replaced, not retrying");
                return Err(ApiError::Unauthorized(rejection));
            }
            // Another call's refresh landed after this request went out.
            Some(current) if sent_token.as_deref() != Some(current.access_token.as_str()) => {
                debug!(path = %spec.path, "access token already refreshed");
                current.access_token
            }
            Some(_) => match self.refresher.refresh(&refresh_token).await {
                Ok(token) => token,
                Err(e) => {
                    if matches!(e, ApiError::RefreshInvalid(_)) {
                        warn!(path = %spec.path, "refresh token rejected, discarding session");
                        self.session.clear().await;
                    }
                    return Err(e);
                }
            },
        };

        debug!(method = %spec.method, path = %spec.path, "retrying after refresh");
        self.executor.issue(spec, Some(&token)).await
    }
}
