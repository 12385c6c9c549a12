//! Scripted fakes shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;

use crate::auth::Authenticator;
use crate::catalog::CatalogApi;
use crate::client::AuthenticatedClient;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::models::{Role, Session};
use crate::request::{ApiResponse, RequestSpec};
use crate::session::SessionStore;

type Handler = Box<dyn Fn(&RequestSpec) -> Result<ApiResponse, ApiError> + Send + Sync>;

/// Executor answering from a route table and recording every request.
pub(crate) struct ScriptedExecutor {
    routes: Vec<(Method, String, Handler)>,
    calls: Mutex<Vec<RequestSpec>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on<F>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&RequestSpec) -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
    {
        self.routes.push((method, path.to_string(), Box::new(handler)));
        self
    }

    pub(crate) fn calls(&self) -> Vec<RequestSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: &Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|spec| &spec.method == method && spec.path == path)
            .count()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn issue(
        &self,
        spec: &RequestSpec,
        _access_token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(spec.clone());
        self.routes
            .iter()
            .find(|(method, path, _)| method == &spec.method && path == &spec.path)
            .map(|(_, _, handler)| handler(spec))
            .unwrap_or_else(|| Err(ApiError::from_status(404, "no such route")))
    }
}

/// Authenticator whose refresh always fails.
pub(crate) struct RejectingAuthenticator;

#[async_trait]
impl Authenticator for RejectingAuthenticator {
    async fn refresh(&self, _refresh_token: &str) -> Result<String, ApiError> {
        Err(ApiError::RefreshInvalid("not in this test".into()))
    }
}

pub(crate) fn ok(body: serde_json::Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::new(200, body))
}

pub(crate) fn signed_in() -> SessionStore {
    SessionStore::with_session(Session {
        access_token: "token".into(),
        refresh_token: Some("refresh".into()),
        username: "alice".into(),
        role: Role::User,
    })
}

pub(crate) fn catalog(executor: &Arc<ScriptedExecutor>) -> CatalogApi {
    CatalogApi::new(AuthenticatedClient::new(
        executor.clone(),
        Arc::new(RejectingAuthenticator),
        signed_in(),
    ))
}

/// A cart row as the catalog serves it.
pub(crate) fn cart_row(isbn: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "ISBN": isbn,
        "Book_Title": format!("Title {isbn}"),
        "Book_Author": "Author",
        "Image_URL": null,
        "Average_Rating": 0.0,
        "Price": price
    })
}
