//! Sign-in, sign-up and sign-out.

use tracing::info;

use super::AuthService;
use super::claims::decode_unverified;
use crate::error::ApiError;
use crate::models::{Role, Session, TokenPair};
use crate::navigation::Area;
use crate::session::SessionStore;

/// Result of a successful sign-in: the stored session and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub session: Session,
    pub landing: Area,
}

/// Log in with a username and password and start a session.
pub async fn sign_in(
    auth: &AuthService,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<SignIn, ApiError> {
    let pair = auth.login(username, password).await?;
    start_session(store, pair, username).await
}

/// Register a new account and start a session for it.
pub async fn sign_up(
    auth: &AuthService,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<SignIn, ApiError> {
    let pair = auth.register(username, password).await?;
    start_session(store, pair, username).await
}

/// End the session.
pub async fn sign_out(store: &SessionStore) {
    store.clear().await;
}

/// Build a session from a fresh token pair and store it.
///
/// Identity comes from the access token's claims; `typed_username` is used
/// only when the token carries no `username`.
pub async fn start_session(
    store: &SessionStore,
    pair: TokenPair,
    typed_username: &str,
) -> Result<SignIn, ApiError> {
    let claims = decode_unverified(&pair.access_token)?;
    let role = Role::from_claim(claims.role.as_deref());
    let session = Session {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token.filter(|t| !t.is_empty()),
        username: claims
            .username
            .unwrap_or_else(|| typed_username.to_string()),
        role,
    };
    let landing = Area::for_role(role);
    store.set(session.clone()).await;
    info!(username = %session.username, landing = %landing, "signed in");
    Ok(SignIn { session, landing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn pair(claims: serde_json::Value) -> TokenPair {
        let access_token =
            encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap();
        TokenPair {
            access_token,
            refresh_token: Some("refresh".into()),
        }
    }

    #[tokio::test]
    async fn admin_lands_on_dashboard() {
        let store = SessionStore::new();
        let signed = start_session(
            &store,
            pair(serde_json::json!({"username": "root", "role": "admin"})),
            "root",
        )
        .await
        .unwrap();
        assert_eq!(signed.landing, Area::AdminDashboard);
        assert_eq!(signed.session.role, Role::Admin);
        assert_eq!(store.get().await, Some(signed.session));
    }

    #[tokio::test]
    async fn user_lands_on_catalog() {
        let store = SessionStore::new();
        let signed = start_session(
            &store,
            pair(serde_json::json!({"username": "alice", "role": "user"})),
            "alice",
        )
        .await
        .unwrap();
        assert_eq!(signed.landing, Area::Catalog);
        assert_eq!(signed.session.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn unknown_role_falls_back_to_user() {
        let store = SessionStore::new();
        let signed = start_session(
            &store,
            pair(serde_json::json!({"username": "eve", "role": "auditor"})),
            "eve",
        )
        .await
        .unwrap();
        assert_eq!(signed.session.role, Role::User);
        assert_eq!(signed.landing, Area::Catalog);
    }

    #[tokio::test]
    async fn missing_username_claim_uses_typed_name() {
        let store = SessionStore::new();
        let signed = start_session(&store, pair(serde_json::json!({"user_id": 1})), "carol")
            .await
            .unwrap();
        assert_eq!(signed.session.username, "carol");
        assert_eq!(signed.session.role, Role::User);
    }

    #[tokio::test]
    async fn malformed_token_stores_nothing() {
        let store = SessionStore::new();
        let bad = TokenPair {
            access_token: "garbage".into(),
            refresh_token: None,
        };
        assert!(start_session(&store, bad, "x").await.is_err());
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let store = SessionStore::new();
        start_session(
            &store,
            pair(serde_json::json!({"username": "alice", "role": "user"})),
            "alice",
        )
        .await
        .unwrap();
        sign_out(&store).await;
        assert!(store.get().await.is_none());
    }
}
