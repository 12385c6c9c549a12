//! Single-flight access-token refresh.
//!
//! The first caller that needs a refresh starts one; callers arriving while
//! it is in flight with the same refresh token await the same shared future
//! and observe the same outcome. The session store is updated inside the
//! flight, so the new token is visible before any caller retries. A flight
//! removes itself from the slot when it finishes, whether or not anyone is
//! still awaiting it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::Authenticator;
use crate::error::ApiError;
use crate::session::SessionStore;

type RefreshFlight = Shared<BoxFuture<'static, Result<String, ApiError>>>;

struct InFlight {
    id: u64,
    refresh_token: String,
    flight: RefreshFlight,
}

type Slot = Mutex<Option<InFlight>>;

pub struct RefreshCoordinator {
    authenticator: Arc<dyn Authenticator>,
    session: SessionStore,
    in_flight: Arc<Slot>,
    next_flight: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(authenticator: Arc<dyn Authenticator>, session: SessionStore) -> Self {
        Self {
            authenticator,
            session,
            in_flight: Arc::new(Mutex::new(None)),
            next_flight: AtomicU64::new(0),
        }
    }

    /// Exchange `refresh_token` for a new access token, or join the refresh
    /// already in flight for that same token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let flight = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(current) if current.refresh_token == refresh_token => {
                    debug!(flight = current.id, "joining in-flight refresh");
                    current.flight.clone()
                }
                previous => {
                    let id = self.next_flight.fetch_add(1, Ordering::Relaxed);
                    if let Some(previous) = previous {
                        debug!(flight = id, superseded = previous.id, "refresh token changed");
                    }
                    debug!(flight = id, "starting refresh");
                    let flight = start_flight(
                        id,
                        Arc::clone(&self.authenticator),
                        self.session.clone(),
                        refresh_token.to_string(),
                        Arc::downgrade(&self.in_flight),
                    );
                    *slot = Some(InFlight {
                        id,
                        refresh_token: refresh_token.to_string(),
                        flight: flight.clone(),
                    });
                    flight
                }
            }
        };

        flight.await
    }
}

fn start_flight(
    id: u64,
    authenticator: Arc<dyn Authenticator>,
    session: SessionStore,
    refresh_token: String,
    slot: Weak<Slot>,
) -> RefreshFlight {
    async move {
        let outcome = exchange(authenticator.as_ref(), &session, &refresh_token).await;

        if let Some(slot) = slot.upgrade() {
            let mut slot = slot.lock().await;
            if slot.as_ref().is_some_and(|current| current.id == id) {
                *slot = None;
            }
        }
        outcome
    }
    .boxed()
    .shared()
}

async fn exchange(
    authenticator: &dyn Authenticator,
    session: &SessionStore,
    refresh_token: &str,
) -> Result<String, ApiError> {
    let token = authenticator.refresh(refresh_token).await?;
    if !session
        .update_access_token(refresh_token, token.clone())
        .await
    {
        warn!("session changed during token refresh, discarding refreshed token");
        return Err(ApiError::Unauthorized(
            "session changed during token refresh".into(),
        ));
    }
    info!("access token refreshed");
    Ok(token)
}
