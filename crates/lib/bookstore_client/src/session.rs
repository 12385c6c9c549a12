//! Session store: the one piece of shared mutable client state.
//!
//! Holds the current credentials behind a `tokio` lock. Cloning the store
//! clones the handle, so every collaborator sees the same session. A store
//! created with [`SessionStore::persistent`] mirrors the session into a JSON
//! file so it survives process restarts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::Session;

#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    file: Option<Arc<PathBuf>>,
}

impl SessionStore {
    /// In-memory store with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory store seeded with `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
            file: None,
        }
    }

    /// Store backed by `path`. Loads the session saved there, if any.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = load_session_file(&path);
        Self {
            inner: Arc::new(RwLock::new(session)),
            file: Some(Arc::new(path)),
        }
    }

    pub async fn get(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    /// Replace the whole session (sign-in).
    pub async fn set(&self, session: Session) {
        let mut guard = self.inner.write().await;
        info!(username = %session.username, role = %session.role, "session started");
        self.persist(Some(&session));
        *guard = Some(session);
    }

    /// Swap in an access token obtained with `refresh_token`.
    ///
    /// Only the session that still holds `refresh_token` is updated. Returns
    /// `false` when the session was cleared or replaced by another sign-in
    /// while the refresh was in flight.
    pub async fn update_access_token(
        &self,
        refresh_token: &str,
        token: impl Into<String>,
    ) -> bool {
        let mut guard = self.inner.write().await;
        match guard.as_mut() {
            Some(session) if session.refresh_token.as_deref() == Some(refresh_token) => {
                session.access_token = token.into();
                self.persist(Some(session));
                true
            }
            _ => false,
        }
    }

    /// Drop the session (sign-out or dead refresh token).
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        if let Some(session) = guard.take() {
            info!(username = %session.username, "session cleared");
        }
        self.persist(None);
    }

    fn persist(&self, session: Option<&Session>) {
        let Some(path) = self.file.as_deref() else {
            return;
        };
        let result = match session {
            Some(session) => write_session_file(path, session),
            None => match std::fs::remove_file(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "failed to persist session");
        }
    }
}

fn load_session_file(path: &Path) -> Option<Session> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read session file");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            None
        }
    }
}

/// Write to a sibling temp file readable only by the owner, then rename it
/// over `path`.
fn write_session_file(path: &Path, session: &Session) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(session)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&tmp)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(&json)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp, path)
}
