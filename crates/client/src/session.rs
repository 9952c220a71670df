//! Session state handed to the HTTP client.
//!
//! A session is a bearer token plus the user snapshot returned at login. The
//! storefront keeps it in an `auth_token` cookie and never touches a store;
//! the admin shell persists it to disk in the same `{ "state": { token, user } }`
//! shape the dashboard used in browser storage.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use babyshop_core::UserSnapshot;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("session file could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// An authenticated session.
pub struct Session {
    pub token: SecretString,
    pub user: Option<UserSnapshot>,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user: Option<UserSnapshot>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user,
        }
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.token.expose_secret()),
            user: self.user.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user.as_ref().map(|u| u.id.as_str()))
            .finish()
    }
}

/// Where the client reads and writes the current session.
///
/// Reads happen on every request; writes only on login, refresh and logout.
pub trait SessionStore: Send + Sync {
    /// Current session, if any.
    fn load(&self) -> Option<Session>;

    /// Replace the current session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the session cannot be persisted.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Forget the current session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the persisted copy cannot be removed.
    fn clear(&self) -> Result<(), SessionStoreError>;

    /// Bearer token of the current session.
    fn token(&self) -> Option<SecretString> {
        self.load().map(|session| session.token)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Session held for the lifetime of the process.
///
/// Used per request by the storefront server (seeded from the cookie) and by tests.
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a token and no user snapshot.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Some(Session::new(token, None))),
        }
    }
}

impl fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("session", &*self.session.read().unwrap_or_else(PoisonError::into_inner))
            .finish()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// File store
// =============================================================================

#[derive(Serialize, Deserialize, Default)]
struct PersistedFile {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Serialize, Deserialize, Default)]
struct PersistedState {
    token: Option<String>,
    user: Option<UserSnapshot>,
}

/// Session persisted as JSON on disk.
///
/// The file is re-read on every load so that a login from another shell is
/// picked up. Concurrent writers are not coordinated.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, file: &PersistedFile) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(file)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_slice::<PersistedFile>(&bytes) {
            Ok(file) => {
                let token = file.state.token.filter(|t| !t.is_empty())?;
                Some(Session::new(token, file.state.user))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.write(&PersistedFile {
            state: PersistedState {
                token: Some(session.token.expose_secret().to_string()),
                user: session.user.clone(),
            },
            version: 0,
        })
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.write(&PersistedFile::default())
    }
}
