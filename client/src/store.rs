//! Credential storage.
//!
//! # Design
//! The token lives in a single named slot behind the [`TokenStore`]
//! capability, so the session layer can run against an in-memory store in
//! tests and a file-backed one in a real process. Tokens are opaque
//! strings; there is no client-side validation or expiry. Store writes
//! never fail upward: the slot is last-writer-wins, and a caller has no
//! recovery for a failed write beyond logging in again, so failures are
//! logged and absorbed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

/// Fixed name of the persisted token slot.
pub const TOKEN_FILE_NAME: &str = "access_token";

/// Get/set/clear over the single persisted credential slot.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // last-writer-wins tolerates a poisoned lock
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) {
        *self.slot() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

/// File-backed store: the token is the contents of one fixed-name file
/// under `dir`, surviving process restarts. A missing file reads as an
/// empty slot.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut path = dir.into();
        path.push(TOKEN_FILE_NAME);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(token) if token.is_empty() => None,
            Ok(token) => Some(token),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "failed to read token slot");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), err = %e, "failed to create token directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            warn!(path = %self.path.display(), err = %e, "failed to persist token");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "failed to clear token slot");
            }
        }
    }
}
