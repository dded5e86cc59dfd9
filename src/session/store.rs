use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout of `session.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    access_token: String,
    refresh_token: String,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    session: Option<Session>,
    path: Option<PathBuf>,
}

/// Shared holder of the current session.
///
/// Clones share the same state, so a write through one handle is visible to
/// every other handle immediately. A store opened on a file also mirrors each
/// write to disk so the next CLI invocation starts logged in.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Inner>>,
}

impl TokenStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading a session persisted earlier
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let session = load_session(&path)?;
        if session.is_some() {
            tracing::debug!(path = %path.display(), "loaded persisted session");
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                session,
                path: Some(path),
            })),
        })
    }

    pub fn get(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    /// Replace the stored session.
    ///
    /// The in-memory value is updated before the file is written, so readers
    /// see the new session even when persisting fails.
    pub fn set(&self, session: Session) -> Result<(), StoreError> {
        let path = {
            let mut inner = self.write();
            inner.session = Some(session.clone());
            inner.path.clone()
        };

        if let Some(path) = path {
            save_session(&path, &session)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let path = {
            let mut inner = self.write();
            inner.session = None;
            inner.path.clone()
        };

        if let Some(path) = path {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.read().path.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load_session(path: &Path) -> Result<Option<Session>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let persisted: PersistedSession = serde_json::from_str(&content)?;
    Ok(Some(Session::new(persisted.access_token, persisted.refresh_token)))
}

fn save_session(path: &Path, session: &Session) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let persisted = PersistedSession {
        access_token: session.access.clone(),
        refresh_token: session.refresh.clone(),
        saved_at: Utc::now(),
    };
    let content = serde_json::to_string_pretty(&persisted)?;
    fs::write(path, content)?;
    Ok(())
}
