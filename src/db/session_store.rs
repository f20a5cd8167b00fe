// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable storage for the console session.
//!
//! One session per client context, stored as pretty JSON. Writes go to a
//! sibling temp file that is renamed over the target.

use crate::error::AppError;
use crate::models::Session;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<Option<String>>>),
}

/// Session persistence (file on disk, or in memory for tests).
#[derive(Clone)]
pub struct SessionStore {
    backend: Backend,
}

impl SessionStore {
    /// Store backed by a JSON file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
        }
    }

    /// Create an in-memory store (offline testing).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(None))),
        }
    }

    /// In-memory store pre-seeded with raw contents, which need not be valid.
    pub fn new_mock_with(raw: impl Into<String>) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(Some(raw.into())))),
        }
    }

    /// Raw stored contents, if any. Test helper.
    pub async fn raw(&self) -> Result<Option<String>, AppError> {
        match &self.backend {
            Backend::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(s) => Ok(Some(s)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(storage_err(path, e)),
            },
            Backend::Memory(slot) => Ok(lock(slot)?.clone()),
        }
    }

    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when nothing is stored and `Err` when the stored
    /// data can't be read or parsed.
    pub async fn load(&self) -> Result<Option<Session>, AppError> {
        let Some(raw) = self.raw().await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("Corrupt session data: {}", e)))
    }

    /// Persist the session, replacing any previous one.
    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Storage(format!("Failed to encode session: {}", e)))?;

        match &self.backend {
            Backend::File(path) => write_atomic(path, json.as_bytes()).await,
            Backend::Memory(slot) => {
                *lock(slot)? = Some(json);
                Ok(())
            }
        }
    }

    /// Remove the persisted session. Missing data is not an error.
    pub async fn clear(&self) -> Result<(), AppError> {
        match &self.backend {
            Backend::File(path) => match tokio::fs::remove_file(path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_err(path, e)),
            },
            Backend::Memory(slot) => {
                *lock(slot)? = None;
                Ok(())
            }
        }
    }
}

fn lock(slot: &Mutex<Option<String>>) -> Result<std::sync::MutexGuard<'_, Option<String>>, AppError> {
    slot.lock()
        .map_err(|_| AppError::Storage("Session store lock poisoned".to_string()))
}

fn storage_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::Storage(format!("{}: {}", path.display(), e))
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| storage_err(dir, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| storage_err(&tmp, e))?;

    // Owner read/write only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| storage_err(&tmp, e))?;
    }

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| storage_err(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocatedDistrict, Role};

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            role: Role::DistrictAdmin,
            unique_id: "DA-9".into(),
            allocated_district: Some(AllocatedDistrict::One("Chamoli".into())),
            profile: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        SessionStore::file(&path).save(&session()).await.unwrap();
        let loaded = SessionStore::file(&path).load().await.unwrap();
        assert_eq!(loaded, Some(session()));

        SessionStore::file(&path).clear().await.unwrap();
        assert!(!path.exists());
        // Clearing twice is fine
        SessionStore::file(&path).clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_data_is_an_error() {
        let store = SessionStore::new_mock_with("{not json");
        assert!(matches!(store.load().await, Err(AppError::Storage(_))));
    }
}
