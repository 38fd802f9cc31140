// src/storage.rs

use crate::error::AppError;
use crate::models::questionnaire::FormAnswers;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Client-side state that survives restarts, mirroring what the browser
/// build kept in localStorage. The identity itself is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub bearer_token: Option<String>,
    pub guest_token: Option<String>,
    #[serde(default)]
    pub form_answers: FormAnswers,
    #[serde(default)]
    pub current_step: usize,
}

/// Durable key-value state backed by a single JSON file.
///
/// Every mutation rewrites the whole file atomically (temp file + rename),
/// so a crash mid-write never leaves a half-written state behind.
pub struct LocalStore {
    path: PathBuf,
    state: RwLock<PersistedState>,
}

impl LocalStore {
    /// Opens (or creates) the state file under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let path = dir.join("state.json");

        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable state file: {}", e);
                PersistedState::default()
            }),
            Err(_) => PersistedState::default(),
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn snapshot(&self) -> PersistedState {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Applies `mutate` to the in-memory state and flushes it to disk.
    pub fn update<F>(&self, mutate: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let snapshot = {
            let mut state = self.state.write().expect("state lock poisoned");
            mutate(&mut state);
            state.clone()
        };
        self.flush(&snapshot)
    }

    fn flush(&self, state: &PersistedState) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(state)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.state
            .read()
            .expect("state lock poisoned")
            .bearer_token
            .clone()
    }

    pub fn guest_token(&self) -> Option<String> {
        self.state
            .read()
            .expect("state lock poisoned")
            .guest_token
            .clone()
    }
}

/// In-memory bearer credential shared by the API client and the session
/// store, persisted through the `LocalStore`.
pub struct CredentialCache {
    token: RwLock<Option<String>>,
    local: Arc<LocalStore>,
}

impl CredentialCache {
    /// Seeds the cache from the persisted state.
    pub fn new(local: Arc<LocalStore>) -> Self {
        let token = local.bearer_token();
        Self {
            token: RwLock::new(token),
            local,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().expect("credential lock poisoned").clone()
    }

    /// Stores a fresh bearer credential and persists it.
    pub fn set(&self, token: String) {
        *self.token.write().expect("credential lock poisoned") = Some(token.clone());
        if let Err(e) = self
            .local
            .update(|state| state.bearer_token = Some(token))
        {
            tracing::warn!("Failed to persist bearer credential: {}", e);
        }
    }

    /// Clears the credential both in memory and on disk.
    /// Invoked on sign-out and on any 401 from the backend.
    pub fn clear(&self) {
        *self.token.write().expect("credential lock poisoned") = None;
        if let Err(e) = self.local.update(|state| state.bearer_token = None) {
            tracing::warn!("Failed to clear persisted bearer credential: {}", e);
        }
    }
}
