//! The authenticated session: the bearer token, where it is kept between runs, and
//! its init/teardown lifecycle.

use std::sync::{
    Arc,
    Mutex,
    RwLock,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use crate::{
    core::MindmateError,
    persistence::DataDir,
};

const SESSION_FILE: &str = "session.json";

pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, MindmateError>;
    fn store(&self, token: &str) -> Result<(), MindmateError>;
    fn clear(&self) -> Result<(), MindmateError>;
}

#[derive(Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
}

/// Keeps the token under the `token` key of `session.json` in the data directory.
pub struct FileTokenStorage {
    data_dir: DataDir,
}

impl FileTokenStorage {
    pub fn new(data_dir: DataDir) -> Self {
        Self { data_dir }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, MindmateError> {
        let stored: StoredSession = self.data_dir.load_json(SESSION_FILE)?;
        Ok(stored.token.filter(|t| !t.trim().is_empty()))
    }

    fn store(&self, token: &str) -> Result<(), MindmateError> {
        self.data_dir.save_json(&StoredSession { token: Some(token.to_string()) }, SESSION_FILE)
    }

    fn clear(&self) -> Result<(), MindmateError> {
        self.data_dir.delete(SESSION_FILE)
    }
}

#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, MindmateError> {
        Ok(self.token.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn store(&self, token: &str) -> Result<(), MindmateError> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), MindmateError> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

/// Shared handle to the current session. Cloning is cheap; every clone sees the same token.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    storage: Arc<dyn TokenStorage>,
}

impl Session {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { token: Arc::new(RwLock::new(None)), storage }
    }

    /// Restores a stored token, if any. Returns whether a session is now active.
    pub fn init(&self) -> bool {
        let restored = match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored session: {}", e);
                None
            }
        };

        let authenticated = restored.is_some();
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = restored;
        if authenticated {
            info!("Restored stored session");
        }
        authenticated
    }

    /// Activates a freshly issued token and persists it.
    pub fn establish(&self, token: impl Into<String>) -> Result<(), MindmateError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(MindmateError::MissingToken);
        }

        *self.token.write().unwrap_or_else(|p| p.into_inner()) = Some(token.clone());
        self.storage.store(&token)?;
        info!("Session established");
        Ok(())
    }

    /// Forgets the token in memory and in storage.
    pub fn teardown(&self) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = None;
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
        info!("Session torn down");
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {}", token))
    }
}
