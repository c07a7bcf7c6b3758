//! Credential stores.
//!
//! The key is read at request time, so a key saved while the CLI is running
//! is picked up by the next request without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clarify_config::CredentialSettings;
use clarify_protocols::{CredentialError, CredentialStore};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

fn non_empty(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Render a key for display without revealing it.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Key held in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: RwLock::new(non_empty(key)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn api_key(&self) -> Option<String> {
        self.key.read().clone()
    }

    fn set_api_key(&self, key: &str) -> Result<(), CredentialError> {
        let key = non_empty(key).ok_or_else(|| CredentialError::Invalid("key is empty".to_string()))?;
        *self.key.write() = Some(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.key.write() = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    api_key: String,
    saved_at: DateTime<Utc>,
}

/// Key persisted as JSON on disk.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current key was saved.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.load().map(|stored| stored.saved_at)
    }

    fn load(&self) -> Option<StoredCredential> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read credentials");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credentials file");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn api_key(&self) -> Option<String> {
        self.load().and_then(|stored| non_empty(&stored.api_key))
    }

    fn set_api_key(&self, key: &str) -> Result<(), CredentialError> {
        let api_key = non_empty(key).ok_or_else(|| CredentialError::Invalid("key is empty".to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CredentialError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let stored = StoredCredential {
            api_key,
            saved_at: Utc::now(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        info!(path = %self.path.display(), "API key saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "API key removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Key read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    var: String,
}

impl EnvCredentialStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialStore for EnvCredentialStore {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().as_deref().and_then(non_empty)
    }

    fn set_api_key(&self, _key: &str) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        Err(CredentialError::ReadOnly)
    }
}

/// Reads from `primary`, then `fallback`. Writes go to `primary`.
pub struct LayeredCredentialStore {
    primary: Arc<dyn CredentialStore>,
    fallback: Arc<dyn CredentialStore>,
}

impl LayeredCredentialStore {
    pub fn new(primary: Arc<dyn CredentialStore>, fallback: Arc<dyn CredentialStore>) -> Self {
        Self { primary, fallback }
    }

    /// File store at the configured path backed by the configured variable.
    pub fn from_settings(settings: &CredentialSettings) -> Self {
        debug!(path = %settings.path.display(), env = %settings.env_var, "Using credential stores");
        Self::new(
            Arc::new(FileCredentialStore::new(&settings.path)),
            Arc::new(EnvCredentialStore::new(&settings.env_var)),
        )
    }
}

impl CredentialStore for LayeredCredentialStore {
    fn api_key(&self) -> Option<String> {
        self.primary.api_key().or_else(|| self.fallback.api_key())
    }

    fn set_api_key(&self, key: &str) -> Result<(), CredentialError> {
        self.primary.set_api_key(key)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.primary.clear()
    }
}
