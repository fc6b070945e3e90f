//! Persistent storage for the single session token

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Key/value accessor for the one bearer token a profile may hold.
///
/// No validation or expiry checks happen here; the server decides whether
/// a token is still good.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> ClientResult<Option<String>>;
    fn set(&self, token: &str) -> ClientResult<()>;
    fn delete(&self) -> ClientResult<()>;
}

/// On-disk layout of the session file
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Token kept in a TOML file, re-read on every `get` so writes made by
/// another process are picked up. Concurrent writers race; the last write wins.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> ClientResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let stored: StoredToken = toml::from_str(&content)
            .map_err(|e| ClientError::storage(format!("Invalid session file: {}", e)))?;

        // An empty token is the same as no token
        Ok(Some(stored.token).filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&StoredToken {
            token: token.to_string(),
        })
        .map_err(|e| ClientError::storage(format!("Failed to serialize token: {}", e)))?;

        fs::write(&self.path, content)?;
        debug!("Stored session token at {}", self.path.display());
        Ok(())
    }

    fn delete(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> ClientResult<Option<String>> {
        let token = self
            .token
            .read()
            .map_err(|_| ClientError::storage("token lock poisoned"))?;
        Ok(token.clone())
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::storage("token lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> ClientResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::storage("token lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.toml"));

        assert_eq!(store.get().unwrap(), None);

        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap(), Some("abc".to_string()));

        store.set("def").unwrap();
        assert_eq!(store.get().unwrap(), Some("def".to_string()));

        store.delete().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Deleting twice is fine
        store.delete().unwrap();
    }

    #[test]
    fn test_file_store_sees_other_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        let first = FileTokenStore::new(&path);
        let second = FileTokenStore::new(&path);

        first.set("from-first").unwrap();
        second.set("from-second").unwrap();

        assert_eq!(first.get().unwrap(), Some("from-second".to_string()));
    }

    #[test]
    fn test_file_store_empty_and_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        let store = FileTokenStore::new(&path);

        fs::write(&path, "").unwrap();
        assert_eq!(store.get().unwrap(), None);

        fs::write(&path, "token = \"\"\n").unwrap();
        assert_eq!(store.get().unwrap(), None);

        fs::write(&path, "token = ").unwrap();
        assert!(matches!(store.get(), Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("t-1");
        assert_eq!(store.get().unwrap(), Some("t-1".to_string()));
        store.delete().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.set("t-2").unwrap();
        assert_eq!(store.get().unwrap(), Some("t-2".to_string()));
    }
}
