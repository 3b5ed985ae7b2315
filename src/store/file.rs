//! File-backed store: one JSON document per key under a data directory.
//!
//! Layout:
//! - `<data_dir>/user.json`
//! - `<data_dir>/careerPath.json`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::traits::KeyValueStore;
use crate::error::StorageError;

/// Durable store rooted at a directory on disk.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`. The directory is created lazily.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to its file path. Keys are restricted to a flat,
    /// filename-safe alphabet so they cannot escape the base directory.
    fn resolve_key(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.resolve_key(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.resolve_key(key)?;
        fs::create_dir_all(&self.base_path).await?;

        // Write-then-rename so a crash never leaves a half-written entry.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(key, path = %path.display(), "Persisted client state");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve_key(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("state"));
        (store, dir)
    }

    #[tokio::test]
    async fn read_write_roundtrip() {
        let (store, _dir) = test_store();
        store.set("user", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            store.get("user").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[tokio::test]
    async fn read_nonexistent_returns_none() {
        let (store, _dir) = test_store();
        assert!(store.get("careerPath").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_creates_base_dir_and_leaves_no_temp_file() {
        let (store, _dir) = test_store();
        store.set("careerPath", "{}").await.unwrap();
        assert!(store.base_path().join("careerPath.json").exists());
        assert!(!store.base_path().join("careerPath.json.tmp").exists());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let (store, _dir) = test_store();
        store.set("user", "first").await.unwrap();
        store.set("user", "second").await.unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (store, _dir) = test_store();
        store.set("user", "x").await.unwrap();
        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert!(store.get("user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_like_keys_rejected() {
        let (store, _dir) = test_store();
        for key in ["../escape", "a/b", "", "dot.key"] {
            assert!(
                matches!(store.set(key, "x").await, Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
