//! `KeyValueStore` trait: the single async interface for client persistence.
//!
//! Values are opaque strings. Callers that persist structured data serialize
//! it to JSON first so a corrupt entry can be detected and dropped on read.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Fixed keys used for persisted client state.
pub mod storage_keys {
    /// Session credential (`{access_token, token_type}`).
    pub const SESSION: &str = "user";
    /// Last roadmap payload returned by the backend.
    pub const CAREER_PATH: &str = "careerPath";
}

/// Backend-agnostic key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` if the key was never written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (overwrite) a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Serialize `value` as JSON and store it under `key`.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &json).await
}

/// Load and deserialize the JSON value under `key`.
///
/// A value that fails to parse is reported as `StorageError::Serialization`;
/// callers decide whether that means "absent".
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::store::MemoryStore;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn json_helpers_roundtrip() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "stage".to_string(),
            count: 5,
        };
        save_json(&store, "sample", &sample).await.unwrap();
        let loaded: Option<Sample> = load_json(&store, "sample").await.unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[tokio::test]
    async fn load_json_absent_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Sample> = load_json(&store, "missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn load_json_corrupt_is_serialization_error() {
        let store = MemoryStore::new();
        store.set("sample", "{not json").await.unwrap();
        let result: Result<Option<Sample>, _> = load_json(&store, "sample").await;
        assert!(matches!(
            result,
            Err(StorageError::Serialization { ref key, .. }) if key == "sample"
        ));
    }
}
