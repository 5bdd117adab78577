use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable per-user key-value preferences.
///
/// Keys are used verbatim; callers own any namespacing.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_preference(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_preference(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove_preference(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    preferences: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            preferences: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored keys. Handy for asserting write counts in tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.preferences.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryRepository {
    async fn get_preference(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_preference(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_preference(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub preferences: Arc<dyn PreferenceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let preferences: Arc<dyn PreferenceRepository> = Arc::new(InMemoryRepository::new());
        Self { preferences }
    }
}
