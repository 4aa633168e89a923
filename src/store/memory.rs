//! In-process key-value backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::{KvStore, StoreError, validate_key};

/// Shared in-memory map. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
    /// Maximum stored bytes across all keys, `None` for unbounded.
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once total stored bytes would exceed `quota`.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self { quota: Some(quota), ..Self::default() }
    }

    /// Seed a value directly, bypassing quota and the write counter.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Current raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of successful writes since creation.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let size = others + key.len() + value.len();
            if size > limit {
                return Err(StoreError::QuotaExceeded { key: key.to_owned(), size, limit });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
