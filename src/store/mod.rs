//! Key-value persistence for client-side state.
//!
//! DESIGN
//! ======
//! `KvStore` is the only capability the persistence layer needs: read a
//! string by key, write a string by key. `PersistedStore` layers hydration
//! and debounced writes on top and never learns which medium backs it.
//!
//! ERROR HANDLING
//! ==============
//! Backends return typed `StoreError`s. `PersistedStore` logs them and
//! keeps working from memory; only an explicit `flush` surfaces them.

mod file;
mod memory;
mod persisted;

use async_trait::async_trait;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persisted::{DEFAULT_DEBOUNCE, PersistedStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage quota exceeded writing {key}: {size} bytes, limit {limit}")]
    QuotaExceeded { key: String, size: usize, limit: usize },
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("stored value codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Minimal durable key-value capability.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be read.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QuotaExceeded`] when the backend is full, or
    /// another [`StoreError`] if the medium rejects the write.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Reject keys that cannot be used as a single path component or map key.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.starts_with('.');
    if valid { Ok(()) } else { Err(StoreError::InvalidKey(key.to_owned())) }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
