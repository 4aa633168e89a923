//! Persisted value holder — hydrate once, write back debounced.
//!
//! DESIGN
//! ======
//! The in-memory value is the source of truth and changes synchronously on
//! every `set`/`update`. Each change (re)arms a single timer; only the value
//! present when the timer fires without being re-armed reaches the backend.
//! Intermediate values may never be stored, an accepted lossy compaction.
//!
//! ERROR HANDLING
//! ==============
//! Hydration and background write failures are logged and swallowed: the
//! holder degrades to memory-only operation instead of failing the caller.
//! Dropping the holder cancels a pending write.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{KvStore, StoreError};

/// Quiet period before a changed value is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

pub struct PersistedStore<T> {
    key: String,
    value: T,
    hydrated: bool,
    /// `None` when no durable storage is available; the holder is memory-only.
    backend: Option<Arc<dyn KvStore>>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a holder for `key` starting at `initial`.
    ///
    /// With a backend the holder is not hydrated until [`Self::hydrate`]
    /// completes. Without one it is hydrated immediately.
    #[must_use]
    pub fn new(key: impl Into<String>, initial: T, backend: Option<Arc<dyn KvStore>>) -> Self {
        Self {
            key: key.into(),
            value: initial,
            hydrated: backend.is_none(),
            backend,
            debounce: DEFAULT_DEBOUNCE,
            pending: None,
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Load the stored value, if any, into memory. Runs at most once.
    ///
    /// A missing key keeps the current value. Read or decode failures are
    /// logged and also keep the current value.
    pub async fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        let Some(backend) = self.backend.clone() else {
            self.hydrated = true;
            return;
        };

        match backend.read(&self.key).await {
            Ok(Some(raw)) if raw.is_empty() => debug!(key = %self.key, "no stored value"),
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(key = %self.key, "hydrated stored value");
                    self.value = value;
                }
                Err(e) => error!(key = %self.key, error = %e, "failed to decode stored value; using initial value"),
            },
            Ok(None) => debug!(key = %self.key, "no stored value"),
            Err(e) => error!(key = %self.key, error = %e, "failed to read stored value; using initial value"),
        }

        self.hydrated = true;
    }

    /// Replace the value and schedule a debounced write.
    pub fn set(&mut self, next: T) {
        self.value = next;
        self.schedule_write();
    }

    /// Derive the next value from the current one and schedule a debounced write.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Cancel the pending timer and write the current value now.
    ///
    /// # Errors
    ///
    /// Returns the encode or backend error. Unlike debounced writes, a
    /// flush reports its failure to the caller.
    pub async fn flush(&mut self) -> Result<(), StoreError> {
        self.cancel_pending();
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let raw = serde_json::to_string(&self.value)?;
        backend.write(&self.key, &raw).await
    }

    fn schedule_write(&mut self) {
        self.cancel_pending();
        let Some(backend) = self.backend.clone() else {
            return;
        };

        // Snapshot now: the timer writes this value, not whatever comes later.
        let raw = match serde_json::to_string(&self.value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to encode value; skipping write");
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(key = %self.key, "no async runtime; value kept in memory only");
            return;
        };

        let key = self.key.clone();
        let debounce = self.debounce;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            write_logged(backend.as_ref(), &key, &raw).await;
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for PersistedStore<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

async fn write_logged(backend: &dyn KvStore, key: &str, raw: &str) {
    match backend.write(key, raw).await {
        Ok(()) => debug!(key, bytes = raw.len(), "persisted value"),
        Err(e) => {
            error!(key, error = %e, "failed to persist value");
            if matches!(e, StoreError::QuotaExceeded { .. }) {
                warn!(key, "storage quota exceeded; value kept in memory only");
            }
        }
    }
}

#[cfg(test)]
#[path = "persisted_test.rs"]
mod tests;
