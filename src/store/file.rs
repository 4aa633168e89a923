//! Directory-backed key-value backend.
//!
//! DESIGN
//! ======
//! Each key maps to `<root>/<key>.json`. Writes land in a sibling temp
//! file first and are renamed into place, so a reader never observes a
//! half-written value. The optional quota bounds the size of a single
//! value, mirroring the capacity limit of browser storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use super::{KvStore, StoreError, validate_key};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), quota: None }
    }

    #[must_use]
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded { key: key.to_owned(), size: value.len(), limit });
            }
        }

        tokio::fs::create_dir_all(&self.root).await?;
        // Unique per write so an overlapping write never renames another's bytes.
        let tmp = path.with_extension(format!("json.{:016x}.tmp", rand::rng().random::<u64>()));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(key, bytes = value.len(), path = %path.display(), "stored value written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
