//! File-backed key/value store - Implements KeyValueStorePort on the local disk
//!
//! Each key is one `<key>.json` file under the data directory. Writes go to
//! a temporary sibling first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::KeyValueStorePort;
use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

/// Errors from the file store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keys become file names, so only a safe subset is accepted
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Key/value store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path)(e).into()),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(Self::io_error(&self.dir))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await.map_err(Self::io_error(&tmp))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(Self::io_error(&path))?;

        debug!(path = %path.display(), "Stored value");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), ApplicationError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path)(e).into()),
        }
    }
}
