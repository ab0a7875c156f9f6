//! File-backed implementation of [`KeyValueStore`].
//!
//! Each key maps to one file under the data directory. Key characters
//! outside `[A-Za-z0-9._-]` are percent-escaped, so `@ZapList:tasks` is
//! stored as `%40ZapList%3Atasks.json`.
//!
//! Writes go to a temporary sibling file first and are renamed over the
//! target, so a reader sees either the old value or the new one.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Extension appended to every escaped key.
const VALUE_EXTENSION: &str = "json";

/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{VALUE_EXTENSION}", escape_key(key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!(".{}.{VALUE_EXTENSION}.tmp", escape_key(key)))
    }
}

/// Escapes a key into a portable file name.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io("get", key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::io("set", key, e))?;

        let tmp = self.temp_path_for(key);
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::io("set", key, e))?;

        if let Err(e) = tokio::fs::rename(&tmp, self.path_for(key)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io("set", key, e));
        }
        tracing::trace!(key, path = %self.path_for(key).display(), "value written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("remove", key, e)),
        }
    }
}
