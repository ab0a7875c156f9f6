//! Device-local key-value storage.
//!
//! Defines the [`KeyValueStore`] primitive the persistence services are
//! built on: string keys, string values, async `get`/`set`/`remove`.
//! Each domain (tasks, settings) lives under one fixed, namespaced key.
//!
//! Implementations:
//! - [`MemoryStore`]: process-local map, used in tests and for throwaway
//!   sessions
//! - [`FileStore`]: one file per key under a data directory

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::sync::Arc;

use zaplist_proto::codec::CodecError;

/// Storage key holding the JSON array of tasks.
pub const TASKS_KEY: &str = "@ZapList:tasks";

/// Storage key holding the JSON settings object.
pub const SETTINGS_KEY: &str = "@ZapList:settings";

/// Errors raised by storage backends and the services built on them.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The stored payload is not valid JSON or has the wrong shape.
    #[error("corrupted payload under {key}: {source}")]
    Corruption {
        /// Key whose value failed to decode.
        key: String,
        /// Underlying codec error.
        source: CodecError,
    },

    /// A value could not be encoded for storage; nothing was written.
    #[error("cannot encode value for {key}: {source}")]
    Encode {
        /// Key the value was meant for.
        key: String,
        /// Underlying codec error.
        source: CodecError,
    },

    /// The underlying key-value primitive rejected a call.
    #[error("storage {op} failed for {key}: {source}")]
    Io {
        /// Which primitive failed (`get`, `set`, or `remove`).
        op: &'static str,
        /// Key the call addressed.
        key: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl StorageError {
    /// Builds an [`StorageError::Io`] for a failed primitive call.
    #[must_use]
    pub fn io(op: &'static str, key: &str, source: std::io::Error) -> Self {
        Self::Io {
            op,
            key: key.to_string(),
            source,
        }
    }

    /// Builds a [`StorageError::Corruption`] for a payload under `key`.
    #[must_use]
    pub fn corruption(key: &str, source: CodecError) -> Self {
        Self::Corruption {
            key: key.to_string(),
            source,
        }
    }

    /// Builds a [`StorageError::Encode`] for a value rejected before writing.
    #[must_use]
    pub fn encode(key: &str, source: CodecError) -> Self {
        Self::Encode {
            key: key.to_string(),
            source,
        }
    }

    /// Whether this error means the stored data is unreadable.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}

/// A string-keyed, string-valued durable store.
///
/// Writes replace the whole value under a key; there is no partial update.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes the value under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<K: KeyValueStore> KeyValueStore for Arc<K> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }
}
