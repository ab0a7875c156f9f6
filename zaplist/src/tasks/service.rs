//! Durable storage of the task collection.
//!
//! Every write is a read-modify-write over the whole collection: the blob
//! is loaded, changed in memory, and written back as one value. Two
//! writers interleaving on the same key resolve as last-write-wins.

use zaplist_proto::codec::{decode_tasks, encode_tasks};
use zaplist_proto::task::{Task, TaskId, Timestamp};

use crate::storage::{KeyValueStore, StorageError, TASKS_KEY};

/// Persistence service for tasks, over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct TaskStorageService<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> TaskStorageService<K> {
    /// Creates a service storing tasks under [`TASKS_KEY`].
    #[must_use]
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, TASKS_KEY)
    }

    /// Creates a service storing tasks under a custom key.
    #[must_use]
    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// The storage key this service reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads every stored task.
    ///
    /// An absent key is the first-run state and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the read fails, or
    /// [`StorageError::Corruption`] if the payload cannot be decoded.
    pub async fn read_all(&self) -> Result<Vec<Task>, StorageError> {
        let Some(text) = self.kv.get(&self.key).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to read tasks");
        })?
        else {
            return Ok(Vec::new());
        };

        decode_tasks(&text).map_err(|source| {
            tracing::warn!(key = %self.key, error = %source, "stored tasks are corrupted");
            StorageError::corruption(&self.key, source)
        })
    }

    /// Inserts or replaces `task` by id, stamping `updated_at` with the
    /// current time. Returns the task as stored.
    ///
    /// # Errors
    ///
    /// Returns any error from [`read_all`](Self::read_all),
    /// [`StorageError::Encode`] if the task has a NaN or infinite
    /// coordinate, or the error from writing the collection back.
    pub async fn write_task(&self, task: Task) -> Result<Task, StorageError> {
        self.write_task_at(task, Timestamp::now()).await
    }

    /// Like [`write_task`](Self::write_task), with an explicit stamp.
    ///
    /// The stamp is clamped so `updated_at` never precedes `created_at`.
    ///
    /// # Errors
    ///
    /// Same as [`write_task`](Self::write_task).
    pub async fn write_task_at(
        &self,
        mut task: Task,
        stamp: Timestamp,
    ) -> Result<Task, StorageError> {
        let mut tasks = self.read_all().await?;
        task.updated_at = stamp.max(task.created_at);

        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task.clone();
        } else {
            tasks.push(task.clone());
        }

        self.store(&tasks).await?;
        tracing::debug!(key = %self.key, task_id = %task.id, total = tasks.len(), "task written");
        Ok(task)
    }

    /// Removes the task with `id`. A missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns any error from [`read_all`](Self::read_all) or from writing
    /// the remaining collection back.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), StorageError> {
        let mut tasks = self.read_all().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != *id);

        if tasks.len() == before {
            tracing::debug!(key = %self.key, task_id = %id, "delete of unknown task ignored");
            return Ok(());
        }

        self.store(&tasks).await?;
        tracing::debug!(key = %self.key, task_id = %id, total = tasks.len(), "task deleted");
        Ok(())
    }

    /// Removes the entire stored collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the underlying remove fails.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.kv.remove(&self.key).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to clear tasks");
        })?;
        tracing::info!(key = %self.key, "all tasks cleared");
        Ok(())
    }

    async fn store(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let text = encode_tasks(tasks).map_err(|source| StorageError::encode(&self.key, source))?;
        self.kv.set(&self.key, text).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to write tasks");
        })
    }
}
