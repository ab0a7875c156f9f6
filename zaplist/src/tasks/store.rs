//! In-memory task collection kept consistent with durable storage.
//!
//! `TaskStore` is the session's single source of truth for tasks. It is an
//! explicitly owned value: whoever needs it gets it passed in, and every
//! mutation takes `&mut self`, so there is exactly one writer.
//!
//! Mutations are write-through. The new value is written to the
//! [`TaskStorageService`] first; memory changes only after that succeeds,
//! so a failed write leaves the in-memory collection exactly as it was.

use zaplist_proto::task::{Task, TaskCounts, TaskDraft, TaskFilter, TaskId, Timestamp};

use super::service::TaskStorageService;
use crate::storage::{KeyValueStore, StorageError};

/// Lifecycle of a [`TaskStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Constructed, [`TaskStore::initialize`] not yet called.
    Uninitialized,
    /// The initial bulk load is in flight.
    Loading,
    /// Loaded; mutations are immediately visible to reads.
    Ready,
}

/// Owns the session's task list and mirrors every change to storage.
#[derive(Debug)]
pub struct TaskStore<K> {
    service: TaskStorageService<K>,
    /// Insertion-ordered tasks.
    tasks: Vec<Task>,
    state: StoreState,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Creates an uninitialized store over `service`.
    #[must_use]
    pub const fn new(service: TaskStorageService<K>) -> Self {
        Self {
            service,
            tasks: Vec::new(),
            state: StoreState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> StoreState {
        self.state
    }

    /// Whether the initial load is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    /// All tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The underlying persistence service.
    #[must_use]
    pub const fn service(&self) -> &TaskStorageService<K> {
        &self.service
    }

    /// Loads the stored collection into memory.
    ///
    /// A read failure is logged and leaves the store empty but usable;
    /// it is never returned to the caller.
    pub async fn initialize(&mut self) {
        self.state = StoreState::Loading;
        self.tasks = match self.service.read_all().await {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "tasks loaded");
                tasks
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load tasks, starting with an empty list");
                Vec::new()
            }
        };
        self.state = StoreState::Ready;
    }

    /// Creates a task from `draft` with a fresh id and timestamps.
    ///
    /// The task is appended to memory only after it has been stored.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the write; memory is unchanged.
    pub async fn create(&mut self, draft: TaskDraft) -> Result<Task, StorageError> {
        self.check_ready("create");
        let now = Timestamp::now();
        let task = Task::from_draft(TaskId::generate(), draft, now);

        let stored = self
            .service
            .write_task_at(task, now)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to create task"))?;

        tracing::info!(task_id = %stored.id, "task created");
        self.tasks.push(stored.clone());
        Ok(stored)
    }

    /// Replaces a task with the complete desired state in `task`.
    ///
    /// If no task with that id is in memory, the task is appended, matching
    /// what storage does with it.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the write; memory is unchanged.
    pub async fn update(&mut self, task: Task) -> Result<Task, StorageError> {
        self.check_ready("update");
        let stored = self
            .service
            .write_task(task)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to update task"))?;

        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == stored.id) {
            existing.clone_from(&stored);
        } else {
            tracing::warn!(task_id = %stored.id, "updated a task that was not in memory, appending it");
            self.tasks.push(stored.clone());
        }
        tracing::debug!(task_id = %stored.id, "task updated");
        Ok(stored)
    }

    /// Deletes the task with `id`. A missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the write; memory is unchanged.
    pub async fn delete(&mut self, id: &TaskId) -> Result<(), StorageError> {
        self.check_ready("delete");
        self.service
            .delete_task(id)
            .await
            .inspect_err(|e| tracing::error!(task_id = %id, error = %e, "failed to delete task"))?;

        self.tasks.retain(|t| t.id != *id);
        tracing::debug!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// The lookup is memory-only: if the task is not in memory nothing is
    /// written and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the write; memory is unchanged.
    pub async fn toggle_complete(&mut self, id: &TaskId) -> Result<Option<Task>, StorageError> {
        let Some(task) = self.get_by_id(id) else {
            tracing::debug!(task_id = %id, "toggle of unknown task ignored");
            return Ok(None);
        };
        let mut task = task.clone();
        task.completed = !task.completed;
        self.update(task).await.map(Some)
    }

    /// Wipes every stored task, then the in-memory list.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the remove; memory is unchanged.
    pub async fn clear_all(&mut self) -> Result<(), StorageError> {
        self.service.clear_all().await?;
        self.tasks.clear();
        Ok(())
    }

    /// Looks up a task in memory.
    #[must_use]
    pub fn get_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    /// Tasks matching `filter`, in insertion order.
    #[must_use]
    pub fn filtered_view(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Per-filter counts over the in-memory list.
    #[must_use]
    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(&self.tasks)
    }

    fn check_ready(&self, op: &'static str) {
        if self.state != StoreState::Ready {
            tracing::warn!(op, state = ?self.state, "task store mutated before initialization finished");
        }
    }
}
