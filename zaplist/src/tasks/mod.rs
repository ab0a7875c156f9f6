//! Task persistence and in-memory state.
//!
//! [`TaskStorageService`] keeps the whole task collection as one JSON blob
//! under [`TASKS_KEY`](crate::storage::TASKS_KEY). [`TaskStore`] owns the
//! session's in-memory copy and writes every mutation through the service
//! before applying it to memory.

pub mod service;
pub mod store;

pub use service::TaskStorageService;
pub use store::{StoreState, TaskStore};

use thiserror::Error;
use zaplist_proto::task::MIN_TASK_TITLE_LENGTH;

/// Errors raised by task forms before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title is shorter than the minimum.
    #[error("task title must be at least {MIN_TASK_TITLE_LENGTH} characters")]
    TitleTooShort,
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

/// Validates a title as the task forms do, returning it trimmed.
///
/// # Errors
///
/// Returns [`TaskError::TitleEmpty`] for a blank title, or
/// [`TaskError::TitleTooShort`] if it has fewer than
/// [`MIN_TASK_TITLE_LENGTH`] characters after trimming.
pub fn validate_title(title: &str) -> Result<&str, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::TitleEmpty);
    }
    if title.chars().count() < MIN_TASK_TITLE_LENGTH {
        return Err(TaskError::TitleTooShort);
    }
    Ok(title)
}
