//! JSON text codec for the persisted `ZapList` records.
//!
//! The key-value store only holds strings, so every record crosses the
//! storage boundary as JSON text. Tasks go through [`TaskRecord`], whose
//! timestamps are plain ISO-8601 strings, and are rebuilt into [`Task`]
//! values with parsed [`Timestamp`]s on the way back in.

use serde::{Deserialize, Serialize};

use crate::settings::AppSettings;
use crate::task::{Task, TaskId, Timestamp};

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON or does not have the expected shape.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// A timestamp field does not hold RFC 3339 text.
    #[error("invalid timestamp in `{field}` of task {task_id}: {value:?}")]
    InvalidTimestamp {
        /// Id of the task carrying the bad value.
        task_id: String,
        /// Field name as stored (`createdAt` or `updatedAt`).
        field: &'static str,
        /// The offending text.
        value: String,
        /// Underlying parse error.
        source: chrono::ParseError,
    },
    /// A coordinate is NaN or infinite and has no JSON representation.
    #[error("non-finite `{field}` in task {task_id}: {value}")]
    NonFiniteCoordinate {
        /// Id of the task carrying the bad value.
        task_id: String,
        /// Field name as stored (`latitude` or `longitude`).
        field: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// On-disk shape of a task.
///
/// Field names are camelCase. Optional attachments are omitted when unset,
/// and `description`/`completed` tolerate being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task id.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    #[serde(default)]
    pub description: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    /// Latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Creation time as ISO-8601 text.
    pub created_at: String,
    /// Last write time as ISO-8601 text.
    pub updated_at: String,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.as_str().to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            image_uri: task.image_uri.clone(),
            latitude: task.latitude,
            longitude: task.longitude,
            created_at: task.created_at.to_iso8601(),
            updated_at: task.updated_at.to_iso8601(),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = CodecError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&record.id, "createdAt", &record.created_at)?;
        let updated_at = parse_timestamp(&record.id, "updatedAt", &record.updated_at)?;
        Ok(Self {
            id: TaskId::new(record.id),
            title: record.title,
            description: record.description,
            completed: record.completed,
            image_uri: record.image_uri,
            latitude: record.latitude,
            longitude: record.longitude,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(
    task_id: &str,
    field: &'static str,
    value: &str,
) -> Result<Timestamp, CodecError> {
    Timestamp::parse_iso8601(value).map_err(|source| CodecError::InvalidTimestamp {
        task_id: task_id.to_string(),
        field,
        value: value.to_string(),
        source,
    })
}

fn check_finite(task: &Task, field: &'static str, value: Option<f64>) -> Result<(), CodecError> {
    match value {
        Some(value) if !value.is_finite() => Err(CodecError::NonFiniteCoordinate {
            task_id: task.id.to_string(),
            field,
            value,
        }),
        _ => Ok(()),
    }
}

/// Encodes a task collection as a JSON array.
///
/// # Errors
///
/// Returns `CodecError::NonFiniteCoordinate` if any task carries a NaN
/// or infinite coordinate, or `CodecError::Json` if serialization fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    for task in tasks {
        check_finite(task, "latitude", task.latitude)?;
        check_finite(task, "longitude", task.longitude)?;
    }
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Decodes a JSON array of task records, parsing timestamps.
///
/// # Errors
///
/// Returns `CodecError::Json` if the text is not a JSON array of task
/// records, or `CodecError::InvalidTimestamp` if a timestamp is not
/// RFC 3339 text.
pub fn decode_tasks(text: &str) -> Result<Vec<Task>, CodecError> {
    let records: Vec<TaskRecord> = serde_json::from_str(text)?;
    records.into_iter().map(Task::try_from).collect()
}

/// Encodes the settings record as a JSON object.
///
/// # Errors
///
/// Returns `CodecError::Json` if serialization fails.
pub fn encode_settings(settings: &AppSettings) -> Result<String, CodecError> {
    Ok(serde_json::to_string(settings)?)
}

/// Decodes a settings object, filling absent fields from the defaults.
///
/// # Errors
///
/// Returns `CodecError::Json` if the text is not a settings object or a
/// present field has the wrong type or an unknown theme.
pub fn decode_settings(text: &str) -> Result<AppSettings, CodecError> {
    Ok(serde_json::from_str(text)?)
}
