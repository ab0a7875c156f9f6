//! Task model for `ZapList`.
//!
//! Defines the task record held in memory, the draft used to create one,
//! and the filters and counters derived from a task collection. These types
//! carry no serde derives; the on-disk shape lives in [`crate::codec`] so
//! that timestamps always cross the storage boundary through an explicit
//! encode/decode step.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use uuid::Uuid;

/// Minimum title length accepted by the task forms, in characters.
pub const MIN_TASK_TITLE_LENGTH: usize = 3;

/// Unique identifier for a task.
///
/// Fresh ids are UUID v7 strings, so they sort by creation time. Ids read
/// back from storage are accepted verbatim, whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// UTC instant with sub-second precision.
///
/// Stored as ISO-8601 / RFC 3339 text; see [`Timestamp::to_iso8601`] and
/// [`Timestamp::parse_iso8601`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from milliseconds since the UNIX epoch.
    ///
    /// Out-of-range values clamp to the epoch.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
    }

    /// Returns the timestamp as milliseconds since the UNIX epoch.
    #[must_use]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying `chrono` value.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Formats the timestamp as RFC 3339 text with a `Z` suffix.
    ///
    /// Sub-second digits are kept so that two writes inside the same
    /// millisecond still compare in order after a round trip.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Parses RFC 3339 text (any offset) into a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns the `chrono` parse error if `text` is not valid RFC 3339.
    pub fn parse_iso8601(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// A geographic coordinate attached to a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether this is the `(0, 0)` "no location" sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique, immutable identifier.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Free text, may be empty.
    pub description: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Opaque reference to an externally managed image.
    pub image_uri: Option<String>,
    /// Latitude of the attached location, if any.
    pub latitude: Option<f64>,
    /// Longitude of the attached location, if any.
    pub longitude: Option<f64>,
    /// Set once when the task is created.
    pub created_at: Timestamp,
    /// Refreshed on every successful write.
    pub updated_at: Timestamp,
}

impl Task {
    /// Builds a new task from a draft, with both timestamps set to `now`.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            image_uri: draft.image_uri,
            latitude: draft.latitude,
            longitude: draft.longitude,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the attached location, or `None` if absent or the sentinel.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        let point = GeoPoint::new(self.latitude?, self.longitude?);
        (!point.is_sentinel()).then_some(point)
    }

    /// Returns the image reference, treating an empty string as no image.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image_uri.as_deref().filter(|uri| !uri.is_empty())
    }

    /// Sets or clears the location. `None` stores the sentinel pair.
    pub fn set_location(&mut self, point: Option<GeoPoint>) {
        let point = point.unwrap_or(GeoPoint::new(0.0, 0.0));
        self.latitude = Some(point.latitude);
        self.longitude = Some(point.longitude);
    }
}

/// The caller-supplied part of a new task.
///
/// Excludes `id`, `created_at`, and `updated_at`, which the store assigns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Initial completion flag.
    pub completed: bool,
    /// Optional image reference.
    pub image_uri: Option<String>,
    /// Optional latitude.
    pub latitude: Option<f64>,
    /// Optional longitude.
    pub longitude: Option<f64>,
}

impl TaskDraft {
    /// Creates an open draft with the given title and nothing else.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, point: GeoPoint) -> Self {
        self.latitude = Some(point.latitude);
        self.longitude = Some(point.longitude);
        self
    }
}

/// Which subset of tasks a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl TaskFilter {
    /// Whether `task` belongs in this view.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Error returned when a filter name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task filter `{0}` (expected all, active, or completed)")]
pub struct ParseFilterError(String);

impl std::str::FromStr for TaskFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Per-filter task counts, as shown on list view tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    /// Number of tasks in total.
    pub total: usize,
    /// Number of open tasks.
    pub active: usize,
    /// Number of completed tasks.
    pub completed: usize,
}

impl TaskCounts {
    /// Counts a collection of tasks.
    #[must_use]
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            if task.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            counts
        })
    }

    /// Returns the count for a given filter.
    #[must_use]
    pub const fn for_filter(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.total,
            TaskFilter::Active => self.active,
            TaskFilter::Completed => self.completed,
        }
    }
}
