//! Plain-text rendering of tasks and settings for the CLI.

use std::fmt::Write as _;

use zaplist_proto::settings::{AppSettings, Theme};
use zaplist_proto::task::{Task, TaskCounts, TaskFilter, Timestamp};

/// Checkbox marker for a task's completion state.
const fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Formats a timestamp in UTC with a chrono format string.
///
/// Falls back to RFC 3339 text if `format` holds an invalid specifier.
#[must_use]
pub fn format_timestamp(stamp: Timestamp, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", stamp.as_datetime().format(format)).is_err() {
        tracing::debug!(format, "invalid timestamp format, using RFC 3339");
        return stamp.to_iso8601();
    }
    out
}

/// One line per task: checkbox, title, id.
#[must_use]
pub fn task_line(task: &Task) -> String {
    format!("{} {}  ({})", checkbox(task.completed), task.title, task.id)
}

/// The tab strip shown above a list: counts per filter, current one marked.
#[must_use]
pub fn counts_line(counts: TaskCounts, current: TaskFilter) -> String {
    [TaskFilter::All, TaskFilter::Active, TaskFilter::Completed]
        .into_iter()
        .map(|filter| {
            let label = format!("{filter} ({})", counts.for_filter(filter));
            if filter == current {
                format!("*{label}*")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Renders a list view, with a placeholder when it is empty.
#[must_use]
pub fn task_list(tasks: &[&Task], counts: TaskCounts, filter: TaskFilter) -> String {
    let mut out = counts_line(counts, filter);
    out.push('\n');
    if tasks.is_empty() {
        out.push_str(match filter {
            TaskFilter::All => "No tasks yet.",
            TaskFilter::Active => "No open tasks.",
            TaskFilter::Completed => "No completed tasks.",
        });
        out.push('\n');
        return out;
    }
    for task in tasks {
        out.push_str(&task_line(task));
        out.push('\n');
    }
    out
}

/// Full detail view of one task.
///
/// The location row only appears for a real coordinate; the `(0, 0)`
/// sentinel and a missing pair both render nothing.
#[must_use]
pub fn task_detail(task: &Task, timestamp_format: &str) -> String {
    let mut rows = vec![
        format!("{} {}", checkbox(task.completed), task.title),
        format!("id:       {}", task.id),
    ];
    if !task.description.is_empty() {
        rows.push(format!("notes:    {}", task.description));
    }
    if let Some(uri) = task.image() {
        rows.push(format!("image:    {uri}"));
    }
    if let Some(point) = task.location() {
        rows.push(format!(
            "location: {:.4}, {:.4}",
            point.latitude, point.longitude
        ));
    }
    rows.push(format!(
        "created:  {}",
        format_timestamp(task.created_at, timestamp_format)
    ));
    rows.push(format!(
        "updated:  {}",
        format_timestamp(task.updated_at, timestamp_format)
    ));

    let mut out = rows.join("\n");
    out.push('\n');
    out
}

/// Theme line: the preference, plus the effective appearance for `system`.
#[must_use]
pub fn theme_line(theme: Theme, system_prefers_dark: bool) -> String {
    let effective = if theme.is_dark(system_prefers_dark) {
        "dark"
    } else {
        "light"
    };
    match theme {
        Theme::System => format!("theme: system ({effective})"),
        Theme::Light | Theme::Dark => format!("theme: {theme}"),
    }
}

/// Renders the full settings record.
#[must_use]
pub fn settings(settings: &AppSettings, system_prefers_dark: bool) -> String {
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    format!(
        "{}\nnotifications: {}\nauto-save: {}\nlanguage: {}\n",
        theme_line(settings.theme, system_prefers_dark),
        on_off(settings.notifications),
        on_off(settings.auto_save),
        settings.language,
    )
}
