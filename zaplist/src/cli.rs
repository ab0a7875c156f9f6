//! Command execution for the `zaplist` binary.
//!
//! [`Session`] wires a [`TaskStore`] and the settings services to one
//! key-value backend and runs a single [`Command`] against them, returning
//! the text to print.

use zaplist_proto::settings::SettingsPatch;
use zaplist_proto::task::{GeoPoint, Task, TaskDraft, TaskFilter, TaskId};

use crate::config::{AppConfig, Command, ThemeRequest};
use crate::render;
use crate::settings::{SettingsStorageService, ThemeController};
use crate::storage::{KeyValueStore, StorageError};
use crate::tasks::{TaskError, TaskStorageService, TaskStore, validate_title};

/// Errors a command can end with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The task input was rejected.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The arguments do not describe a valid request.
    #[error("{0}")]
    Usage(String),
}

/// Field changes requested by `edit`. `None` keeps the current value.
#[derive(Debug)]
struct TaskEdit {
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    clear_image: bool,
    location: Option<GeoPoint>,
    clear_location: bool,
}

/// One CLI invocation's view of tasks and settings.
#[derive(Debug)]
pub struct Session<K> {
    tasks: TaskStore<K>,
    settings: SettingsStorageService<K>,
    theme: ThemeController<K>,
    config: AppConfig,
}

impl<K: KeyValueStore + Clone> Session<K> {
    /// Builds a session over `kv` and loads tasks and theme from it.
    pub async fn open(kv: K, config: AppConfig) -> Self {
        let mut tasks = TaskStore::new(TaskStorageService::new(kv.clone()));
        let settings = SettingsStorageService::new(kv);
        let mut theme = ThemeController::new(settings.clone());
        tasks.initialize().await;
        theme.load().await;
        Self {
            tasks,
            settings,
            theme,
            config,
        }
    }

    /// The task store backing this session.
    #[must_use]
    pub const fn tasks(&self) -> &TaskStore<K> {
        &self.tasks
    }

    /// Runs `command`, returning what should be printed.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] when input is invalid, a referenced task does
    /// not exist, or storage fails.
    pub async fn execute(&mut self, command: Command) -> Result<String, CliError> {
        match command {
            Command::List { filter } => Ok(self.list(filter)),
            Command::Add {
                title,
                description,
                image,
                lat,
                lon,
            } => {
                let mut draft = TaskDraft::new(validate_title(&title)?).with_description(description);
                if let Some(uri) = image {
                    draft = draft.with_image(uri);
                }
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    draft = draft.with_location(GeoPoint::new(lat, lon));
                }
                self.add(draft).await
            }
            Command::Show { id } => self.show(&id),
            Command::Edit {
                id,
                title,
                description,
                image,
                clear_image,
                lat,
                lon,
                clear_location,
            } => {
                let edit = TaskEdit {
                    title,
                    description,
                    image,
                    clear_image,
                    location: lat.zip(lon).map(|(lat, lon)| GeoPoint::new(lat, lon)),
                    clear_location,
                };
                self.edit(&id, edit).await
            }
            Command::Toggle { id } => self.toggle(TaskId::new(id)).await,
            Command::Delete { id } => self.delete(&id).await,
            Command::Clear { yes, settings } => self.clear(yes, settings).await,
            Command::Theme { value } => self.apply_theme(value.as_deref()).await,
            Command::Settings {
                notifications,
                auto_save,
                language,
            } => {
                self.apply_settings(SettingsPatch {
                    theme: None,
                    notifications,
                    auto_save,
                    language,
                })
                .await
            }
        }
    }

    fn list(&self, filter: Option<TaskFilter>) -> String {
        let filter = filter.unwrap_or(self.config.default_filter);
        render::task_list(
            &self.tasks.filtered_view(filter),
            self.tasks.counts(),
            filter,
        )
    }

    async fn add(&mut self, draft: TaskDraft) -> Result<String, CliError> {
        let task = self.tasks.create(draft).await?;
        Ok(format!("created {}\n", render::task_line(&task)))
    }

    fn show(&self, id: &str) -> Result<String, CliError> {
        let task = self.find(id)?;
        Ok(render::task_detail(task, &self.config.timestamp_format))
    }

    async fn edit(&mut self, id: &str, edit: TaskEdit) -> Result<String, CliError> {
        let mut task = self.find(id)?.clone();
        if let Some(title) = edit.title {
            task.title = validate_title(&title)?.to_string();
        }
        if let Some(description) = edit.description {
            task.description = description;
        }
        if edit.clear_image {
            task.image_uri = None;
        } else if edit.image.is_some() {
            task.image_uri = edit.image;
        }
        if edit.clear_location {
            task.set_location(None);
        } else if edit.location.is_some() {
            task.set_location(edit.location);
        }
        let task = self.tasks.update(task).await?;
        Ok(format!("updated {}\n", render::task_line(&task)))
    }

    async fn toggle(&mut self, id: TaskId) -> Result<String, CliError> {
        let task = self
            .tasks
            .toggle_complete(&id)
            .await?
            .ok_or_else(|| TaskError::TaskNotFound(id.into_string()))?;
        Ok(format!("{}\n", render::task_line(&task)))
    }

    async fn delete(&mut self, id: &str) -> Result<String, CliError> {
        let id = self.find(id)?.id.clone();
        self.tasks.delete(&id).await?;
        Ok(format!("deleted {id}\n"))
    }

    async fn clear(&mut self, confirmed: bool, with_settings: bool) -> Result<String, CliError> {
        if !confirmed {
            return Err(CliError::Usage(
                "refusing to clear without --yes".to_string(),
            ));
        }
        self.tasks.clear_all().await?;
        if with_settings {
            self.settings.clear().await?;
            return Ok("cleared all tasks and settings\n".to_string());
        }
        Ok("cleared all tasks\n".to_string())
    }

    async fn apply_theme(&mut self, value: Option<&str>) -> Result<String, CliError> {
        if let Some(value) = value {
            match value.parse::<ThemeRequest>().map_err(CliError::Usage)? {
                ThemeRequest::Toggle => {
                    self.theme.toggle().await?;
                }
                ThemeRequest::Set(theme) => self.theme.set_theme(theme).await?,
            }
        }
        Ok(format!(
            "{}\n",
            render::theme_line(self.theme.theme(), self.config.system_prefers_dark)
        ))
    }

    async fn apply_settings(&self, patch: SettingsPatch) -> Result<String, CliError> {
        let current = if patch.is_empty() {
            self.settings.get_settings().await?
        } else {
            self.settings.save_settings(patch).await?
        };
        Ok(render::settings(&current, self.config.system_prefers_dark))
    }

    fn find(&self, id: &str) -> Result<&Task, TaskError> {
        self.tasks
            .get_by_id(&TaskId::new(id))
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
    }
}
