//! Theme state backed by the settings record.

use zaplist_proto::settings::Theme;

use super::service::SettingsStorageService;
use crate::storage::{KeyValueStore, StorageError};

/// Holds the current theme and persists changes to it.
#[derive(Debug)]
pub struct ThemeController<K> {
    service: SettingsStorageService<K>,
    theme: Theme,
    loading: bool,
}

impl<K: KeyValueStore> ThemeController<K> {
    /// Creates a controller showing the default theme until [`load`](Self::load).
    #[must_use]
    pub fn new(service: SettingsStorageService<K>) -> Self {
        Self {
            service,
            theme: Theme::default(),
            loading: true,
        }
    }

    /// Loads the saved theme. Failures are logged and keep the default.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.service.get_settings().await {
            Ok(settings) => self.theme = settings.theme,
            Err(e) => tracing::error!(error = %e, "failed to load saved theme, using default"),
        }
        self.loading = false;
    }

    /// Whether the saved theme is still being loaded.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current theme preference.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the effective appearance is dark.
    #[must_use]
    pub const fn is_dark(&self, system_prefers_dark: bool) -> bool {
        self.theme.is_dark(system_prefers_dark)
    }

    /// Persists `theme`, then makes it current.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from the save; the current theme is
    /// unchanged.
    pub async fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.service.save_theme(theme).await?;
        self.theme = theme;
        Ok(())
    }

    /// Switches between light and dark, returning the new theme.
    ///
    /// # Errors
    ///
    /// Same as [`set_theme`](Self::set_theme).
    pub async fn toggle(&mut self) -> Result<Theme, StorageError> {
        let next = self.theme.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}
