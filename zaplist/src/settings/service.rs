//! Durable storage of the settings record.

use zaplist_proto::codec::{decode_settings, encode_settings};
use zaplist_proto::settings::{AppSettings, SettingsPatch, Theme};

use crate::storage::{KeyValueStore, SETTINGS_KEY, StorageError};

/// Persistence service for [`AppSettings`], over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SettingsStorageService<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> SettingsStorageService<K> {
    /// Creates a service storing settings under [`SETTINGS_KEY`].
    #[must_use]
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            key: SETTINGS_KEY.to_string(),
        }
    }

    /// Loads the settings, filling absent fields from the defaults.
    ///
    /// Returns the exact default record when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the read fails, or
    /// [`StorageError::Corruption`] if the payload cannot be decoded.
    pub async fn get_settings(&self) -> Result<AppSettings, StorageError> {
        let Some(text) = self.kv.get(&self.key).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to read settings");
        })?
        else {
            return Ok(AppSettings::default());
        };
        decode_settings(&text).map_err(|source| {
            tracing::warn!(key = %self.key, error = %source, "stored settings are corrupted");
            StorageError::corruption(&self.key, source)
        })
    }

    /// Merges `patch` over the current settings and stores the result.
    ///
    /// Returns the merged record as stored.
    ///
    /// # Errors
    ///
    /// Returns any error from [`get_settings`](Self::get_settings) or from
    /// writing the merged record.
    pub async fn save_settings(&self, patch: SettingsPatch) -> Result<AppSettings, StorageError> {
        let merged = self.get_settings().await?.merged(patch);
        let text =
            encode_settings(&merged).map_err(|source| StorageError::encode(&self.key, source))?;
        self.kv.set(&self.key, text).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to save settings");
        })?;
        tracing::debug!(key = %self.key, theme = %merged.theme, "settings saved");
        Ok(merged)
    }

    /// Stores a new theme, leaving every other field as it is.
    ///
    /// # Errors
    ///
    /// Same as [`save_settings`](Self::save_settings).
    pub async fn save_theme(&self, theme: Theme) -> Result<AppSettings, StorageError> {
        self.save_settings(SettingsPatch::theme(theme)).await
    }

    /// Removes the stored settings, reverting to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the underlying remove fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(&self.key).await.inspect_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to clear settings");
        })?;
        tracing::info!(key = %self.key, "settings cleared");
        Ok(())
    }
}
