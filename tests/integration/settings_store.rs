//! Integration tests for settings persistence and the theme controller.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use zaplist::settings::{SettingsStorageService, ThemeController};
use zaplist::storage::{MemoryStore, SETTINGS_KEY};
use zaplist_proto::settings::{AppSettings, SettingsPatch, Theme};

#[tokio::test]
async fn fresh_install_reads_defaults() {
    let service = SettingsStorageService::new(MemoryStore::new());
    let settings = service.get_settings().await.unwrap();
    assert_eq!(
        settings,
        AppSettings {
            theme: Theme::System,
            notifications: true,
            auto_save: true,
            language: "pt-BR".to_string(),
        }
    );
}

#[tokio::test]
async fn theme_change_keeps_other_preferences() {
    let kv = Arc::new(MemoryStore::new());
    let service = SettingsStorageService::new(Arc::clone(&kv));
    service
        .save_settings(SettingsPatch {
            auto_save: Some(false),
            ..SettingsPatch::default()
        })
        .await
        .unwrap();

    let mut controller = ThemeController::new(SettingsStorageService::new(Arc::clone(&kv)));
    controller.load().await;
    controller.set_theme(Theme::Dark).await.unwrap();

    let settings = service.get_settings().await.unwrap();
    assert_eq!(settings.theme, Theme::Dark);
    assert!(!settings.auto_save);
    assert!(settings.notifications);
}

#[tokio::test]
async fn toggle_from_system_goes_light() {
    let kv = MemoryStore::with_entries([(SETTINGS_KEY, r#"{"theme":"system","language":"en"}"#)]);
    let mut controller = ThemeController::new(SettingsStorageService::new(kv));
    controller.load().await;
    assert!(controller.is_dark(true));
    assert_eq!(controller.toggle().await.unwrap(), Theme::Light);
    assert!(!controller.is_dark(true));
}
