//! Integration tests for the file-backed key-value store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use zaplist::settings::SettingsStorageService;
use zaplist::storage::{FileStore, KeyValueStore, TASKS_KEY};
use zaplist::tasks::{TaskStorageService, TaskStore};
use zaplist_proto::settings::Theme;
use zaplist_proto::task::TaskDraft;

fn make_store() -> (tempfile::TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("data"));
    (dir, store)
}

#[tokio::test]
async fn missing_key_reads_none() {
    let (_dir, store) = make_store();
    assert_eq!(store.get("absent").await.unwrap(), None);
    store.remove("absent").await.unwrap();
}

#[tokio::test]
async fn set_get_remove() {
    let (_dir, store) = make_store();
    store.set(TASKS_KEY, "[]".to_string()).await.unwrap();
    assert_eq!(store.get(TASKS_KEY).await.unwrap().as_deref(), Some("[]"));

    store.set(TASKS_KEY, "[1]".to_string()).await.unwrap();
    assert_eq!(store.get(TASKS_KEY).await.unwrap().as_deref(), Some("[1]"));

    store.remove(TASKS_KEY).await.unwrap();
    assert_eq!(store.get(TASKS_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn writes_leave_no_temp_files() {
    let (_dir, store) = make_store();
    store.set(TASKS_KEY, "[]".to_string()).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["%40ZapList%3Atasks.json"]);
}

#[tokio::test]
async fn tasks_and_settings_persist_across_sessions() {
    let (dir, store) = make_store();
    let kv = Arc::new(store);

    let mut tasks = TaskStore::new(TaskStorageService::new(Arc::clone(&kv)));
    tasks.initialize().await;
    let created = tasks.create(TaskDraft::new("Water plants")).await.unwrap();
    SettingsStorageService::new(Arc::clone(&kv))
        .save_theme(Theme::Dark)
        .await
        .unwrap();
    drop(tasks);
    drop(kv);

    let kv = Arc::new(FileStore::new(dir.path().join("data")));
    let mut reopened = TaskStore::new(TaskStorageService::new(Arc::clone(&kv)));
    reopened.initialize().await;
    assert_eq!(reopened.get_by_id(&created.id), Some(&created));

    let settings = SettingsStorageService::new(kv).get_settings().await.unwrap();
    assert_eq!(settings.theme, Theme::Dark);
}
