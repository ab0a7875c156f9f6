//! Integration tests for the task store over an in-memory backend.
//!
//! Covers the create/read round-trip, id uniqueness, idempotent deletes,
//! filtered views, and memory/storage consistency when writes fail.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::redundant_clone)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use zaplist::storage::{KeyValueStore, MemoryStore, StorageError, TASKS_KEY};
use zaplist::tasks::{StoreState, TaskStorageService, TaskStore};
use zaplist_proto::task::{GeoPoint, TaskDraft, TaskFilter, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Backend whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::io(
                "set",
                key,
                std::io::Error::other("disk full"),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key).await
    }
}

async fn ready_store<K: KeyValueStore>(kv: K) -> TaskStore<K> {
    let mut store = TaskStore::new(TaskStorageService::new(kv));
    store.initialize().await;
    assert_eq!(store.state(), StoreState::Ready);
    store
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_reload_reads_same_task() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = ready_store(Arc::clone(&kv)).await;

    let created = store
        .create(TaskDraft::new("Buy milk").with_description("2 liters"))
        .await
        .unwrap();
    assert!(!created.completed);
    assert_eq!(created.created_at, created.updated_at);

    let tasks = TaskStorageService::new(Arc::clone(&kv)).read_all().await.unwrap();
    assert_eq!(tasks, vec![created.clone()]);

    let reloaded = ready_store(kv).await;
    assert_eq!(reloaded.get_by_id(&created.id), Some(&created));
}

#[tokio::test]
async fn empty_strings_and_sentinel_survive_round_trip() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = ready_store(Arc::clone(&kv)).await;

    let mut draft = TaskDraft::new("Blank fields").with_image("");
    draft.latitude = Some(0.0);
    draft.longitude = Some(0.0);
    let created = store.create(draft).await.unwrap();

    let reloaded = ready_store(kv).await;
    let task = reloaded.get_by_id(&created.id).unwrap();
    assert_eq!(task.description, "");
    assert_eq!(task.image_uri.as_deref(), Some(""));
    assert_eq!(task.latitude, Some(0.0));
    assert_eq!(task.longitude, Some(0.0));
    assert!(task.location().is_none());
    assert!(task.image().is_none());
}

#[tokio::test]
async fn ids_are_unique_across_many_creates() {
    let mut store = ready_store(MemoryStore::new()).await;
    for i in 0..50 {
        store.create(TaskDraft::new(format!("Task {i}"))).await.unwrap();
    }
    let mut ids: Vec<_> = store.tasks().iter().map(|t| t.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = ready_store(Arc::clone(&kv)).await;
    let keep = store.create(TaskDraft::new("Keep")).await.unwrap();
    let gone = store.create(TaskDraft::new("Gone")).await.unwrap();

    store.delete(&gone.id).await.unwrap();
    let after_first = kv.raw(TASKS_KEY).unwrap();
    store.delete(&gone.id).await.unwrap();
    store.delete(&TaskId::new("never-existed")).await.unwrap();

    assert_eq!(kv.raw(TASKS_KEY).unwrap(), after_first);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, keep.id);
}

#[tokio::test]
async fn filtered_views_partition_the_list() {
    let mut store = ready_store(MemoryStore::new()).await;
    let mut ids = Vec::new();
    for title in ["One", "Two", "Three", "Four"] {
        ids.push(store.create(TaskDraft::new(title)).await.unwrap().id);
    }
    store.toggle_complete(&ids[1]).await.unwrap();
    store.toggle_complete(&ids[3]).await.unwrap();

    let active: Vec<_> = store.filtered_view(TaskFilter::Active).iter().map(|t| t.title.clone()).collect();
    let done: Vec<_> = store.filtered_view(TaskFilter::Completed).iter().map(|t| t.title.clone()).collect();
    assert_eq!(active, ["One", "Three"]);
    assert_eq!(done, ["Two", "Four"]);
    assert_eq!(store.filtered_view(TaskFilter::All).len(), 4);

    let counts = store.counts();
    assert_eq!(counts.active + counts.completed, counts.total);
}

#[tokio::test]
async fn toggle_moves_updated_at_forward() {
    let mut store = ready_store(MemoryStore::new()).await;
    let created = store.create(TaskDraft::new("Stretch")).await.unwrap();
    let toggled = store.toggle_complete(&created.id).await.unwrap().unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at >= created.updated_at);
    assert_eq!(toggled.created_at, created.created_at);
}

#[tokio::test]
async fn failed_writes_leave_memory_matching_storage() {
    let kv = Arc::new(FlakyStore::default());
    let mut store = ready_store(Arc::clone(&kv)).await;
    let task = store
        .create(TaskDraft::new("Stable").with_location(GeoPoint::new(1.0, 2.0)))
        .await
        .unwrap();

    kv.set_failing(true);
    assert!(store.create(TaskDraft::new("Lost")).await.is_err());
    assert!(store.toggle_complete(&task.id).await.is_err());
    assert!(store.delete(&task.id).await.is_err());
    assert!(store.clear_all().await.is_err());
    kv.set_failing(false);

    let persisted = TaskStorageService::new(Arc::clone(&kv)).read_all().await.unwrap();
    assert_eq!(store.tasks(), persisted.as_slice());
    assert_eq!(persisted.len(), 1);
    assert!(!persisted[0].completed);
}

#[tokio::test]
async fn corrupted_blob_starts_empty() {
    let kv = MemoryStore::with_entries([(TASKS_KEY, "not json")]);
    let store = ready_store(kv).await;
    assert!(store.tasks().is_empty());
}
