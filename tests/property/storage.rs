//! Property-based tests for the task persistence service.
//!
//! Uses proptest to verify, over an in-memory backend:
//! 1. Any task written with `write_task` reads back from `read_all` with
//!    every field unchanged except `updated_at`, which never moves back.
//! 2. A task with a NaN or infinite coordinate is refused and the stored
//!    collection is left exactly as it was.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use proptest::prelude::*;
use zaplist::storage::{MemoryStore, StorageError, TASKS_KEY};
use zaplist::tasks::TaskStorageService;
use zaplist_proto::task::{Task, TaskId, Timestamp};

// --- Strategies ---

/// Strategy for task ids, drawn from a small pool so rewrites happen.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    prop_oneof![
        "[a-d]".prop_map(TaskId::new),
        "[0-9]{13}".prop_map(TaskId::new),
    ]
}

/// Strategy for past timestamps, so a fresh stamp is never earlier.
fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0_i64..1_700_000_000_000).prop_map(Timestamp::from_millis)
}

/// Strategy for a coordinate, including the sentinel and non-finite values.
fn arb_coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -180.0_f64..180.0,
        2 => Just(0.0),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

/// Strategy for arbitrary tasks.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        arb_task_id(),
        ".{0,32}",
        ".{0,64}",
        any::<bool>(),
        proptest::option::of(".{0,16}"),
        proptest::option::of(arb_coordinate()),
        proptest::option::of(arb_coordinate()),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(
            |(id, title, description, completed, image_uri, latitude, longitude, created_at, updated_at)| {
                Task {
                    id,
                    title,
                    description,
                    completed,
                    image_uri,
                    latitude,
                    longitude,
                    created_at,
                    updated_at,
                }
            },
        )
}

fn is_encodable(task: &Task) -> bool {
    [task.latitude, task.longitude]
        .into_iter()
        .flatten()
        .all(f64::is_finite)
}

/// Writes each task in turn, checking the stored collection after every
/// write against a model of what should be there.
async fn check_writes(tasks: Vec<Task>) -> Result<(), TestCaseError> {
    let kv = Arc::new(MemoryStore::new());
    let service = TaskStorageService::new(Arc::clone(&kv));
    let mut model: Vec<Task> = Vec::new();

    for task in tasks {
        let before = kv.raw(TASKS_KEY);
        match service.write_task(task.clone()).await {
            Ok(stored) => {
                prop_assert!(is_encodable(&task));
                prop_assert!(stored.updated_at >= task.updated_at);
                prop_assert!(stored.updated_at >= stored.created_at);
                let mut expected = task;
                expected.updated_at = stored.updated_at;
                prop_assert_eq!(&stored, &expected);

                if let Some(slot) = model.iter_mut().find(|t| t.id == stored.id) {
                    *slot = stored;
                } else {
                    model.push(stored);
                }
            }
            Err(err) => {
                prop_assert!(!is_encodable(&task));
                let is_encode_err = matches!(err, StorageError::Encode { .. });
                prop_assert!(is_encode_err);
                prop_assert_eq!(kv.raw(TASKS_KEY), before);
            }
        }
        prop_assert_eq!(service.read_all().await.unwrap(), model.clone());
    }
    Ok(())
}

// --- Properties ---

proptest! {
    #[test]
    fn write_then_read_all_preserves_tasks(tasks in proptest::collection::vec(arb_task(), 1..8)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime.block_on(check_writes(tasks))?;
    }
}
