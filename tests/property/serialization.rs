//! Property-based serialization tests for the storage codec.
//!
//! Uses proptest to verify:
//! 1. Any task list survives encode → decode unchanged, including empty
//!    strings and the `(0, 0)` location pair.
//! 2. Arbitrary text never causes a panic in `decode_tasks` or
//!    `decode_settings` (returns `Err` gracefully).
//! 3. Any settings record survives encode → decode unchanged.
//! 4. A task list holding a NaN or infinite coordinate is refused by
//!    `encode_tasks` rather than written lossily.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use zaplist_proto::codec::{
    CodecError, decode_settings, decode_tasks, encode_settings, encode_tasks,
};
use zaplist_proto::settings::{AppSettings, Theme};
use zaplist_proto::task::{Task, TaskId, Timestamp};

// --- Strategies ---

/// Strategy for task ids: generated v7 ids and legacy free-form ones.
fn arb_task_id() -> impl Strategy<Value = TaskId> {
    prop_oneof![
        Just(()).prop_map(|()| TaskId::generate()),
        "[0-9a-z]{1,16}".prop_map(TaskId::new),
    ]
}

/// Strategy for timestamps between 1970 and 2100.
fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0_i64..4_102_444_800_000).prop_map(Timestamp::from_millis)
}

/// Strategy for a coordinate, with zero well represented.
fn arb_coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), -90.0_f64..90.0]
}

/// Strategy for a coordinate that JSON cannot represent.
fn arb_non_finite() -> impl Strategy<Value = f64> {
    prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
}

/// Strategy for arbitrary tasks.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        arb_task_id(),
        ".{0,64}",
        ".{0,128}",
        any::<bool>(),
        proptest::option::of(".{0,32}"),
        proptest::option::of((arb_coordinate(), arb_coordinate())),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(
            |(id, title, description, completed, image_uri, location, created_at, updated_at)| {
                Task {
                    id,
                    title,
                    description,
                    completed,
                    image_uri,
                    latitude: location.map(|(lat, _)| lat),
                    longitude: location.map(|(_, lon)| lon),
                    created_at,
                    updated_at,
                }
            },
        )
}

/// Strategy for arbitrary settings records.
fn arb_settings() -> impl Strategy<Value = AppSettings> {
    (
        prop_oneof![Just(Theme::Light), Just(Theme::Dark), Just(Theme::System)],
        any::<bool>(),
        any::<bool>(),
        "[a-zA-Z-]{0,8}",
    )
        .prop_map(|(theme, notifications, auto_save, language)| AppSettings {
            theme,
            notifications,
            auto_save,
            language,
        })
}

// --- Properties ---

proptest! {
    #[test]
    fn task_list_round_trip(tasks in proptest::collection::vec(arb_task(), 0..8)) {
        let text = encode_tasks(&tasks).unwrap();
        let decoded = decode_tasks(&text).unwrap();
        prop_assert_eq!(decoded, tasks);
    }

    #[test]
    fn non_finite_coordinate_is_refused(
        mut tasks in proptest::collection::vec(arb_task(), 0..4),
        mut bad in arb_task(),
        value in arb_non_finite(),
        on_latitude in any::<bool>(),
    ) {
        if on_latitude {
            bad.latitude = Some(value);
        } else {
            bad.longitude = Some(value);
        }
        tasks.push(bad);
        let refused = matches!(
            encode_tasks(&tasks),
            Err(CodecError::NonFiniteCoordinate { .. })
        );
        prop_assert!(refused);
    }

    #[test]
    fn settings_round_trip(settings in arb_settings()) {
        let text = encode_settings(&settings).unwrap();
        prop_assert_eq!(decode_settings(&text).unwrap(), settings);
    }

    #[test]
    fn decode_never_panics(text in ".{0,256}") {
        let _ = decode_tasks(&text);
        let _ = decode_settings(&text);
    }

    #[test]
    fn decode_json_like_never_panics(text in r#"[\[\]{}",:0-9a-zA-Z ]{0,128}"#) {
        let _ = decode_tasks(&text);
        let _ = decode_settings(&text);
    }
}
