//! App settings persistence.
//!
//! The settings record lives under [`SETTINGS_KEY`](crate::storage::SETTINGS_KEY)
//! and is updated by merge: load, overlay the changed fields, write back.
//! [`ThemeController`] is the appearance consumer of that record.

pub mod service;
pub mod theme;

pub use service::SettingsStorageService;
pub use theme::ThemeController;
