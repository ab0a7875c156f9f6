//! Data model and storage codec for `ZapList`.

pub mod codec;
pub mod settings;
pub mod task;
