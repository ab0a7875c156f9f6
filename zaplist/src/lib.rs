//! `ZapList`: task persistence and state sync for a personal to-do list.

pub mod cli;
pub mod config;
pub mod render;
pub mod settings;
pub mod storage;
pub mod tasks;
