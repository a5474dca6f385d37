//! Utility modules shared by the core.
//!
//! Provides:
//! - [`format`] - Human-readable sizes, dates and countdowns
//! - [`id`] - Trash entry ids
//! - [`storage`] - [`KeyValueStore`], [`MemoryStorage`] and JSON helpers

pub mod format;
pub mod id;
pub mod storage;

pub use storage::{KeyValueStore, MemoryStorage};
