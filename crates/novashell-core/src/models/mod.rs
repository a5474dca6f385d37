//! Data models for the virtual file store.
//!
//! Contains domain types for:
//! - [`Node`], [`NodeKind`], [`TreeSnapshot`] - The file tree and its stored form
//! - [`TrashEntry`], [`TrashLedger`], [`TrashSummary`] - Soft-deleted items
//! - [`Settings`] - Persistence switches shared with the settings app

mod filesystem;
mod settings;
mod trash;

pub use filesystem::{Node, NodeKind, TreeSnapshot};
pub use settings::Settings;
pub use trash::{TrashEntry, TrashLedger, TrashSummary};
