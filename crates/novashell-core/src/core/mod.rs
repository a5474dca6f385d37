//! Core logic of the virtual file store.
//!
//! This module provides:
//! - [`path`] resolution and path helpers
//! - [`FileTree`] mutation rules
//! - [`TrashBin`] with the single-slot timed undo
//! - [`PersistenceController`] routing snapshots between the two tiers
//! - [`Vfs`], the facade apps call into

pub mod error;
mod filesystem;
pub mod path;
mod persistence;
mod trash;
mod undo;
mod vfs;

pub use filesystem::{DirEntry, FileTree, unique_name};
pub use persistence::{LoadSource, PersistenceController};
pub use trash::{PendingUndo, PendingUndoView, TrashBin};
pub use undo::{Clock, ManualClock, ManualTimer, ManualTimerState, SystemClock, UndoTimer, UndoToken};
pub use vfs::{Host, Restored, Vfs};
