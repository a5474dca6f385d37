//! # novashell-core
//!
//! The virtual file store behind the NovaShell desktop: a folder/file tree,
//! a trash ledger with a single timed undo, recursive size accounting, and
//! routing of snapshots between an ephemeral and a durable storage tier.
//!
//! The desktop apps (editor, explorer, terminal, trash, settings) are thin
//! views; they call [`Vfs`] and render what comes back.
//!
//! ```rust
//! use novashell_core::{Host, ManualClock, ManualTimer, MemoryStorage, NodeKind, Vfs};
//!
//! let mut vfs = Vfs::open(Host {
//!     ephemeral: Box::new(MemoryStorage::new("ephemeral")),
//!     durable: Box::new(MemoryStorage::new("durable")),
//!     timer: Box::new(ManualTimer::new()),
//!     clock: Box::new(ManualClock::new(0)),
//! });
//!
//! vfs.create_entry("/home", "todo.txt", NodeKind::File)?;
//! vfs.write_file_content("/home/todo.txt", "buy milk")?;
//! vfs.delete_entry("/home", "todo.txt")?;
//! let restored = vfs.undo()?;
//! assert_eq!(restored.path, "/home/todo.txt");
//! # Ok::<(), novashell_core::VfsError>(())
//! ```
//!
//! ## Threading
//!
//! Single-threaded. Every operation runs to completion; the only deferred
//! work is the undo countdown, which the host schedules through
//! [`UndoTimer`] and reports back with [`Vfs::expire_undo`].

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::error::{StorageError, VfsError};
pub use crate::core::{
    Clock, DirEntry, Host, LoadSource, ManualClock, ManualTimer, PendingUndoView, Restored,
    SystemClock, UndoTimer, UndoToken, Vfs,
};
pub use models::{Node, NodeKind, Settings, TrashEntry, TrashSummary};
pub use utils::format::format_human_size;
pub use utils::storage::{KeyValueStore, MemoryStorage};
