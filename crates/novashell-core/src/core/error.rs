//! Error types for the virtual file store.
//!
//! - [`VfsError`] - Recoverable failures of tree, trash and undo operations
//! - [`StorageError`] - Key/value tier failures, logged by the persistence controller

use thiserror::Error;

/// Failure of a file store operation.
///
/// Every variant is a local, recoverable condition. [`VfsError::NothingToUndo`]
/// in particular is an ordinary outcome of pressing undo late.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// Path does not resolve to a node.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// A path component that must be a folder is a file.
    #[error("not a folder: {path}")]
    NotAFolder { path: String },

    /// Expected a file but found a folder.
    #[error("not a file: {path}")]
    NotAFile { path: String },

    /// A sibling with this name already exists.
    #[error("name already exists: {name} in {parent}")]
    NameConflict { parent: String, name: String },

    /// Create targeted a parent that is missing or not a folder.
    #[error("parent folder not found: {path}")]
    ParentNotFound { path: String },

    /// Name is empty or contains `/`.
    #[error("invalid name: {name:?}")]
    InvalidName { name: String },

    /// The root folder has no parent.
    #[error("the root folder has no parent")]
    RootHasNoParent,

    /// No trash entry carries this id.
    #[error("trash entry not found: {id}")]
    TrashEntryNotFound { id: String },

    /// No deletion is currently undoable.
    #[error("nothing to undo")]
    NothingToUndo,
}

/// Failure of a key/value storage tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The tier cannot be reached (no window, storage disabled).
    #[error("{tier} storage not available")]
    Unavailable { tier: &'static str },

    /// The tier refused the write (quota exceeded, private mode).
    #[error("failed to write {key} to {tier} storage")]
    WriteFailed { tier: &'static str, key: String },

    /// A snapshot could not be serialized.
    #[error("failed to serialize {key}: {reason}")]
    SerializationFailed { key: String, reason: String },
}
