//! Two-tier persistence routing.
//!
//! | Snapshot | Ephemeral tier | Durable tier            |
//! |----------|----------------|-------------------------|
//! | tree     | always         | only when `persistFS`   |
//! | trash    | never          | always                  |
//! | settings | never          | always                  |
//!
//! Load order for the tree is durable (when `persistFS`), then ephemeral, then
//! the seed layout. Unreadable snapshots, and snapshots whose root is not a
//! folder, count as missing.
//!
//! The settings record belongs to the settings app, which may rewrite it at
//! any time, so it is read from the durable tier whenever a routing decision
//! is made rather than cached.

use serde::Serialize;

use crate::config::{self, storage_keys};
use crate::core::error::StorageError;
use crate::models::{Node, Settings, TrashLedger, TreeSnapshot};
use crate::utils::storage::{KeyValueStore, get_json, set_json};

/// Where the tree came from at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Durable,
    Ephemeral,
    Seed,
}

/// Borrowed form of [`TreeSnapshot`] so commits don't clone the tree.
#[derive(Serialize)]
struct TreeSnapshotRef<'a> {
    #[serde(rename = "/")]
    root: &'a Node,
}

/// Decides which tier each snapshot is written to and read from.
pub struct PersistenceController {
    ephemeral: Box<dyn KeyValueStore>,
    durable: Box<dyn KeyValueStore>,
}

impl PersistenceController {
    pub fn new(ephemeral: Box<dyn KeyValueStore>, durable: Box<dyn KeyValueStore>) -> Self {
        Self { ephemeral, durable }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// The settings record as currently stored, or defaults.
    pub fn settings(&self) -> Settings {
        get_json(self.durable.as_ref(), storage_keys::SETTINGS).unwrap_or_default()
    }

    /// Merge `update` into the stored settings record and save it.
    ///
    /// The typed switches take the values in `update`. Extra fields in
    /// `update` overwrite stored ones; stored fields it doesn't carry are
    /// kept. Returns the record as saved.
    pub fn apply_settings(&self, update: Settings) -> Settings {
        let mut record = self.settings();
        record.persist_fs = update.persist_fs;
        record.empty_trash_on_exit = update.empty_trash_on_exit;
        record.other.extend(update.other);

        if let Err(err) = set_json(self.durable.as_ref(), storage_keys::SETTINGS, &record) {
            log::warn!("settings not saved: {err}");
        }
        record
    }

    /// Write the default settings record on first launch.
    ///
    /// An existing value is left alone even if unreadable, so nothing the
    /// settings app wrote is ever replaced here.
    pub fn ensure_settings(&self) {
        if self.durable.get_item(storage_keys::SETTINGS).is_none() {
            Self::write(self.durable.as_ref(), storage_keys::SETTINGS, &config::seed_settings());
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load the tree following the tier priority.
    pub fn load_tree(&self) -> (Node, LoadSource) {
        if self.settings().persist_fs
            && let Some(root) = Self::read_tree(self.durable.as_ref(), storage_keys::DURABLE_TREE)
        {
            return (root, LoadSource::Durable);
        }

        if let Some(root) = Self::read_tree(self.ephemeral.as_ref(), storage_keys::SESSION_TREE) {
            return (root, LoadSource::Ephemeral);
        }

        (config::seed_tree(), LoadSource::Seed)
    }

    /// Load the trash ledger from the durable tier, or start empty.
    pub fn load_trash(&self) -> TrashLedger {
        get_json(self.durable.as_ref(), storage_keys::TRASH).unwrap_or_default()
    }

    fn read_tree(store: &dyn KeyValueStore, key: &str) -> Option<Node> {
        let snapshot = get_json::<TreeSnapshot>(store, key)?;
        if snapshot.root.is_folder() {
            Some(snapshot.root)
        } else {
            log::warn!("ignoring {key} in {} storage: root is not a folder", store.tier());
            None
        }
    }

    // =========================================================================
    // Committing
    // =========================================================================

    /// Write the tree to the ephemeral tier, and to the durable tier when
    /// `persistFS` is on.
    pub fn commit_tree(&self, root: &Node) {
        let durable = self.settings().persist_fs;
        let snapshot = TreeSnapshotRef { root };
        Self::write(self.ephemeral.as_ref(), storage_keys::SESSION_TREE, &snapshot);
        if durable {
            Self::write(self.durable.as_ref(), storage_keys::DURABLE_TREE, &snapshot);
        }
        log::debug!("tree committed (durable: {durable})");
    }

    /// Write the trash ledger to the durable tier.
    pub fn commit_trash(&self, ledger: &TrashLedger) {
        Self::write(self.durable.as_ref(), storage_keys::TRASH, ledger);
        log::debug!("trash committed ({} items)", ledger.items.len());
    }

    /// Write the tree to the durable tier regardless of `persistFS`.
    ///
    /// Used when persistence has just been switched on.
    pub fn commit_tree_durable(&self, root: &Node) {
        Self::write(self.durable.as_ref(), storage_keys::DURABLE_TREE, &TreeSnapshotRef { root });
    }

    /// Remove the durable tree copy. The live tree and the ephemeral tier are untouched.
    pub fn clear_durable_tree(&self) -> Result<(), StorageError> {
        self.durable.remove_item(storage_keys::DURABLE_TREE)
    }

    fn write<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
        if let Err(err) = set_json(store, key, value) {
            log::warn!("commit skipped: {err}");
        }
    }
}

impl std::fmt::Debug for PersistenceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceController")
            .field("ephemeral", &self.ephemeral.tier())
            .field("durable", &self.durable.tier())
            .finish()
    }
}
