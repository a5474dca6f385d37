//! The file store facade used by every app.
//!
//! [`Vfs`] owns the tree, the trash bin and the persistence controller, and
//! commits after each successful mutation. Read-only calls never commit.

use serde::Serialize;

use crate::config::FALLBACK_FOLDER;
use crate::core::error::{StorageError, VfsError};
use crate::core::filesystem::{DirEntry, FileTree};
use crate::core::path;
use crate::core::persistence::{LoadSource, PersistenceController};
use crate::core::trash::{PendingUndoView, TrashBin};
use crate::core::undo::{Clock, UndoTimer, UndoToken};
use crate::models::{Node, NodeKind, Settings, TrashEntry};
use crate::utils::id::make_id;
use crate::utils::storage::KeyValueStore;

/// Platform services a [`Vfs`] runs on.
pub struct Host {
    /// Cleared when the session ends (sessionStorage).
    pub ephemeral: Box<dyn KeyValueStore>,
    /// Survives restarts (localStorage).
    pub durable: Box<dyn KeyValueStore>,
    pub timer: Box<dyn UndoTimer>,
    pub clock: Box<dyn Clock>,
}

/// Where a restored item ended up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restored {
    pub id: String,
    /// Name used in the destination folder, possibly conflict-renamed.
    pub name: String,
    pub path: String,
    /// True when the original parent was gone and the fallback folder was used.
    pub relocated: bool,
}

/// Virtual file store with trash, single-slot undo and two-tier persistence.
pub struct Vfs {
    tree: FileTree,
    trash: TrashBin,
    persistence: PersistenceController,
    clock: Box<dyn Clock>,
    load_source: LoadSource,
}

impl Vfs {
    /// Load the tree and trash from the host's tiers and save them back once.
    ///
    /// On first launch this also writes the default settings record.
    pub fn open(host: Host) -> Self {
        let persistence = PersistenceController::new(host.ephemeral, host.durable);
        let (root, load_source) = persistence.load_tree();
        let ledger = persistence.load_trash();
        log::info!(
            "file tree loaded from {load_source:?} tier, {} item(s) in trash",
            ledger.items.len()
        );

        let vfs = Self {
            tree: FileTree::new(root),
            trash: TrashBin::new(ledger, host.timer),
            persistence,
            clock: host.clock,
            load_source,
        };
        vfs.commit();
        vfs.persistence.ensure_settings();
        vfs
    }

    /// Tier the tree was loaded from.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    // =========================================================================
    // Reading
    // =========================================================================

    pub fn resolve(&self, path: &str) -> Result<&Node, VfsError> {
        self.tree.resolve(path)
    }

    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        self.tree.list_dir(path)
    }

    /// Byte size of the node at `path`.
    pub fn size(&self, path: &str) -> Result<u64, VfsError> {
        Ok(self.resolve(path)?.size())
    }

    /// Deep copy of the whole tree.
    pub fn tree_snapshot(&self) -> Node {
        self.tree.root().clone()
    }

    /// Deep copy of the trash ledger, most recent first.
    pub fn trash_snapshot(&self) -> Vec<TrashEntry> {
        self.trash.ledger().items
    }

    pub fn list_trash(&self) -> &[TrashEntry] {
        self.trash.items()
    }

    /// The undoable deletion, if its window is still open.
    pub fn pending_undo(&self) -> Option<PendingUndoView> {
        self.trash
            .pending()
            .map(|pending| pending.view(self.clock.now_ms()))
    }

    /// The settings record as currently stored.
    pub fn settings(&self) -> Settings {
        self.persistence.settings()
    }

    // =========================================================================
    // Tree Mutations
    // =========================================================================

    pub fn create_entry(&mut self, parent: &str, name: &str, kind: NodeKind) -> Result<(), VfsError> {
        self.tree.create_entry(parent, name, kind)?;
        log::debug!("created {kind} {}", path::join(parent, name));
        self.commit_tree();
        Ok(())
    }

    pub fn write_file_content(&mut self, path: &str, content: &str) -> Result<(), VfsError> {
        self.tree.write_file_content(path, content)?;
        self.commit_tree();
        Ok(())
    }

    /// Create or overwrite `parent/name`. Returns `true` if the file is new.
    pub fn save_file(&mut self, parent: &str, name: &str, content: &str) -> Result<bool, VfsError> {
        let created = self.tree.save_file(parent, name, content)?;
        self.commit_tree();
        Ok(created)
    }

    pub fn rename_entry(&mut self, parent: &str, old_name: &str, new_name: &str) -> Result<(), VfsError> {
        self.tree.rename_entry(parent, old_name, new_name)?;
        log::debug!("renamed {} to {new_name}", path::join(parent, old_name));
        self.commit_tree();
        Ok(())
    }

    /// Move `parent/name` to the trash and make it the undoable deletion.
    pub fn delete_entry(&mut self, parent: &str, name: &str) -> Result<TrashEntry, VfsError> {
        let node = self.tree.detach(parent, name)?;
        let now = self.clock.now_ms();
        let entry = TrashEntry {
            id: make_id(now),
            name: name.to_string(),
            kind: node.kind(),
            snapshot: node,
            original_path: path::join(parent, name),
            deleted_at: now,
        };

        self.trash
            .push(entry.clone(), path::normalize(parent), now);
        log::info!("moved {} to trash as {}", entry.original_path, entry.id);
        self.commit();
        Ok(entry)
    }

    /// [`Vfs::delete_entry`] addressed by full path.
    pub fn move_path_to_trash(&mut self, target: &str) -> Result<TrashEntry, VfsError> {
        let (parent, name) = path::split_parent(target)?;
        self.delete_entry(&parent, &name)
    }

    // =========================================================================
    // Trash & Undo
    // =========================================================================

    /// Restore the most recent deletion while its undo window is open.
    ///
    /// [`VfsError::NothingToUndo`] is the normal answer once the window has
    /// closed or the entry left the trash.
    pub fn undo(&mut self) -> Result<Restored, VfsError> {
        let pending = self.trash.take_pending().ok_or(VfsError::NothingToUndo)?;
        let restored = self.place(&pending.entry, &pending.original_parent_path)?;
        self.trash.remove(&pending.entry.id);
        log::info!("undid deletion of {} into {}", pending.entry.name, restored.path);
        self.commit();
        Ok(restored)
    }

    /// Put any trash entry back near where it came from.
    pub fn restore_from_trash(&mut self, id: &str) -> Result<Restored, VfsError> {
        let entry = self
            .trash
            .get(id)
            .cloned()
            .ok_or_else(|| VfsError::TrashEntryNotFound { id: id.to_string() })?;
        let parent = path::split_parent(&entry.original_path)
            .map(|(parent, _)| parent)
            .unwrap_or_else(|_| FALLBACK_FOLDER.to_string());

        let restored = self.place(&entry, &parent)?;
        self.trash.remove(id);
        log::info!("restored {} to {}", entry.original_path, restored.path);
        self.commit();
        Ok(restored)
    }

    /// Drop one trash entry for good.
    pub fn permanently_delete(&mut self, id: &str) -> Result<TrashEntry, VfsError> {
        let entry = self
            .trash
            .remove(id)
            .ok_or_else(|| VfsError::TrashEntryNotFound { id: id.to_string() })?;
        self.commit_trash();
        Ok(entry)
    }

    /// Drop every trash entry. Returns how many were removed.
    pub fn empty_trash(&mut self) -> usize {
        let count = self.trash.clear();
        log::info!("emptied trash ({count} item(s))");
        self.commit_trash();
        count
    }

    /// Timer callback for the undo countdown.
    ///
    /// Returns `false` when `token` no longer names the armed slot, which
    /// makes late or duplicate callbacks harmless.
    pub fn expire_undo(&mut self, token: UndoToken) -> bool {
        let expired = self.trash.expire(token);
        if expired {
            log::debug!("undo window {} closed", token.value());
        } else {
            log::debug!("ignoring stale undo timer {}", token.value());
        }
        expired
    }

    // =========================================================================
    // Settings & Lifecycle
    // =========================================================================

    /// Merge new settings into the stored record. With persistence on, the
    /// tree is written to the durable tier right away.
    pub fn apply_settings(&mut self, settings: Settings) -> Settings {
        let record = self.persistence.apply_settings(settings);
        if record.persist_fs {
            self.persistence.commit_tree_durable(self.tree.root());
        }
        record
    }

    /// Delete the durable tree copy without touching the live tree.
    pub fn clear_durable_tree(&self) -> Result<(), StorageError> {
        self.persistence.clear_durable_tree()
    }

    /// Session teardown: empties the trash when `emptyTrashOnExit` is set.
    pub fn shutdown(&mut self) {
        if self.settings().empty_trash_on_exit {
            self.empty_trash();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Insert a copy of `entry`'s snapshot under `parent`, or under the
    /// fallback folder (then the root) if `parent` is gone.
    fn place(&mut self, entry: &TrashEntry, parent: &str) -> Result<Restored, VfsError> {
        let (destination, relocated) = if self.tree.is_folder(parent) {
            (path::normalize(parent), false)
        } else if self.tree.is_folder(FALLBACK_FOLDER) {
            (FALLBACK_FOLDER.to_string(), true)
        } else {
            ("/".to_string(), true)
        };
        if relocated {
            log::warn!("{parent} no longer exists, restoring {} into {destination}", entry.name);
        }

        let name = self
            .tree
            .insert_unique(&destination, &entry.name, entry.snapshot.clone())?;
        Ok(Restored {
            id: entry.id.clone(),
            path: path::join(&destination, &name),
            name,
            relocated,
        })
    }

    fn commit(&self) {
        self.commit_tree();
        self.commit_trash();
    }

    fn commit_tree(&self) {
        self.persistence.commit_tree(self.tree.root());
    }

    fn commit_trash(&self) {
        self.persistence.commit_trash(&self.trash.ledger());
    }
}

impl std::fmt::Debug for Vfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vfs")
            .field("load_source", &self.load_source)
            .field("trash", &self.trash)
            .field("persistence", &self.persistence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::undo::{ManualClock, ManualTimer};
    use crate::utils::storage::MemoryStorage;

    fn open() -> (Vfs, ManualTimer) {
        let timer = ManualTimer::new();
        let vfs = Vfs::open(Host {
            ephemeral: Box::new(MemoryStorage::new("ephemeral")),
            durable: Box::new(MemoryStorage::new("durable")),
            timer: Box::new(timer.clone()),
            clock: Box::new(ManualClock::new(1_704_067_200_000)),
        });
        (vfs, timer)
    }

    #[test]
    fn test_open_seeds_fresh_store() {
        let (vfs, _) = open();
        assert_eq!(vfs.load_source(), LoadSource::Seed);
        assert!(vfs.resolve("/home/notes.txt").is_ok());
        assert!(vfs.list_trash().is_empty());
    }

    #[test]
    fn test_delete_builds_entry() {
        let (mut vfs, _) = open();
        let size = vfs.size("/home/notes.txt").unwrap();
        let entry = vfs.delete_entry("/home", "notes.txt").unwrap();

        assert_eq!(entry.name, "notes.txt");
        assert_eq!(entry.kind, NodeKind::File);
        assert_eq!(entry.original_path, "/home/notes.txt");
        assert_eq!(entry.deleted_at, 1_704_067_200_000);
        assert_eq!(entry.snapshot.size(), size);
        assert!(vfs.resolve("/home/notes.txt").is_err());
        assert_eq!(vfs.list_trash()[0], entry);
    }

    #[test]
    fn test_delete_missing() {
        let (mut vfs, timer) = open();
        assert!(matches!(
            vfs.delete_entry("/home", "ghost"),
            Err(VfsError::NotFound { .. })
        ));
        assert_eq!(timer.state().arm_count, 0);
    }

    #[test]
    fn test_undo_round_trip() {
        let (mut vfs, timer) = open();
        let before = vfs.tree_snapshot();
        vfs.delete_entry("/home", "notes.txt").unwrap();

        let restored = vfs.undo().unwrap();
        assert_eq!(restored.path, "/home/notes.txt");
        assert!(!restored.relocated);
        assert_eq!(vfs.tree_snapshot(), before);
        assert!(vfs.list_trash().is_empty());
        assert!(timer.armed_token().is_none());
        assert_eq!(vfs.undo(), Err(VfsError::NothingToUndo));
    }

    #[test]
    fn test_undo_after_expiry() {
        let (mut vfs, timer) = open();
        vfs.delete_entry("/home", "notes.txt").unwrap();
        let token = timer.armed_token().unwrap();

        assert!(vfs.expire_undo(token));
        assert!(vfs.pending_undo().is_none());
        assert_eq!(vfs.undo(), Err(VfsError::NothingToUndo));
        assert_eq!(vfs.list_trash().len(), 1);
    }

    #[test]
    fn test_move_path_to_trash() {
        let (mut vfs, _) = open();
        let entry = vfs.move_path_to_trash("/etc/config.cfg").unwrap();
        assert_eq!(entry.original_path, "/etc/config.cfg");
        assert_eq!(vfs.move_path_to_trash("/"), Err(VfsError::RootHasNoParent));
    }

    #[test]
    fn test_permanently_delete_unknown_id() {
        let (mut vfs, _) = open();
        assert_eq!(
            vfs.permanently_delete("nope"),
            Err(VfsError::TrashEntryNotFound {
                id: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_pending_undo_view() {
        let (mut vfs, _) = open();
        assert!(vfs.pending_undo().is_none());
        let entry = vfs.delete_entry("/home", "user.txt").unwrap();

        let view = vfs.pending_undo().unwrap();
        assert_eq!(view.id, entry.id);
        assert_eq!(view.countdown, "10s");
    }

    #[test]
    fn test_failed_mutation_does_not_commit() {
        let ephemeral = MemoryStorage::new("ephemeral");
        let vfs_store = ephemeral.clone();
        let mut vfs = Vfs::open(Host {
            ephemeral: Box::new(vfs_store),
            durable: Box::new(MemoryStorage::new("durable")),
            timer: Box::new(ManualTimer::new()),
            clock: Box::new(ManualClock::new(0)),
        });
        let saved = ephemeral.get_item(crate::config::storage_keys::SESSION_TREE);

        assert!(vfs.create_entry("/home", "notes.txt", NodeKind::File).is_err());
        assert_eq!(
            ephemeral.get_item(crate::config::storage_keys::SESSION_TREE),
            saved
        );
    }
}
