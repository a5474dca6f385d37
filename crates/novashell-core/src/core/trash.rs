//! Trash ledger with a single timed undo slot.
//!
//! Deleted items are kept most-recent-first with no upper bound. Only the
//! latest deletion can be undone, and only until its countdown runs out:
//!
//! ```text
//! in tree --delete--> in trash, undo armed --[undo | expiry]--> in trash
//!                                           --[restore | permanent delete | empty]--> gone
//! ```
//!
//! Whatever clears the slot first (undo, expiry, a newer delete, emptying
//! the trash, removing the pending entry) wins; the others find it cleared.

use std::time::Duration;

use serde::Serialize;

use crate::config::UNDO_WINDOW;
use crate::core::undo::{UndoTimer, UndoToken};
use crate::models::{TrashEntry, TrashLedger};
use crate::utils::format::format_countdown;

/// The deletion that can currently be undone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUndo {
    pub token: UndoToken,
    /// Independent copy of the ledger entry.
    pub entry: TrashEntry,
    pub original_parent_path: String,
    /// Milliseconds since the epoch when the countdown started.
    pub armed_at: u64,
}

impl PendingUndo {
    /// Time left in the undo window at `now_ms`.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        let elapsed = Duration::from_millis(now_ms.saturating_sub(self.armed_at));
        UNDO_WINDOW.saturating_sub(elapsed)
    }

    /// State for the undo toast.
    pub fn view(&self, now_ms: u64) -> PendingUndoView {
        let remaining = self.remaining(now_ms);
        PendingUndoView {
            token: self.token.value(),
            id: self.entry.id.clone(),
            name: self.entry.name.clone(),
            remaining_ms: remaining.as_millis() as u64,
            countdown: format_countdown(remaining),
        }
    }
}

/// Pending undo as shown by the undo toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUndoView {
    pub token: u64,
    pub id: String,
    pub name: String,
    pub remaining_ms: u64,
    pub countdown: String,
}

#[derive(Debug, Default)]
enum UndoSlot {
    #[default]
    Cleared,
    Armed(PendingUndo),
}

/// Trash ledger plus the undo slot and its timer.
pub struct TrashBin {
    items: Vec<TrashEntry>,
    slot: UndoSlot,
    timer: Box<dyn UndoTimer>,
    next_token: u64,
}

impl TrashBin {
    pub fn new(ledger: TrashLedger, timer: Box<dyn UndoTimer>) -> Self {
        Self {
            items: ledger.items,
            slot: UndoSlot::Cleared,
            timer,
            next_token: 0,
        }
    }

    /// Entries, most recent first.
    pub fn items(&self) -> &[TrashEntry] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&TrashEntry> {
        self.items.iter().find(|entry| entry.id == id)
    }

    pub fn pending(&self) -> Option<&PendingUndo> {
        match &self.slot {
            UndoSlot::Armed(pending) => Some(pending),
            UndoSlot::Cleared => None,
        }
    }

    /// Deep copy of the ledger for persistence and export.
    pub fn ledger(&self) -> TrashLedger {
        TrashLedger {
            items: self.items.clone(),
        }
    }

    /// Record a deletion and make it the undoable one.
    ///
    /// Any previously armed undo is discarded and its timer cancelled.
    pub fn push(&mut self, entry: TrashEntry, original_parent_path: String, now_ms: u64) -> UndoToken {
        self.clear_slot();

        self.next_token += 1;
        let token = UndoToken(self.next_token);

        self.items.insert(0, entry.clone());
        self.slot = UndoSlot::Armed(PendingUndo {
            token,
            entry,
            original_parent_path,
            armed_at: now_ms,
        });
        self.timer.arm(token, UNDO_WINDOW);
        token
    }

    /// Claim the pending undo, clearing the slot.
    pub fn take_pending(&mut self) -> Option<PendingUndo> {
        self.clear_slot()
    }

    /// Countdown callback. Clears the slot only if `token` is still armed.
    pub fn expire(&mut self, token: UndoToken) -> bool {
        let armed = matches!(&self.slot, UndoSlot::Armed(pending) if pending.token == token);
        if armed {
            self.clear_slot();
        }
        armed
    }

    /// Drop one entry from the ledger.
    ///
    /// If it is the pending one, the undo slot goes with it.
    pub fn remove(&mut self, id: &str) -> Option<TrashEntry> {
        let index = self.items.iter().position(|entry| entry.id == id)?;
        if self.pending().is_some_and(|pending| pending.entry.id == id) {
            self.clear_slot();
        }
        Some(self.items.remove(index))
    }

    /// Drop every entry and the undo slot. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        self.clear_slot();
        let count = self.items.len();
        self.items.clear();
        count
    }

    fn clear_slot(&mut self) -> Option<PendingUndo> {
        match std::mem::take(&mut self.slot) {
            UndoSlot::Armed(pending) => {
                self.timer.cancel();
                Some(pending)
            }
            UndoSlot::Cleared => None,
        }
    }
}

impl std::fmt::Debug for TrashBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrashBin")
            .field("items", &self.items.len())
            .field("slot", &self.slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::undo::ManualTimer;
    use crate::models::{Node, NodeKind};

    fn entry(id: &str) -> TrashEntry {
        TrashEntry {
            id: id.to_string(),
            name: format!("{id}.txt"),
            kind: NodeKind::File,
            snapshot: Node::file(id),
            original_path: format!("/home/{id}.txt"),
            deleted_at: 0,
        }
    }

    fn bin() -> (TrashBin, ManualTimer) {
        let timer = ManualTimer::new();
        (
            TrashBin::new(TrashLedger::default(), Box::new(timer.clone())),
            timer,
        )
    }

    // =========================================================================
    // Ledger Tests
    // =========================================================================

    #[test]
    fn test_push_is_most_recent_first() {
        let (mut bin, _) = bin();
        bin.push(entry("a"), "/home".to_string(), 0);
        bin.push(entry("b"), "/home".to_string(), 0);

        let ids: Vec<&str> = bin.items().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let (mut bin, _) = bin();
        bin.push(entry("a"), "/home".to_string(), 0);
        assert!(bin.remove("zzz").is_none());
        assert_eq!(bin.items().len(), 1);
    }

    // =========================================================================
    // Undo Slot Tests
    // =========================================================================

    #[test]
    fn test_push_arms_timer() {
        let (mut bin, timer) = bin();
        let token = bin.push(entry("a"), "/home".to_string(), 0);

        assert_eq!(timer.state().armed, Some((token, UNDO_WINDOW)));
        assert_eq!(bin.pending().unwrap().entry.id, "a");
    }

    #[test]
    fn test_new_push_replaces_slot() {
        let (mut bin, timer) = bin();
        let first = bin.push(entry("a"), "/home".to_string(), 0);
        let second = bin.push(entry("b"), "/home".to_string(), 0);

        assert_ne!(first, second);
        assert_eq!(bin.pending().unwrap().entry.id, "b");
        assert_eq!(timer.armed_token(), Some(second));
        assert_eq!(timer.state().cancel_count, 1);

        // The first countdown firing late must not clear the second slot.
        assert!(!bin.expire(first));
        assert!(bin.pending().is_some());
    }

    #[test]
    fn test_expire_clears_once() {
        let (mut bin, _) = bin();
        let token = bin.push(entry("a"), "/home".to_string(), 0);

        assert!(bin.expire(token));
        assert!(!bin.expire(token));
        assert!(bin.pending().is_none());
        assert_eq!(bin.items().len(), 1);
    }

    #[test]
    fn test_take_pending_then_expire_is_inert() {
        let (mut bin, timer) = bin();
        let token = bin.push(entry("a"), "/home".to_string(), 0);

        let pending = bin.take_pending().unwrap();
        assert_eq!(pending.token, token);
        assert!(timer.armed_token().is_none());
        assert!(bin.take_pending().is_none());
        assert!(!bin.expire(token));
    }

    #[test]
    fn test_remove_pending_clears_slot() {
        let (mut bin, _) = bin();
        bin.push(entry("a"), "/home".to_string(), 0);
        bin.push(entry("b"), "/home".to_string(), 0);

        bin.remove("a");
        assert!(bin.pending().is_some());

        bin.remove("b");
        assert!(bin.pending().is_none());
    }

    #[test]
    fn test_clear_drops_slot() {
        let (mut bin, timer) = bin();
        bin.push(entry("a"), "/home".to_string(), 0);
        assert_eq!(bin.clear(), 1);
        assert!(bin.items().is_empty());
        assert!(bin.pending().is_none());
        assert!(timer.armed_token().is_none());
    }

    #[test]
    fn test_remaining_window() {
        let (mut bin, _) = bin();
        bin.push(entry("a"), "/home".to_string(), 1_000);
        let pending = bin.pending().unwrap();

        assert_eq!(pending.remaining(1_000), UNDO_WINDOW);
        assert_eq!(pending.remaining(4_500), Duration::from_millis(6_500));
        assert_eq!(pending.remaining(60_000), Duration::ZERO);

        let view = pending.view(4_500);
        assert_eq!(view.countdown, "7s");
        assert_eq!(view.name, "a.txt");
    }
}
