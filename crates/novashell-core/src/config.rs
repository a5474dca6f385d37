//! Core configuration.
//!
//! Centralizes the constants shared by the file store, the trash engine and
//! the persistence controller, plus the layout seeded on first launch.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::models::{Node, Settings};

// =============================================================================
// Application Metadata
// =============================================================================

/// Product name shown in the seeded welcome file.
pub const PRODUCT_NAME: &str = "NovaShell OS";

// =============================================================================
// Storage Configuration
// =============================================================================

/// Keys under which snapshots are stored in the two tiers.
pub mod storage_keys {
    /// Tree snapshot in the ephemeral tier (sessionStorage).
    pub const SESSION_TREE: &str = "webosFS";
    /// Tree snapshot in the durable tier, written only when persistence is on.
    pub const DURABLE_TREE: &str = "webosFS_local";
    /// Trash ledger, always in the durable tier.
    pub const TRASH: &str = "webosTrash";
    /// Settings record, always in the durable tier.
    pub const SETTINGS: &str = "webosSettings";
}

// =============================================================================
// Trash Configuration
// =============================================================================

/// How long the most recent deletion stays undoable.
pub const UNDO_WINDOW: Duration = Duration::from_secs(10);

/// Folder that receives restored items whose original parent is gone.
pub const FALLBACK_FOLDER: &str = "/home";

/// Number of random base36 characters appended to trash ids.
pub const ID_SUFFIX_LEN: usize = 6;

// =============================================================================
// Seed Layout
// =============================================================================

/// Build the tree used when neither tier holds a readable snapshot.
pub fn seed_tree() -> Node {
    Node::folder_with([
        (
            "home",
            Node::folder_with([
                (
                    "user.txt",
                    Node::file(format!(
                        "Welcome to {PRODUCT_NAME}!\nThis is your home directory."
                    )),
                ),
                (
                    "notes.txt",
                    Node::file("These are your notes.\nYou can edit them with the Text Editor."),
                ),
            ]),
        ),
        (
            "bin",
            Node::folder_with([
                ("calculator", Node::file("Executable calculator app")),
                ("texteditor", Node::file("Executable text editor app")),
                ("terminal", Node::file("Executable terminal app")),
                ("fileexplorer", Node::file("Executable file explorer app")),
                ("browser", Node::file("Executable browser app")),
            ]),
        ),
        (
            "etc",
            Node::folder_with([(
                "config.cfg",
                Node::file("# NovaShell configuration file\ntheme=dark\nversion=1.0"),
            )]),
        ),
    ])
}

/// Settings record written on first launch.
///
/// `theme` and `customBackground` belong to the settings app; they are seeded
/// with its defaults so the record has the same shape whoever writes it first.
pub fn seed_settings() -> Settings {
    let mut other = Map::new();
    other.insert("theme".to_string(), Value::from("dark"));
    other.insert("customBackground".to_string(), Value::Null);
    Settings {
        persist_fs: false,
        empty_trash_on_exit: false,
        other,
    }
}
