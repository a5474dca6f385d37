//! # novashell
//!
//! Browser bindings for the NovaShell file store.
//!
//! The desktop's apps talk to a single [`WebOs`] handle exported through
//! `wasm-bindgen`. It opens [`novashell_core::Vfs`] over sessionStorage and
//! localStorage, drives the undo countdown with `setTimeout`, and hands every
//! result back as plain JSON-shaped JS values.
//!
//! ```js
//! import init, { WebOs } from "./pkg/novashell.js";
//!
//! await init();
//! const os = new WebOs();
//! os.createEntry("/home", "todo.txt", "file");
//! os.deleteEntry("/home", "todo.txt");
//! os.undo(); // { id, name: "todo.txt", path: "/home/todo.txt", relocated: false }
//! ```

pub mod utils;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use novashell_core::{Host, NodeKind, Settings, UndoToken, Vfs};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use crate::utils::storage::{DURABLE_TIER, EPHEMERAL_TIER, tier_or_memory};
use crate::utils::{BrowserStorage, BrowserUndoTimer, JsClock, logger};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logger::init(level);
}

/// Convert a value to a plain JS object (objects, not `Map`s; numbers, not `BigInt`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsError::from)
}

fn parse_kind(kind: &str) -> Result<NodeKind, JsError> {
    match kind {
        "file" => Ok(NodeKind::File),
        "folder" => Ok(NodeKind::Folder),
        other => Err(JsError::new(&format!("unknown node kind: {other}"))),
    }
}

/// Handle to the file store shared by every desktop app.
#[wasm_bindgen]
pub struct WebOs {
    vfs: Rc<RefCell<Vfs>>,
}

#[wasm_bindgen]
impl WebOs {
    /// Open the store, loading the tree and trash from browser storage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebOs {
        // The timer is built before the store it reports to.
        let target: Rc<RefCell<Weak<RefCell<Vfs>>>> = Rc::new(RefCell::new(Weak::new()));
        let timer_target = Rc::clone(&target);
        let timer = BrowserUndoTimer::new(move |token| {
            let Some(vfs) = timer_target.borrow().upgrade() else {
                return;
            };
            match vfs.try_borrow_mut() {
                Ok(mut vfs) => {
                    vfs.expire_undo(token);
                }
                Err(_) => log::warn!("undo timer {} fired while the store was busy", token.value()),
            }
        });

        let vfs = Vfs::open(Host {
            ephemeral: tier_or_memory(BrowserStorage::session(), EPHEMERAL_TIER),
            durable: tier_or_memory(BrowserStorage::local(), DURABLE_TIER),
            timer: Box::new(timer),
            clock: Box::new(JsClock),
        });
        let vfs = Rc::new(RefCell::new(vfs));
        *target.borrow_mut() = Rc::downgrade(&vfs);

        WebOs { vfs }
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Node at `path` as `{type, content}` or `{type, children}`.
    pub fn resolve(&self, path: &str) -> Result<JsValue, JsError> {
        to_js(self.vfs.borrow().resolve(path)?)
    }

    /// Children of the folder at `path`: `[{name, isDir, size}]`.
    #[wasm_bindgen(js_name = listDir)]
    pub fn list_dir(&self, path: &str) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().list_dir(path)?)
    }

    /// Byte size of the node at `path`, folders summed recursively.
    pub fn size(&self, path: &str) -> Result<f64, JsError> {
        Ok(self.vfs.borrow().size(path)? as f64)
    }

    #[wasm_bindgen(js_name = getTreeSnapshot)]
    pub fn tree_snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().tree_snapshot())
    }

    /// Full trash entries, including their snapshots.
    #[wasm_bindgen(js_name = getTrashSnapshot)]
    pub fn trash_snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().trash_snapshot())
    }

    /// Trash rows for display, without snapshot bodies.
    #[wasm_bindgen(js_name = listTrash)]
    pub fn list_trash(&self) -> Result<JsValue, JsError> {
        let vfs = self.vfs.borrow();
        let rows: Vec<_> = vfs.list_trash().iter().map(|entry| entry.summary()).collect();
        to_js(&rows)
    }

    /// `{token, id, name, remainingMs, countdown}` or `null`.
    #[wasm_bindgen(js_name = pendingUndo)]
    pub fn pending_undo(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().pending_undo())
    }

    #[wasm_bindgen(js_name = loadSource)]
    pub fn load_source(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().load_source())
    }

    // =========================================================================
    // Tree Mutations
    // =========================================================================

    /// Create an empty `"file"` or `"folder"` named `name` under `parent`.
    #[wasm_bindgen(js_name = createEntry)]
    pub fn create_entry(&self, parent: &str, name: &str, kind: &str) -> Result<(), JsError> {
        let kind = parse_kind(kind)?;
        self.vfs.borrow_mut().create_entry(parent, name, kind)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = writeFileContent)]
    pub fn write_file_content(&self, path: &str, content: &str) -> Result<(), JsError> {
        self.vfs.borrow_mut().write_file_content(path, content)?;
        Ok(())
    }

    /// Create or overwrite a file. Returns `true` if it was created.
    #[wasm_bindgen(js_name = saveFile)]
    pub fn save_file(&self, parent: &str, name: &str, content: &str) -> Result<bool, JsError> {
        Ok(self.vfs.borrow_mut().save_file(parent, name, content)?)
    }

    #[wasm_bindgen(js_name = renameEntry)]
    pub fn rename_entry(&self, parent: &str, old_name: &str, new_name: &str) -> Result<(), JsError> {
        self.vfs.borrow_mut().rename_entry(parent, old_name, new_name)?;
        Ok(())
    }

    /// Move `parent/name` to the trash. Returns its trash row.
    #[wasm_bindgen(js_name = deleteEntry)]
    pub fn delete_entry(&self, parent: &str, name: &str) -> Result<JsValue, JsError> {
        let entry = self.vfs.borrow_mut().delete_entry(parent, name)?;
        to_js(&entry.summary())
    }

    #[wasm_bindgen(js_name = movePathToTrash)]
    pub fn move_path_to_trash(&self, path: &str) -> Result<JsValue, JsError> {
        let entry = self.vfs.borrow_mut().move_path_to_trash(path)?;
        to_js(&entry.summary())
    }

    // =========================================================================
    // Trash & Undo
    // =========================================================================

    /// Undo the latest deletion: `{id, name, path, relocated}`.
    pub fn undo(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow_mut().undo()?)
    }

    #[wasm_bindgen(js_name = restoreFromTrash)]
    pub fn restore_from_trash(&self, id: &str) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow_mut().restore_from_trash(id)?)
    }

    #[wasm_bindgen(js_name = permanentlyDelete)]
    pub fn permanently_delete(&self, id: &str) -> Result<(), JsError> {
        self.vfs.borrow_mut().permanently_delete(id)?;
        Ok(())
    }

    /// Remove every trash entry. Returns how many there were.
    #[wasm_bindgen(js_name = emptyTrash)]
    pub fn empty_trash(&self) -> usize {
        self.vfs.borrow_mut().empty_trash()
    }

    /// Close the undo window for `token` early. Returns whether it was still open.
    #[wasm_bindgen(js_name = expireUndo)]
    pub fn expire_undo(&self, token: f64) -> bool {
        self.vfs
            .borrow_mut()
            .expire_undo(UndoToken::from_value(token as u64))
    }

    // =========================================================================
    // Settings & Lifecycle
    // =========================================================================

    /// The settings record, including fields this crate doesn't interpret.
    pub fn settings(&self) -> Result<JsValue, JsError> {
        to_js(&self.vfs.borrow().settings())
    }

    /// Merge `settings` into the stored record and return the record as saved.
    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&self, settings: JsValue) -> Result<JsValue, JsError> {
        let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
        to_js(&self.vfs.borrow_mut().apply_settings(settings))
    }

    /// Delete the localStorage copy of the tree.
    #[wasm_bindgen(js_name = clearDurableTree)]
    pub fn clear_durable_tree(&self) -> Result<(), JsError> {
        self.vfs.borrow().clear_durable_tree()?;
        Ok(())
    }

    /// Call from `beforeunload`. Empties the trash if `emptyTrashOnExit` is set.
    pub fn shutdown(&self) {
        self.vfs.borrow_mut().shutdown();
    }
}

impl Default for WebOs {
    fn default() -> Self {
        Self::new()
    }
}

/// `"1.5 KB"`-style label for a byte count.
#[wasm_bindgen(js_name = formatHumanSize)]
pub fn format_human_size(bytes: f64) -> String {
    novashell_core::format_human_size(bytes.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert!(matches!(parse_kind("file"), Ok(NodeKind::File)));
        assert!(matches!(parse_kind("folder"), Ok(NodeKind::Folder)));
    }

    #[test]
    fn test_format_human_size_clamps_negative() {
        assert_eq!(format_human_size(-5.0), "0 B");
        assert_eq!(format_human_size(1536.0), "1.50 KB");
    }
}
