use std::collections::BTreeMap;

use serde::Serialize;

use crate::config;
use crate::core::error::VfsError;
use crate::core::path;
use crate::models::{Node, NodeKind};

/// Directory entry returned by list_dir
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// The in-memory file tree and its mutation rules.
///
/// Holds exactly one root folder. Every node is owned by a single parent's
/// `children` map, so moving a node out of the tree (delete) or into it
/// (restore) is a plain ownership transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTree {
    root: Node,
}

impl FileTree {
    /// Wrap an existing root. A non-folder root is replaced by an empty folder.
    pub fn new(root: Node) -> Self {
        if root.is_folder() {
            Self { root }
        } else {
            log::warn!("snapshot root is a file, starting from an empty folder");
            Self {
                root: Node::folder(),
            }
        }
    }

    /// Tree with the default layout.
    pub fn seeded() -> Self {
        Self::new(config::seed_tree())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolve an absolute path to a node.
    pub fn resolve(&self, path: &str) -> Result<&Node, VfsError> {
        path::resolve(&self.root, path)
    }

    /// Check if a path resolves to a folder.
    pub fn is_folder(&self, path: &str) -> bool {
        matches!(self.resolve(path), Ok(Node::Folder { .. }))
    }

    /// List folder contents.
    ///
    /// Sorted with folders first, then regular files, hidden names last;
    /// alphabetical within each group.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let children = self.resolve(path)?.children().ok_or_else(|| VfsError::NotAFolder {
            path: path::normalize(path),
        })?;

        let mut items: Vec<DirEntry> = children
            .iter()
            .map(|(name, node)| DirEntry {
                name: name.clone(),
                is_dir: node.is_folder(),
                size: node.size(),
            })
            .collect();

        items.sort_by(|a, b| {
            let a_hidden = a.name.starts_with('.');
            let b_hidden = b.name.starts_with('.');

            match (a.is_dir, b.is_dir, a_hidden, b_hidden) {
                (true, false, _, _) => std::cmp::Ordering::Less,
                (false, true, _, _) => std::cmp::Ordering::Greater,
                (_, _, false, true) => std::cmp::Ordering::Less,
                (_, _, true, false) => std::cmp::Ordering::Greater,
                _ => a.name.cmp(&b.name),
            }
        });
        Ok(items)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create an empty file or folder under `parent`.
    pub fn create_entry(&mut self, parent: &str, name: &str, kind: NodeKind) -> Result<(), VfsError> {
        path::validate_name(name)?;
        let children = self
            .folder_children_mut(parent)
            .ok_or_else(|| VfsError::ParentNotFound {
                path: path::normalize(parent),
            })?;

        if children.contains_key(name) {
            return Err(VfsError::NameConflict {
                parent: path::normalize(parent),
                name: name.to_string(),
            });
        }

        children.insert(name.to_string(), Node::empty(kind));
        Ok(())
    }

    /// Replace the content of an existing file.
    pub fn write_file_content(&mut self, path: &str, content: &str) -> Result<(), VfsError> {
        match path::resolve_mut(&mut self.root, path)? {
            Node::File { content: current } => {
                *current = content.to_string();
                Ok(())
            }
            Node::Folder { .. } => Err(VfsError::NotAFile {
                path: path::normalize(path),
            }),
        }
    }

    /// Write `content` to `parent/name`, creating the file if needed.
    ///
    /// Returns `true` when a new file was created.
    pub fn save_file(&mut self, parent: &str, name: &str, content: &str) -> Result<bool, VfsError> {
        path::validate_name(name)?;
        let children = self
            .folder_children_mut(parent)
            .ok_or_else(|| VfsError::ParentNotFound {
                path: path::normalize(parent),
            })?;

        match children.get_mut(name) {
            Some(Node::File { content: current }) => {
                *current = content.to_string();
                Ok(false)
            }
            Some(Node::Folder { .. }) => Err(VfsError::NotAFile {
                path: path::join(parent, name),
            }),
            None => {
                children.insert(name.to_string(), Node::file(content));
                Ok(true)
            }
        }
    }

    /// Rename a child within its folder.
    ///
    /// Only the destination name is checked for conflicts; renaming to the
    /// current name conflicts with itself.
    pub fn rename_entry(&mut self, parent: &str, old_name: &str, new_name: &str) -> Result<(), VfsError> {
        path::validate_name(new_name)?;
        let children = self
            .folder_children_mut(parent)
            .ok_or_else(|| VfsError::NotFound {
                path: path::normalize(parent),
            })?;

        if !children.contains_key(old_name) {
            return Err(VfsError::NotFound {
                path: path::join(parent, old_name),
            });
        }
        if children.contains_key(new_name) {
            return Err(VfsError::NameConflict {
                parent: path::normalize(parent),
                name: new_name.to_string(),
            });
        }

        if let Some(node) = children.remove(old_name) {
            children.insert(new_name.to_string(), node);
        }
        Ok(())
    }

    /// Take a child out of the tree, handing ownership to the caller.
    pub fn detach(&mut self, parent: &str, name: &str) -> Result<Node, VfsError> {
        self.folder_children_mut(parent)
            .and_then(|children| children.remove(name))
            .ok_or_else(|| VfsError::NotFound {
                path: path::join(parent, name),
            })
    }

    /// Insert a node under `parent`, renaming it if `name` is taken.
    ///
    /// Returns the name actually used.
    pub fn insert_unique(&mut self, parent: &str, name: &str, node: Node) -> Result<String, VfsError> {
        let children = self
            .folder_children_mut(parent)
            .ok_or_else(|| VfsError::ParentNotFound {
                path: path::normalize(parent),
            })?;

        let unique = unique_name(children, name);
        children.insert(unique.clone(), node);
        Ok(unique)
    }

    fn folder_children_mut(&mut self, path: &str) -> Option<&mut BTreeMap<String, Node>> {
        path::resolve_mut(&mut self.root, path).ok()?.children_mut()
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Pick a free name for a restored item.
///
/// Tries `name`, then `"<base> (restored)<ext>"`, then `"<base> (restored 2)<ext>"`
/// and so on, splitting `<ext>` at the last `.`.
pub fn unique_name(children: &BTreeMap<String, Node>, name: &str) -> String {
    if !children.contains_key(name) {
        return name.to_string();
    }

    let (base, ext) = match name.rfind('.') {
        Some(dot) => name.split_at(dot),
        None => (name, ""),
    };

    let mut candidate = format!("{base} (restored){ext}");
    let mut n = 1;
    while children.contains_key(&candidate) {
        n += 1;
        candidate = format!("{base} (restored {n}){ext}");
    }
    candidate
}
