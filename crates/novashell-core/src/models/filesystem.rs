use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Node Kind
// =============================================================================

/// Discriminant of a [`Node`], stored as `"file"` / `"folder"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// An entry in the virtual file store.
///
/// Folders own their children outright; there are no parent pointers; a node
/// is located by walking names down from the root.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File {
        #[serde(default)]
        content: String,
    },
    Folder {
        #[serde(default)]
        children: BTreeMap<String, Node>,
    },
}

impl Node {
    /// Create a file with the given text content.
    pub fn file(content: impl Into<String>) -> Self {
        Node::File {
            content: content.into(),
        }
    }

    /// Create an empty folder.
    pub fn folder() -> Self {
        Node::Folder {
            children: BTreeMap::new(),
        }
    }

    /// Create a folder from `(name, node)` pairs.
    pub fn folder_with<K: Into<String>>(children: impl IntoIterator<Item = (K, Node)>) -> Self {
        Node::Folder {
            children: children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        }
    }

    /// Create an empty node of the given kind.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => Node::file(""),
            NodeKind::Folder => Node::folder(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File { .. } => NodeKind::File,
            Node::Folder { .. } => NodeKind::Folder,
        }
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder { .. })
    }

    /// Get the children (folders only).
    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Folder { children } => Some(children),
            Node::File { .. } => None,
        }
    }

    /// Get the children mutably (folders only).
    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Node::Folder { children } => Some(children),
            Node::File { .. } => None,
        }
    }

    /// Get the text content (files only).
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::File { content } => Some(content),
            Node::Folder { .. } => None,
        }
    }

    /// Size in bytes.
    ///
    /// Files count the UTF-8 encoded length of their content, folders the sum
    /// of their children. Computed on every call so it always matches the
    /// current tree.
    pub fn size(&self) -> u64 {
        match self {
            Node::File { content } => content.len() as u64,
            Node::Folder { children } => children.values().map(Node::size).sum(),
        }
    }
}

// =============================================================================
// Snapshot Format
// =============================================================================

/// Serialized form of the whole tree: the root folder keyed by `"/"`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeSnapshot {
    #[serde(rename = "/")]
    pub root: Node,
}
