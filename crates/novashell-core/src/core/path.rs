//! Path resolution over the file tree.
//!
//! # Path Convention
//!
//! - Paths are absolute and `/`-delimited: `"/home/notes.txt"`
//! - Empty segments are ignored, so `"/a//b"` is `"/a/b"`
//! - `"/"` and `""` both name the root folder
//! - No `.`/`..` handling; such names are ordinary components

use crate::core::error::VfsError;
use crate::models::Node;

/// Iterate over the non-empty components of a path.
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Canonical form of a path: `"/"` or `"/a/b"`.
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = components(path).collect();
    format!("/{}", parts.join("/"))
}

/// Append a child name to a folder path.
pub fn join(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Split a path into its parent path and leaf name.
///
/// The root has no parent; callers must handle `"/"` themselves.
pub fn split_parent(path: &str) -> Result<(String, String), VfsError> {
    let mut parts: Vec<&str> = components(path).collect();
    let leaf = parts.pop().ok_or(VfsError::RootHasNoParent)?;
    Ok((format!("/{}", parts.join("/")), leaf.to_string()))
}

/// Check that `name` can be used as a single path component.
pub fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name.contains('/') {
        return Err(VfsError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Resolve a path, distinguishing a file in the middle of the path.
///
/// Fails with [`VfsError::NotAFolder`] naming the offending prefix when a
/// component would have to descend into a file, and [`VfsError::NotFound`]
/// when a component is missing.
pub fn resolve_strict<'a>(root: &'a Node, path: &str) -> Result<&'a Node, VfsError> {
    let mut current = root;
    let mut walked = String::new();

    for part in components(path) {
        let children = current.children().ok_or_else(|| VfsError::NotAFolder {
            path: normalize(&walked),
        })?;
        walked.push('/');
        walked.push_str(part);
        current = children.get(part).ok_or_else(|| VfsError::NotFound {
            path: normalize(path),
        })?;
    }

    Ok(current)
}

/// Resolve a path to a node.
///
/// Descending into a file is reported as [`VfsError::NotFound`] for the whole
/// path, which is what callers act on.
pub fn resolve<'a>(root: &'a Node, path: &str) -> Result<&'a Node, VfsError> {
    resolve_strict(root, path).map_err(|err| match err {
        VfsError::NotAFolder { .. } => VfsError::NotFound {
            path: normalize(path),
        },
        other => other,
    })
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Node, path: &str) -> Result<&'a mut Node, VfsError> {
    let mut current = root;

    for part in components(path) {
        let not_found = || VfsError::NotFound {
            path: normalize(path),
        };
        current = current
            .children_mut()
            .ok_or_else(not_found)?
            .get_mut(part)
            .ok_or_else(not_found)?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    fn sample_tree() -> Node {
        Node::folder_with([
            (
                "home",
                Node::folder_with([
                    ("notes.txt", Node::file("notes")),
                    ("docs", Node::folder()),
                ]),
            ),
            ("readme", Node::file("top")),
        ])
    }

    // =========================================================================
    // Resolution Tests
    // =========================================================================

    #[test]
    fn test_resolve_root() {
        let tree = sample_tree();
        assert!(std::ptr::eq(resolve(&tree, "/").unwrap(), &tree));
        assert!(std::ptr::eq(resolve(&tree, "").unwrap(), &tree));
        assert!(std::ptr::eq(resolve(&tree, "///").unwrap(), &tree));
    }

    #[test]
    fn test_resolve_nested() {
        let tree = sample_tree();
        assert_eq!(resolve(&tree, "/home/notes.txt").unwrap().content(), Some("notes"));
        assert_eq!(resolve(&tree, "/home/docs").unwrap().kind(), NodeKind::Folder);
    }

    #[test]
    fn test_resolve_ignores_empty_segments() {
        let tree = sample_tree();
        let a = resolve(&tree, "/home//notes.txt").unwrap();
        let b = resolve(&tree, "home/notes.txt/").unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_resolve_missing() {
        let tree = sample_tree();
        assert_eq!(
            resolve(&tree, "/home/missing"),
            Err(VfsError::NotFound {
                path: "/home/missing".to_string()
            })
        );
        assert!(resolve(&tree, "/nope/notes.txt").is_err());
    }

    #[test]
    fn test_resolve_through_file_is_not_found() {
        let tree = sample_tree();
        assert_eq!(
            resolve(&tree, "/readme/child"),
            Err(VfsError::NotFound {
                path: "/readme/child".to_string()
            })
        );
        assert_eq!(
            resolve_strict(&tree, "/readme/child"),
            Err(VfsError::NotAFolder {
                path: "/readme".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_mut_edits_live_tree() {
        let mut tree = sample_tree();
        if let Node::File { content } = resolve_mut(&mut tree, "/home/notes.txt").unwrap() {
            content.push_str(" updated");
        }
        assert_eq!(
            resolve(&tree, "/home/notes.txt").unwrap().content(),
            Some("notes updated")
        );
        assert!(resolve_mut(&mut tree, "/readme/x").is_err());
    }

    // =========================================================================
    // Path Helper Tests
    // =========================================================================

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("home//user/"), "/home/user");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "home"), "/home");
        assert_eq!(join("/home", "a.txt"), "/home/a.txt");
        assert_eq!(join("/home/", "a.txt"), "/home/a.txt");
    }

    #[test]
    fn test_split_parent() {
        assert_eq!(
            split_parent("/home/notes.txt").unwrap(),
            ("/home".to_string(), "notes.txt".to_string())
        );
        assert_eq!(
            split_parent("/home").unwrap(),
            ("/".to_string(), "home".to_string())
        );
        assert_eq!(split_parent("/"), Err(VfsError::RootHasNoParent));
        assert_eq!(split_parent(""), Err(VfsError::RootHasNoParent));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("notes.txt").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a/b").is_err());
    }
}
