//! Tree flattening into path-indexed file lists.

use anyhow::Result;
use tracing::debug;

use crate::error::SiteError;
use crate::git::{ObjectGraph, ObjectId, TreeEntry};

/// Deepest directory nesting accepted before flattening fails.
///
/// Tree depth is controlled by repository content, so traversal uses an
/// explicit stack and this bound instead of native recursion.
pub const MAX_TREE_DEPTH: usize = 1024;

/// Leaf tree entry with its full path from the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileEntry {
    path: String,
    entry: TreeEntry,
}

impl FlatFileEntry {
    /// Slash-separated path relative to the tree root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entry(&self) -> &TreeEntry {
        &self.entry
    }
}

/// Flattens the tree `root` into its leaves.
///
/// Every blob and symlink reachable from `root` appears exactly once.
/// Submodule entries are not leaves and are omitted. Output follows
/// traversal order; sort by [`FlatFileEntry::path`] for presentation.
///
/// # Errors
///
/// Returns error if a tree cannot be read, or [`SiteError::TreeTooDeep`]
/// when nesting exceeds [`MAX_TREE_DEPTH`].
pub fn flatten<G: ObjectGraph + ?Sized>(graph: &G, root: ObjectId) -> Result<Vec<FlatFileEntry>> {
    let mut files = Vec::new();
    let mut stack: Vec<(String, ObjectId, usize)> = vec![(String::new(), root, 0)];

    while let Some((prefix, id, depth)) = stack.pop() {
        for entry in graph.tree(id)? {
            let path = if prefix.is_empty() {
                entry.name().to_string()
            } else {
                format!("{}/{}", prefix, entry.name())
            };

            if entry.mode().is_tree() {
                if depth + 1 > MAX_TREE_DEPTH {
                    return Err(SiteError::TreeTooDeep {
                        path,
                        max: MAX_TREE_DEPTH,
                    }
                    .into());
                }
                stack.push((path, entry.id(), depth + 1));
            } else if entry.mode().is_leaf() {
                files.push(FlatFileEntry { path, entry });
            } else {
                debug!(%path, "skipping submodule entry");
            }
        }
    }

    Ok(files)
}

/// Flattens `root` and orders the result lexicographically by path.
pub fn flatten_sorted<G: ObjectGraph + ?Sized>(
    graph: &G,
    root: ObjectId,
) -> Result<Vec<FlatFileEntry>> {
    let mut files = flatten(graph, root)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
