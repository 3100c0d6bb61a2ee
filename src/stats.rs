//! Per-commit change statistics.

use anyhow::{Context, Result};
use gix::diff::blob::intern::InternedInput;
use gix::diff::blob::sink::Counter;
use gix::diff::blob::{Algorithm, diff};
use tracing::debug;

use crate::filetype::is_binary;
use crate::git::{Commit, ObjectGraph, ObjectId};

/// Line counts for a set of changed paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
    pub files_changed: usize,
}

impl DiffStats {
    /// Exchanges insertions and deletions.
    pub fn swapped(self) -> Self {
        Self {
            insertions: self.deletions,
            deletions: self.insertions,
            files_changed: self.files_changed,
        }
    }
}

/// Computes statistics of `commit` against its first parent.
///
/// A root commit is compared with the empty tree so that its whole content
/// counts as inserted. So is a commit whose first parent lies beyond a shallow
/// boundary. Merge commits are only compared with their first parent; changes
/// brought in by other parents are not counted.
pub fn commit_stats<G: ObjectGraph + ?Sized>(graph: &G, commit: &Commit) -> Result<DiffStats> {
    match commit.parents().first() {
        Some(&parent) if graph.contains(parent) => {
            let parent = graph
                .commit(parent)
                .with_context(|| format!("Failed to read parent of {}", commit.id()))?;
            tree_diff(graph, Some(parent.tree()), Some(commit.tree()))
        }
        Some(&parent) => {
            debug!(commit = %commit.id(), %parent, "first parent absent, using empty tree");
            Ok(tree_diff(graph, Some(commit.tree()), None)?.swapped())
        }
        None => Ok(tree_diff(graph, Some(commit.tree()), None)?.swapped()),
    }
}

/// Sums line changes going from tree `old` to tree `new`.
///
/// `None` stands for the empty tree. Binary files and files whose mode alone
/// changed count as changed but add no lines.
pub fn tree_diff<G: ObjectGraph + ?Sized>(
    graph: &G,
    old: Option<ObjectId>,
    new: Option<ObjectId>,
) -> Result<DiffStats> {
    let mut stats = DiffStats::default();

    for change in graph.tree_changes(old, new)? {
        stats.files_changed += 1;
        let before = change.old.map(|side| side.id);
        let after = change.new.map(|side| side.id);
        if before == after {
            continue;
        }

        let (insertions, deletions) = blob_line_counts(graph, before, after)
            .with_context(|| format!("Failed to diff {}", change.path))?;
        stats.insertions += insertions;
        stats.deletions += deletions;
    }

    Ok(stats)
}

fn blob_line_counts<G: ObjectGraph + ?Sized>(
    graph: &G,
    before: Option<ObjectId>,
    after: Option<ObjectId>,
) -> Result<(usize, usize)> {
    let before = read(graph, before)?;
    let after = read(graph, after)?;
    Ok(line_counts(&before, &after))
}

fn read<G: ObjectGraph + ?Sized>(graph: &G, id: Option<ObjectId>) -> Result<Vec<u8>> {
    match id {
        Some(id) => graph.blob(id),
        None => Ok(Vec::new()),
    }
}

/// Lines inserted and removed between two blobs.
pub fn line_counts(before: &[u8], after: &[u8]) -> (usize, usize) {
    if is_binary(before) || is_binary(after) {
        return (0, 0);
    }

    let input = InternedInput::new(before, after);
    let counter = diff(Algorithm::Histogram, &input, Counter::<()>::default());
    (counter.insertions as usize, counter.removals as usize)
}
