//! Commit history traversal.
//!
//! [`CommitWalk`] yields every commit reachable from a starting point with
//! ancestors before descendants. Commits are loaded on demand as the walk
//! advances, so a caller that stops early never reads the rest of history.
//! Parents missing from the object store, as in shallow clones, end the walk
//! along that line.

use anyhow::Result;
use std::collections::HashSet;
use tracing::debug;

use crate::error::SiteError;
use crate::git::{Commit, ObjectGraph, ObjectId, ObjectKind};

enum Visit {
    Enter(ObjectId),
    Leave(Commit),
}

/// Lazy topological commit iterator.
pub struct CommitWalk<'g, G: ObjectGraph + ?Sized> {
    graph: &'g G,
    stack: Vec<Visit>,
    seen: HashSet<ObjectId>,
}

impl<'g, G: ObjectGraph + ?Sized> CommitWalk<'g, G> {
    /// Starts a walk at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::ReferenceResolution`] if `start` is not a commit.
    pub fn new(graph: &'g G, start: ObjectId) -> Result<Self> {
        let kind = graph
            .kind(start)
            .map_err(|e| SiteError::ReferenceResolution {
                spec: start.to_string(),
                reason: format!("{:#}", e),
            })?;
        if kind != ObjectKind::Commit {
            return Err(SiteError::ReferenceResolution {
                spec: start.to_string(),
                reason: format!("object is a {:?}, not a commit", kind),
            }
            .into());
        }

        Ok(Self {
            graph,
            stack: vec![Visit::Enter(start)],
            seen: HashSet::new(),
        })
    }

    /// Starts a walk at `rev`, or at HEAD when `rev` is `None`.
    pub fn from_rev(graph: &'g G, rev: Option<&str>) -> Result<Self> {
        let start = resolve_start(graph, rev)?;
        Self::new(graph, start)
    }
}

impl<G: ObjectGraph + ?Sized> Iterator for CommitWalk<'_, G> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(visit) = self.stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    if !self.seen.insert(id) {
                        continue;
                    }
                    let commit = match self.graph.commit(id) {
                        Ok(commit) => commit,
                        Err(error) => {
                            self.stack.clear();
                            return Some(Err(error));
                        }
                    };
                    let parents = commit.parents().to_vec();
                    self.stack.push(Visit::Leave(commit));
                    // First parent is popped first.
                    for parent in parents.into_iter().rev() {
                        if self.seen.contains(&parent) {
                            continue;
                        }
                        if !self.graph.contains(parent) {
                            debug!(commit = %id, %parent, "parent beyond shallow boundary");
                            continue;
                        }
                        self.stack.push(Visit::Enter(parent));
                    }
                }
                Visit::Leave(commit) => return Some(Ok(commit)),
            }
        }
        None
    }
}

/// Resolves the walk's starting commit id.
///
/// # Errors
///
/// Returns [`SiteError::ReferenceResolution`] if the revision or HEAD cannot
/// be resolved.
pub fn resolve_start<G: ObjectGraph + ?Sized>(graph: &G, rev: Option<&str>) -> Result<ObjectId> {
    match rev {
        Some(spec) => graph.resolve(spec),
        None => graph.head(),
    }
}

/// Orders walked commits newest first.
///
/// Commits sharing a timestamp come out in reverse walk order, so a child
/// is listed before its parent even when both were committed within the same
/// second.
pub fn sort_for_display(mut commits: Vec<Commit>) -> Vec<Commit> {
    commits.sort_by_key(|commit| commit.time());
    commits.reverse();
    commits
}
