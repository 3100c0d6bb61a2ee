//! Tag and remote branch resolution.

use anyhow::Result;
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::git::{Commit, Namespace, ObjectGraph, ObjectId, ObjectKind, RefRecord};

/// Maximum chain of annotated tags followed before giving up.
const MAX_TAG_CHAIN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Tag,
    RemoteBranch,
}

/// Reference resolved to the commit it designates.
#[derive(Debug, Clone)]
pub struct Reference {
    kind: RefKind,
    name: String,
    full_name: String,
    commit: Commit,
}

impl Reference {
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// Display name: tag shorthand, or branch name without its remote.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full reference name, e.g. `refs/remotes/origin/main`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn commit(&self) -> &Commit {
        &self.commit
    }
}

/// Lists tags that ultimately point at a commit.
///
/// Both lightweight and annotated tags resolve to their commit. Tags of
/// trees or blobs are skipped.
pub fn list_tags<G: ObjectGraph + ?Sized>(graph: &G) -> Result<Vec<Reference>> {
    list(graph, Namespace::Tags, RefKind::Tag)
}

/// Lists remote-tracking branches, named without their remote.
///
/// Symbolic entries such as `origin/HEAD` are skipped.
pub fn list_remote_branches<G: ObjectGraph + ?Sized>(graph: &G) -> Result<Vec<Reference>> {
    list(graph, Namespace::RemoteBranches, RefKind::RemoteBranch)
}

fn list<G: ObjectGraph + ?Sized>(
    graph: &G,
    namespace: Namespace,
    kind: RefKind,
) -> Result<Vec<Reference>> {
    let records = graph.references(namespace)?;
    let mut refs = Vec::with_capacity(records.len());

    for record in records {
        let Some(commit) = resolve_record(graph, &record) else {
            continue;
        };
        let short = record
            .name
            .strip_prefix(namespace.prefix())
            .unwrap_or(&record.name);
        let name = match kind {
            RefKind::Tag => short.to_string(),
            RefKind::RemoteBranch => strip_remote(short).to_string(),
        };
        refs.push(Reference {
            kind,
            name,
            full_name: record.name,
            commit,
        });
    }

    debug!(namespace = namespace.prefix(), count = refs.len(), "resolved references");
    Ok(refs)
}

/// Dereferences a reference to its commit, if it designates one.
fn resolve_record<G: ObjectGraph + ?Sized>(graph: &G, record: &RefRecord) -> Option<Commit> {
    let Some(mut id) = record.target else {
        debug!(reference = %record.name, "skipping symbolic reference");
        return None;
    };

    for _ in 0..=MAX_TAG_CHAIN {
        match graph.kind(id) {
            Ok(ObjectKind::Commit) => return load(graph, record, id),
            Ok(ObjectKind::Tag { target }) => id = target,
            Ok(other) => {
                debug!(reference = %record.name, kind = ?other, "skipping non-commit reference");
                return None;
            }
            Err(error) => {
                warn!(
                    reference = %record.name,
                    error = %format!("{:#}", error),
                    "skipping dangling reference"
                );
                return None;
            }
        }
    }

    warn!(reference = %record.name, "skipping reference with too many nested tags");
    None
}

fn load<G: ObjectGraph + ?Sized>(graph: &G, record: &RefRecord, id: ObjectId) -> Option<Commit> {
    match graph.commit(id) {
        Ok(commit) => Some(commit),
        Err(error) => {
            warn!(
                reference = %record.name,
                error = %format!("{:#}", error),
                "skipping unreadable commit"
            );
            None
        }
    }
}

/// Drops the first path component (the remote name).
fn strip_remote(short: &str) -> &str {
    short.split_once('/').map_or(short, |(_, rest)| rest)
}

/// Display ordering: newest commit first, then by name.
pub fn display_order(a: &Reference, b: &Reference) -> Ordering {
    b.commit
        .time()
        .cmp(&a.commit.time())
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::EntryMode;
    use crate::testing::MemoryGraph;

    fn graph_with_commit() -> (MemoryGraph, ObjectId) {
        let mut graph = MemoryGraph::new();
        let tree = graph.add_tree(&[]);
        let commit = graph.add_commit(&[], tree, 1000, "release");
        (graph, commit)
    }

    #[test]
    fn test_lightweight_and_annotated_tags_converge() {
        // Arrange
        let (mut graph, commit) = graph_with_commit();
        let annotated = graph.add_tag(commit);
        graph.add_ref("refs/tags/light", Some(commit));
        graph.add_ref("refs/tags/heavy", Some(annotated));

        // Act
        let tags = list_tags(&graph).expect("Should list tags");

        // Assert
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|t| t.commit().id() == commit));
        assert!(tags.iter().all(|t| t.kind() == RefKind::Tag));
        let names: Vec<&str> = tags.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["light", "heavy"]);
    }

    #[test]
    fn test_tag_of_tag_resolves() {
        // Arrange
        let (mut graph, commit) = graph_with_commit();
        let inner = graph.add_tag(commit);
        let outer = graph.add_tag(inner);
        graph.add_ref("refs/tags/nested", Some(outer));

        // Act
        let tags = list_tags(&graph).expect("Should list tags");

        // Assert
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].commit().id(), commit);
    }

    #[test]
    fn test_non_commit_tags_excluded() {
        // Arrange
        let (mut graph, commit) = graph_with_commit();
        let blob = graph.add_blob(b"key material");
        let tree = graph.add_tree(&[("key", EntryMode::Blob, blob)]);
        let tree_tag = graph.add_tag(tree);
        graph.add_ref("refs/tags/v1", Some(commit));
        graph.add_ref("refs/tags/blob", Some(blob));
        graph.add_ref("refs/tags/tree", Some(tree_tag));

        // Act
        let tags = list_tags(&graph).expect("Should list tags");

        // Assert
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name(), "v1");
    }

    #[test]
    fn test_dangling_reference_excluded() {
        // Arrange
        let (mut graph, commit) = graph_with_commit();
        let missing = ObjectId::from_hex(b"ffffffffffffffffffffffffffffffffffffffff")
            .expect("Should parse hex id");
        graph.add_ref("refs/tags/gone", Some(missing));
        graph.add_ref("refs/tags/here", Some(commit));

        // Act
        let tags = list_tags(&graph).expect("Dangling tags are not fatal");

        // Assert
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name(), "here");
    }

    #[test]
    fn test_remote_branch_names_drop_remote() {
        // Arrange
        let (mut graph, commit) = graph_with_commit();
        graph.add_ref("refs/remotes/origin/main", Some(commit));
        graph.add_ref("refs/remotes/upstream/feature/login", Some(commit));
        graph.add_ref("refs/remotes/origin/HEAD", None);
        graph.add_ref("refs/tags/v1", Some(commit));

        // Act
        let branches = list_remote_branches(&graph).expect("Should list branches");

        // Assert
        let names: Vec<&str> = branches.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["main", "feature/login"]);
        assert_eq!(branches[1].full_name(), "refs/remotes/upstream/feature/login");
        assert!(branches.iter().all(|b| b.kind() == RefKind::RemoteBranch));
    }

    #[test]
    fn test_display_order() {
        // Arrange
        let mut graph = MemoryGraph::new();
        let tree = graph.add_tree(&[]);
        let old = graph.add_commit(&[], tree, 100, "old");
        let new = graph.add_commit(&[old], tree, 200, "new");
        graph.add_ref("refs/tags/b-old", Some(old));
        graph.add_ref("refs/tags/z-new", Some(new));
        graph.add_ref("refs/tags/a-new", Some(new));
        let mut tags = list_tags(&graph).expect("Should list tags");

        // Act
        tags.sort_by(display_order);

        // Assert
        let names: Vec<&str> = tags.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a-new", "z-new", "b-old"]);
    }

    #[test]
    fn test_strip_remote() {
        assert_eq!(strip_remote("origin/main"), "main");
        assert_eq!(strip_remote("origin/fix/bug"), "fix/bug");
        assert_eq!(strip_remote("lonely"), "lonely");
    }
}
