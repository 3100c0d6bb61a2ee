//! Read-only access to a repository's object graph.
//!
//! The pipeline only talks to the repository through [`ObjectGraph`], which
//! [`GitRepository`] implements on top of `gix`.

use anyhow::{Context, Result, anyhow};
use gix::bstr::ByteSlice;
use gix::object::tree::diff::Action;
use gix::object::tree::diff::change::Event;
use std::convert::Infallible;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::SiteError;

pub use gix::ObjectId;

/// Commit metadata as read from the object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: ObjectId,
    author_name: String,
    author_email: String,
    time: i64,
    subject: String,
    parents: Vec<ObjectId>,
    tree: ObjectId,
}

impl Commit {
    /// Commit object id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Full commit hash.
    pub fn oid_hex(&self) -> String {
        self.id.to_hex().to_string()
    }

    /// Short commit hash (7 characters).
    pub fn short_oid(&self) -> String {
        self.id.to_hex_with_len(7).to_string()
    }

    /// Author name.
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Author email.
    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    /// Commit timestamp (Unix seconds).
    pub fn time(&self) -> i64 {
        self.time
    }

    /// First line of commit message, trimmed.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Parent ids in recorded order.
    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// Root tree id.
    pub fn tree(&self) -> ObjectId {
        self.tree
    }
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Tree,
    Blob,
    BlobExecutable,
    Link,
    /// Submodule pointer.
    Commit,
}

impl EntryMode {
    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Tree)
    }

    /// Whether the entry carries blob content (regular file or symlink).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            EntryMode::Blob | EntryMode::BlobExecutable | EntryMode::Link
        )
    }

    /// Git mode bits in octal notation.
    pub fn as_octal(&self) -> &'static str {
        match self {
            EntryMode::Tree => "040000",
            EntryMode::Blob => "100644",
            EntryMode::BlobExecutable => "100755",
            EntryMode::Link => "120000",
            EntryMode::Commit => "160000",
        }
    }
}

impl From<gix::objs::tree::EntryMode> for EntryMode {
    fn from(mode: gix::objs::tree::EntryMode) -> Self {
        if mode.is_tree() {
            EntryMode::Tree
        } else if mode.is_commit() {
            EntryMode::Commit
        } else if mode.is_link() {
            EntryMode::Link
        } else if mode.is_executable() {
            EntryMode::BlobExecutable
        } else {
            EntryMode::Blob
        }
    }
}

/// Direct child of a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    name: String,
    mode: EntryMode,
    id: ObjectId,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, mode: EntryMode, id: ObjectId) -> Self {
        Self {
            name: name.into(),
            mode,
            id,
        }
    }

    /// Entry name within its parent tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Id of the subtree or blob.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

/// Mode and id of one side of a [`TreeChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryState {
    pub mode: EntryMode,
    pub id: ObjectId,
}

impl EntryState {
    fn leaf(mode: EntryMode, id: ObjectId) -> Option<Self> {
        mode.is_leaf().then_some(Self { mode, id })
    }
}

/// A file that differs between two trees.
///
/// `old` is `None` for additions and `new` is `None` for deletions. Both are
/// set for content and mode changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub path: String,
    pub old: Option<EntryState>,
    pub new: Option<EntryState>,
}

impl TreeChange {
    /// Builds a change from raw sides, keeping only file entries.
    ///
    /// Returns `None` when neither side is a file, e.g. for subtrees and
    /// submodules.
    pub fn between(
        path: impl Into<String>,
        old: Option<(EntryMode, ObjectId)>,
        new: Option<(EntryMode, ObjectId)>,
    ) -> Option<Self> {
        let old = old.and_then(|(mode, id)| EntryState::leaf(mode, id));
        let new = new.and_then(|(mode, id)| EntryState::leaf(mode, id));
        if old.is_none() && new.is_none() {
            return None;
        }
        Some(Self {
            path: path.into(),
            old,
            new,
        })
    }
}

/// Object kind, with the target of annotated tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag { target: ObjectId },
}

/// Reference namespaces enumerated by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Tags,
    RemoteBranches,
}

impl Namespace {
    /// Full reference name prefix, with trailing slash.
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::Tags => "refs/tags/",
            Namespace::RemoteBranches => "refs/remotes/",
        }
    }
}

/// Raw reference as stored: full name plus direct target.
///
/// `target` is `None` for symbolic references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord {
    pub name: String,
    pub target: Option<ObjectId>,
}

/// Read-only view of a repository object graph.
pub trait ObjectGraph {
    /// Commit currently pointed to by HEAD.
    fn head(&self) -> Result<ObjectId>;

    /// Resolves a hex object id or reference name to the object it names,
    /// peeling annotated tags.
    fn resolve(&self, spec: &str) -> Result<ObjectId>;

    /// Whether the object store holds `id`.
    ///
    /// Parents beyond the boundary of a shallow clone are referenced by
    /// commits but absent from the store.
    fn contains(&self, id: ObjectId) -> bool;

    fn commit(&self, id: ObjectId) -> Result<Commit>;

    /// Direct children of a tree in stored order.
    fn tree(&self, id: ObjectId) -> Result<Vec<TreeEntry>>;

    fn blob(&self, id: ObjectId) -> Result<Vec<u8>>;

    fn kind(&self, id: ObjectId) -> Result<ObjectKind>;

    /// All references under a namespace.
    fn references(&self, namespace: Namespace) -> Result<Vec<RefRecord>>;

    /// Files that differ from tree `old` to tree `new`, without rename
    /// detection. `None` stands for the empty tree.
    fn tree_changes(&self, old: Option<ObjectId>, new: Option<ObjectId>)
    -> Result<Vec<TreeChange>>;
}

/// Repository on disk opened through `gix`.
pub struct GitRepository {
    repo: gix::Repository,
}

impl GitRepository {
    /// Opens the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::RepositoryOpen`] if the path is missing or not a
    /// git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = gix::open(path).map_err(|source| SiteError::RepositoryOpen {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        debug!(path = %path.display(), "opened repository");

        Ok(Self { repo })
    }

    fn find(&self, id: ObjectId) -> Result<gix::Object<'_>> {
        self.repo
            .find_object(id)
            .with_context(|| format!("Failed to find object {}", id))
    }

    fn tree_or_empty(&self, id: Option<ObjectId>) -> Result<gix::Tree<'_>> {
        match id {
            Some(id) => self
                .find(id)?
                .try_into_tree()
                .map_err(|_| anyhow!("Object {} is not a tree", id)),
            None => Ok(self.repo.empty_tree()),
        }
    }
}

type Side = Option<(EntryMode, ObjectId)>;

fn sides(event: Event<'_, '_, '_>) -> (Side, Side) {
    match event {
        Event::Addition { entry_mode, id } => (None, Some((entry_mode.into(), id.detach()))),
        Event::Deletion { entry_mode, id } => (Some((entry_mode.into(), id.detach())), None),
        Event::Modification {
            previous_entry_mode,
            previous_id,
            entry_mode,
            id,
        } => (
            Some((previous_entry_mode.into(), previous_id.detach())),
            Some((entry_mode.into(), id.detach())),
        ),
        Event::Rewrite {
            source_entry_mode,
            source_id,
            entry_mode,
            id,
            ..
        } => (
            Some((source_entry_mode.into(), source_id.detach())),
            Some((entry_mode.into(), id.detach())),
        ),
    }
}

impl ObjectGraph for GitRepository {
    fn head(&self) -> Result<ObjectId> {
        let commit = self
            .repo
            .head_commit()
            .map_err(|e| SiteError::ReferenceResolution {
                spec: "HEAD".to_string(),
                reason: e.to_string(),
            })?;
        Ok(commit.id)
    }

    fn resolve(&self, spec: &str) -> Result<ObjectId> {
        if let Ok(id) = ObjectId::from_hex(spec.as_bytes())
            && self.repo.find_object(id).is_ok()
        {
            return Ok(id);
        }

        let mut reference =
            self.repo
                .find_reference(spec)
                .map_err(|e| SiteError::ReferenceResolution {
                    spec: spec.to_string(),
                    reason: e.to_string(),
                })?;
        let id = reference
            .peel_to_id_in_place()
            .map_err(|e| SiteError::ReferenceResolution {
                spec: spec.to_string(),
                reason: e.to_string(),
            })?;

        Ok(id.detach())
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.repo.has_object(id)
    }

    fn commit(&self, id: ObjectId) -> Result<Commit> {
        let commit = self
            .find(id)?
            .try_into_commit()
            .map_err(|_| anyhow!("Object {} is not a commit", id))?;

        let author = commit.author().context("Failed to read author")?;
        let time = commit.time().context("Failed to read commit time")?;
        let message = commit
            .message_raw()
            .context("Failed to read commit message")?
            .to_str_lossy()
            .into_owned();
        let subject = message.lines().next().unwrap_or("").trim().to_string();
        let tree = commit.tree_id().context("Failed to read commit tree")?;

        Ok(Commit {
            id,
            author_name: author.name.to_str_lossy().into_owned(),
            author_email: author.email.to_str_lossy().into_owned(),
            time: time.seconds,
            subject,
            parents: commit.parent_ids().map(|p| p.detach()).collect(),
            tree: tree.detach(),
        })
    }

    fn tree(&self, id: ObjectId) -> Result<Vec<TreeEntry>> {
        let tree = self
            .find(id)?
            .try_into_tree()
            .map_err(|_| anyhow!("Object {} is not a tree", id))?;
        let decoded = tree
            .decode()
            .with_context(|| format!("Failed to decode tree {}", id))?;

        Ok(decoded
            .entries
            .iter()
            .map(|entry| TreeEntry {
                name: entry.filename.to_str_lossy().into_owned(),
                mode: EntryMode::from(entry.mode),
                id: entry.oid.to_owned(),
            })
            .collect())
    }

    fn blob(&self, id: ObjectId) -> Result<Vec<u8>> {
        let blob = self
            .find(id)?
            .try_into_blob()
            .map_err(|_| anyhow!("Object {} is not a blob", id))?;
        Ok(blob.data.to_vec())
    }

    fn kind(&self, id: ObjectId) -> Result<ObjectKind> {
        let object = self.find(id)?;
        let kind = object.kind;
        Ok(match kind {
            gix::objs::Kind::Commit => ObjectKind::Commit,
            gix::objs::Kind::Tree => ObjectKind::Tree,
            gix::objs::Kind::Blob => ObjectKind::Blob,
            gix::objs::Kind::Tag => {
                let tag = object
                    .try_into_tag()
                    .map_err(|_| anyhow!("Object {} is not a tag", id))?;
                let target = tag
                    .target_id()
                    .with_context(|| format!("Failed to read target of tag {}", id))?;
                ObjectKind::Tag {
                    target: target.detach(),
                }
            }
        })
    }

    fn references(&self, namespace: Namespace) -> Result<Vec<RefRecord>> {
        let platform = self
            .repo
            .references()
            .context("Failed to read references")?;
        let iter = match namespace {
            Namespace::Tags => platform.tags(),
            Namespace::RemoteBranches => platform.remote_branches(),
        }
        .with_context(|| format!("Failed to iterate {}", namespace.prefix()))?;

        let mut records = Vec::new();
        for reference in iter {
            let reference = match reference {
                Ok(reference) => reference,
                Err(error) => {
                    warn!(%error, namespace = namespace.prefix(), "skipping unreadable reference");
                    continue;
                }
            };
            records.push(RefRecord {
                name: reference.name().as_bstr().to_str_lossy().into_owned(),
                target: reference.target().try_id().map(|id| id.to_owned()),
            });
        }

        Ok(records)
    }

    fn tree_changes(
        &self,
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    ) -> Result<Vec<TreeChange>> {
        let old_tree = self.tree_or_empty(old)?;
        let new_tree = self.tree_or_empty(new)?;
        let mut changes = Vec::new();

        old_tree
            .changes()
            .context("Failed to prepare tree diff")?
            .track_path()
            .track_rewrites(None)
            .for_each_to_obtain_tree(&new_tree, |change| {
                let path = change.location.to_str_lossy().into_owned();
                let (before, after) = sides(change.event);
                changes.extend(TreeChange::between(path, before, after));
                Ok::<_, Infallible>(Action::Continue)
            })
            .with_context(|| {
                format!("Failed to diff tree {} against {}", old_tree.id, new_tree.id)
            })?;

        Ok(changes)
    }
}

#[cfg(test)]
impl Commit {
    /// Creates a commit record without reading a repository.
    pub(crate) fn new_for_test(
        id: ObjectId,
        time: i64,
        subject: &str,
        parents: Vec<ObjectId>,
        tree: ObjectId,
    ) -> Self {
        Self {
            id,
            author_name: "Test User".to_string(),
            author_email: "test@example.com".to_string(),
            time,
            subject: subject.to_string(),
            parents,
            tree,
        }
    }
}
