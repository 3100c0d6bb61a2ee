//! In-memory object graph for unit tests.

use anyhow::{Result, anyhow, bail};
use std::collections::{BTreeMap, HashMap};

use crate::error::SiteError;
use crate::git::{
    Commit, EntryMode, Namespace, ObjectGraph, ObjectId, ObjectKind, RefRecord, TreeChange,
    TreeEntry,
};

enum Stored {
    Commit(Commit),
    Tree(Vec<TreeEntry>),
    Blob(Vec<u8>),
    Tag(ObjectId),
}

#[derive(Default)]
pub(crate) struct MemoryGraph {
    objects: HashMap<ObjectId, Stored>,
    refs: Vec<RefRecord>,
    head: Option<ObjectId>,
    next: u32,
}

impl MemoryGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ObjectId {
        self.next += 1;
        ObjectId::from_hex(format!("{:040x}", self.next).as_bytes()).expect("valid hex id")
    }

    pub(crate) fn add_blob(&mut self, content: &[u8]) -> ObjectId {
        let id = self.next_id();
        self.objects.insert(id, Stored::Blob(content.to_vec()));
        id
    }

    pub(crate) fn add_tree(&mut self, entries: &[(&str, EntryMode, ObjectId)]) -> ObjectId {
        let id = self.next_id();
        let entries = entries
            .iter()
            .map(|(name, mode, oid)| TreeEntry::new(*name, *mode, *oid))
            .collect();
        self.objects.insert(id, Stored::Tree(entries));
        id
    }

    /// Adds a tree holding the given files at its top level.
    pub(crate) fn add_flat_tree(&mut self, files: &[(&str, &str)]) -> ObjectId {
        let entries: Vec<(&str, EntryMode, ObjectId)> = files
            .iter()
            .map(|(name, content)| (*name, EntryMode::Blob, self.add_blob(content.as_bytes())))
            .collect();
        self.add_tree(&entries)
    }

    pub(crate) fn add_commit(
        &mut self,
        parents: &[ObjectId],
        tree: ObjectId,
        time: i64,
        subject: &str,
    ) -> ObjectId {
        let id = self.next_id();
        let commit = Commit::new_for_test(id, time, subject, parents.to_vec(), tree);
        self.objects.insert(id, Stored::Commit(commit));
        id
    }

    pub(crate) fn add_tag(&mut self, target: ObjectId) -> ObjectId {
        let id = self.next_id();
        self.objects.insert(id, Stored::Tag(target));
        id
    }

    pub(crate) fn add_ref(&mut self, name: &str, target: Option<ObjectId>) {
        self.refs.push(RefRecord {
            name: name.to_string(),
            target,
        });
    }

    pub(crate) fn set_head(&mut self, id: ObjectId) {
        self.head = Some(id);
    }

    fn get(&self, id: ObjectId) -> Result<&Stored> {
        self.objects
            .get(&id)
            .ok_or_else(|| anyhow!("Failed to find object {}", id))
    }

    fn entries(&self, id: Option<ObjectId>) -> Result<BTreeMap<String, (EntryMode, ObjectId)>> {
        let Some(id) = id else {
            return Ok(BTreeMap::new());
        };
        Ok(self
            .tree(id)?
            .into_iter()
            .map(|e| (e.name().to_string(), (e.mode(), e.id())))
            .collect())
    }

    /// Recursive tree comparison that skips subtrees with equal ids.
    fn diff_into(
        &self,
        prefix: &str,
        old: Option<ObjectId>,
        new: Option<ObjectId>,
        out: &mut Vec<TreeChange>,
    ) -> Result<()> {
        let old = self.entries(old)?;
        let new = self.entries(new)?;
        let added = new.keys().filter(|name| !old.contains_key(*name));
        let names: Vec<&String> = old.keys().chain(added).collect();

        for name in names {
            let before = old.get(name).copied();
            let after = new.get(name).copied();
            if before == after {
                continue;
            }
            let path = format!("{}{}", prefix, name);
            let subtree = |side: Option<(EntryMode, ObjectId)>| {
                side.filter(|(mode, _)| mode.is_tree()).map(|(_, id)| id)
            };
            let (old_tree, new_tree) = (subtree(before), subtree(after));
            if old_tree.is_some() || new_tree.is_some() {
                self.diff_into(&format!("{}/", path), old_tree, new_tree, out)?;
            }
            out.extend(TreeChange::between(path, before, after));
        }
        Ok(())
    }
}

impl ObjectGraph for MemoryGraph {
    fn head(&self) -> Result<ObjectId> {
        self.head.ok_or_else(|| {
            SiteError::ReferenceResolution {
                spec: "HEAD".to_string(),
                reason: "unborn".to_string(),
            }
            .into()
        })
    }

    fn resolve(&self, spec: &str) -> Result<ObjectId> {
        if let Ok(id) = ObjectId::from_hex(spec.as_bytes())
            && self.objects.contains_key(&id)
        {
            return Ok(id);
        }
        let record = self
            .refs
            .iter()
            .find(|r| r.name == spec || r.name.ends_with(&format!("/{}", spec)))
            .ok_or_else(|| SiteError::ReferenceResolution {
                spec: spec.to_string(),
                reason: "not found".to_string(),
            })?;
        let mut id = record.target.ok_or_else(|| anyhow!("symbolic reference"))?;
        while let Stored::Tag(target) = self.get(id)? {
            id = *target;
        }
        Ok(id)
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    fn commit(&self, id: ObjectId) -> Result<Commit> {
        match self.get(id)? {
            Stored::Commit(commit) => Ok(commit.clone()),
            _ => bail!("Object {} is not a commit", id),
        }
    }

    fn tree(&self, id: ObjectId) -> Result<Vec<TreeEntry>> {
        match self.get(id)? {
            Stored::Tree(entries) => Ok(entries.clone()),
            _ => bail!("Object {} is not a tree", id),
        }
    }

    fn blob(&self, id: ObjectId) -> Result<Vec<u8>> {
        match self.get(id)? {
            Stored::Blob(content) => Ok(content.clone()),
            _ => bail!("Object {} is not a blob", id),
        }
    }

    fn kind(&self, id: ObjectId) -> Result<ObjectKind> {
        Ok(match self.get(id)? {
            Stored::Commit(_) => ObjectKind::Commit,
            Stored::Tree(_) => ObjectKind::Tree,
            Stored::Blob(_) => ObjectKind::Blob,
            Stored::Tag(target) => ObjectKind::Tag { target: *target },
        })
    }

    fn references(&self, namespace: Namespace) -> Result<Vec<RefRecord>> {
        Ok(self
            .refs
            .iter()
            .filter(|r| r.name.starts_with(namespace.prefix()))
            .cloned()
            .collect())
    }

    fn tree_changes(
        &self,
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    ) -> Result<Vec<TreeChange>> {
        let mut changes = Vec::new();
        self.diff_into("", old, new, &mut changes)?;
        Ok(changes)
    }
}
