//! View models handed to templates.

use crate::bounded::Bounded;
use crate::git::Commit;
use crate::refs::Reference;
use crate::stats::DiffStats;
use crate::util::{format_file_size, format_time};

/// Repository metadata shown on every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMeta {
    pub name: String,
    pub description: String,
}

/// One row of the commit history page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRow {
    pub id: String,
    pub short_id: String,
    pub author_name: String,
    pub author_email: String,
    pub time: String,
    pub subject: String,
    pub insertions: usize,
    pub deletions: usize,
    pub files_changed: usize,
}

impl CommitRow {
    pub fn new(commit: &Commit, stats: DiffStats) -> Self {
        Self {
            id: commit.oid_hex(),
            short_id: commit.short_oid(),
            author_name: commit.author_name().to_string(),
            author_email: commit.author_email().to_string(),
            time: format_time(commit.time()),
            subject: commit.subject().to_string(),
            insertions: stats.insertions,
            deletions: stats.deletions,
            files_changed: stats.files_changed,
        }
    }
}

/// One row of the refs page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRow {
    pub name: String,
    pub commit_id: String,
    pub short_id: String,
    pub subject: String,
    pub time: String,
}

impl From<&Reference> for RefRow {
    fn from(reference: &Reference) -> Self {
        let commit = reference.commit();
        Self {
            name: reference.name().to_string(),
            commit_id: commit.oid_hex(),
            short_id: commit.short_oid(),
            subject: commit.subject().to_string(),
            time: format_time(commit.time()),
        }
    }
}

/// One row of the file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub path: String,
    pub mode: &'static str,
    pub size: String,
    /// Percent-encoded viewer page link relative to the site root, when
    /// viewable.
    pub href: Option<String>,
}

/// Content of a file viewer page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub path: String,
    pub mode: &'static str,
    pub size: String,
    pub text: String,
}

impl FileView {
    pub fn new(path: &str, mode: &'static str, text: String) -> Self {
        Self {
            path: path.to_string(),
            mode,
            size: format_file_size(text.len()),
            text,
        }
    }
}

/// Page-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
    Commits(Bounded<CommitRow>),
    Refs {
        branches: Bounded<RefRow>,
        tags: Bounded<RefRow>,
    },
    Files(Bounded<FileRow>),
    File(FileView),
}

impl PageData {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            PageData::Commits(_) => "commits",
            PageData::Refs { .. } => "refs",
            PageData::Files(_) => "files",
            PageData::File(_) => "file",
        }
    }
}

/// Everything a template needs to render one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDataset {
    pub title: String,
    pub meta: RepoMeta,
    /// Relative prefix from the page back to the site root (`""` or `"../"`...).
    pub root: String,
    pub data: PageData,
}
