//! Site assembly and output management.
//!
//! [`Site`] pulls datasets out of an [`ObjectGraph`], renders them through a
//! [`Templates`] implementation and writes the results into an [`OutputDir`].
//! [`generate`] wires the production pieces together.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::assets::write_css_assets;
use crate::bounded::Bounded;
use crate::dataset::{CommitRow, FileRow, FileView, PageData, PageDataset, RefRow, RepoMeta};
use crate::error::SiteError;
use crate::filetype::{AllowList, classify};
use crate::git::{Commit, GitRepository, ObjectGraph, ObjectId};
use crate::refs::{self, Reference};
use crate::stats::commit_stats;
use crate::templates::{
    COMMITS_TEMPLATE, FILE_TEMPLATE, FILES_TEMPLATE, HtmlTemplates, REFS_TEMPLATE, Templates,
};
use crate::tree::{FlatFileEntry, flatten_sorted};
use crate::util::{encode_href, format_file_size, is_safe_path, root_prefix};
use crate::walk::{self, CommitWalk};

/// Name of the index alias under the output root.
pub const INDEX_FILE: &str = "index.html";

/// Directory holding file viewer pages.
pub const FILE_DIR: &str = "file";

/// Top-level pages that can serve as the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PageKind {
    #[default]
    Commits,
    Refs,
    Files,
}

impl PageKind {
    /// Output file name relative to the site root.
    pub fn file_name(self) -> &'static str {
        match self {
            PageKind::Commits => COMMITS_TEMPLATE,
            PageKind::Refs => REFS_TEMPLATE,
            PageKind::Files => FILES_TEMPLATE,
        }
    }
}

/// Per-page row caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub commits: usize,
    pub refs: usize,
    pub files: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            commits: 100,
            refs: 100,
            files: 1000,
        }
    }
}

/// Everything one generation run needs.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub repo: PathBuf,
    pub output: PathBuf,
    pub meta: RepoMeta,
    /// Starting revision; HEAD when `None`.
    pub rev: Option<String>,
    pub limits: Limits,
    pub index_page: PageKind,
    pub allow_list: AllowList,
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub pages_written: usize,
    pub commits: usize,
    pub branches: usize,
    pub tags: usize,
    pub files: usize,
    pub viewer_pages: usize,
}

/// Output root that every page is written beneath.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Creates the directory if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(write_error(&root))?;
        Ok(Self { root })
    }

    /// Replaces `rel` with `content`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error(parent))?;
        }
        fs::write(&path, content).map_err(write_error(&path))?;
        Ok(())
    }

    /// Points `index.html` at `target`, replacing any previous entry point.
    ///
    /// The alias is built under a temporary name and renamed into place, so
    /// readers never observe a missing index.
    pub fn link_index(&self, target: &str) -> Result<()> {
        let index = self.root.join(INDEX_FILE);
        let staging = self.root.join(format!(".{}.{}.tmp", INDEX_FILE, std::process::id()));

        if fs::symlink_metadata(&staging).is_ok() {
            fs::remove_file(&staging).map_err(write_error(&staging))?;
        }
        self.alias(target, &staging).map_err(write_error(&staging))?;
        fs::rename(&staging, &index).map_err(write_error(&index))?;

        debug!(page = target, "linked index");
        Ok(())
    }

    #[cfg(unix)]
    fn alias(&self, target: &str, at: &Path) -> std::io::Result<()> {
        std::os::unix::fs::symlink(target, at)
    }

    #[cfg(not(unix))]
    fn alias(&self, target: &str, at: &Path) -> std::io::Result<()> {
        fs::copy(self.root.join(target), at).map(|_| ())
    }
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> SiteError {
    let path = path.to_path_buf();
    move |source| SiteError::OutputWrite { path, source }
}

/// Renders one repository into one output directory.
pub struct Site<'a, G: ObjectGraph + ?Sized, T: Templates> {
    graph: &'a G,
    templates: &'a T,
    output: &'a OutputDir,
    options: &'a SiteOptions,
}

impl<'a, G: ObjectGraph + ?Sized, T: Templates> Site<'a, G, T> {
    pub fn new(
        graph: &'a G,
        templates: &'a T,
        output: &'a OutputDir,
        options: &'a SiteOptions,
    ) -> Self {
        Self {
            graph,
            templates,
            output,
            options,
        }
    }

    /// Writes every page, the stylesheet and the index alias.
    ///
    /// # Errors
    ///
    /// Fails before writing anything when the starting revision does not
    /// resolve to a commit, and on any output write failure.
    pub fn build(&self) -> Result<Summary> {
        let start = walk::resolve_start(self.graph, self.options.rev.as_deref())?;
        let walk = CommitWalk::new(self.graph, start)?;
        let head = self
            .graph
            .commit(start)
            .with_context(|| format!("Failed to read commit {}", start))?;

        let mut summary = Summary::default();

        write_css_assets(self.output)?;

        summary.commits = self.write_commits(walk)?;
        summary.pages_written += 1;

        let (branches, tags) = self.write_refs()?;
        summary.branches = branches;
        summary.tags = tags;
        summary.pages_written += 1;

        let (files, viewer_pages) = self.write_files(&head)?;
        summary.files = files;
        summary.viewer_pages = viewer_pages;
        summary.pages_written += 1 + viewer_pages;

        self.output.link_index(self.options.index_page.file_name())?;

        Ok(summary)
    }

    fn dataset(&self, title: String, root: String, data: PageData) -> PageDataset {
        PageDataset {
            title,
            meta: self.options.meta.clone(),
            root,
            data,
        }
    }

    fn render(&self, template: &str, rel: &str, page: &PageDataset) -> Result<String> {
        self.templates
            .render(template, page)
            .with_context(|| format!("Failed to render {}", rel))
    }

    fn render_to(&self, template: &str, rel: &str, page: &PageDataset) -> Result<()> {
        let text = self.render(template, rel, page)?;
        self.output.write(rel, &text)
    }

    fn write_commits(&self, history: CommitWalk<'_, G>) -> Result<usize> {
        let commits = history.collect::<Result<Vec<Commit>>>()?;
        let commits = Bounded::new(walk::sort_for_display(commits), self.options.limits.commits);
        let total = commits.total();

        let rows = commits.try_map(|commit| -> Result<CommitRow> {
            let stats = commit_stats(self.graph, &commit)
                .with_context(|| format!("Failed to compute stats for {}", commit.id()))?;
            Ok(CommitRow::new(&commit, stats))
        })?;

        let title = format!("Commits - {}", self.options.meta.name);
        let page = self.dataset(title, String::new(), PageData::Commits(rows));
        self.render_to(COMMITS_TEMPLATE, COMMITS_TEMPLATE, &page)?;

        info!(total, shown = total.min(self.options.limits.commits), "wrote commit history");
        Ok(total)
    }

    fn write_refs(&self) -> Result<(usize, usize)> {
        let branches = self.bounded_refs(refs::list_remote_branches(self.graph)?);
        let tags = self.bounded_refs(refs::list_tags(self.graph)?);
        let counts = (branches.total(), tags.total());

        let title = format!("Refs - {}", self.options.meta.name);
        let page = self.dataset(title, String::new(), PageData::Refs { branches, tags });
        self.render_to(REFS_TEMPLATE, REFS_TEMPLATE, &page)?;

        info!(branches = counts.0, tags = counts.1, "wrote refs");
        Ok(counts)
    }

    fn bounded_refs(&self, references: Vec<Reference>) -> Bounded<RefRow> {
        Bounded::sorted_by(references, self.options.limits.refs, refs::display_order)
            .map(|reference| RefRow::from(&reference))
    }

    fn write_files(&self, head: &Commit) -> Result<(usize, usize)> {
        let files = Bounded::new(
            flatten_sorted(self.graph, head.tree())?,
            self.options.limits.files,
        );
        let total = files.total();
        let mut viewer_pages = 0;

        let rows = files.try_map(|file| -> Result<FileRow> {
            let (row, wrote_page) = self.file_row(&file)?;
            viewer_pages += usize::from(wrote_page);
            Ok(row)
        })?;

        let title = format!("Files - {}", self.options.meta.name);
        let page = self.dataset(title, String::new(), PageData::Files(rows));
        self.render_to(FILES_TEMPLATE, FILES_TEMPLATE, &page)?;

        info!(total, viewer_pages, "wrote file listing");
        Ok((total, viewer_pages))
    }

    /// Builds the listing row for `file`, writing its viewer page when the
    /// content can be shown.
    ///
    /// A viewer page that cannot be written, e.g. because another file's
    /// page already took its path, leaves the row without a link.
    fn file_row(&self, file: &FlatFileEntry) -> Result<(FileRow, bool)> {
        let path = file.path();
        let entry = file.entry();
        let mode = entry.mode().as_octal();
        let content = self
            .graph
            .blob(entry.id())
            .with_context(|| format!("Failed to read blob {}", path))?;
        let size = format_file_size(content.len());

        let href = match self.viewer_text(path, entry.id(), content) {
            Some(text) => {
                let rel = format!("{}/{}.html", FILE_DIR, path);
                let title = format!("{} - {}", path, self.options.meta.name);
                let view = FileView::new(path, mode, text);
                let page = self.dataset(title, root_prefix(&rel), PageData::File(view));
                let text = self.render(FILE_TEMPLATE, &rel, &page)?;
                match self.output.write(&rel, &text) {
                    Ok(()) => Some(encode_href(&rel)),
                    Err(error) => {
                        warn!(path, "skipping viewer page: {:#}", error);
                        None
                    }
                }
            }
            None => None,
        };

        let wrote_page = href.is_some();
        let row = FileRow {
            path: path.to_string(),
            mode,
            size,
            href,
        };
        Ok((row, wrote_page))
    }

    /// Decoded text for a viewer page, or `None` when the file is listed only.
    fn viewer_text(&self, path: &str, id: ObjectId, content: Vec<u8>) -> Option<String> {
        if !is_safe_path(path) {
            warn!(path, "unsafe path, skipping viewer page");
            return None;
        }

        let classification = classify(&content, &self.options.allow_list);
        if !classification.is_viewable() {
            debug!(path, media_type = classification.media_type(), "not viewable");
            return None;
        }

        match String::from_utf8(content) {
            Ok(text) => Some(text),
            Err(source) => {
                let err = SiteError::ContentDecode {
                    path: path.to_string(),
                    source,
                };
                warn!(%id, "{}", err);
                None
            }
        }
    }
}

/// Opens the repository at `options.repo` and renders it into `options.output`.
///
/// # Errors
///
/// Returns [`SiteError::RepositoryOpen`] before touching the output
/// directory when the repository cannot be opened.
pub fn generate(options: &SiteOptions) -> Result<Summary> {
    let repo = GitRepository::open(&options.repo)?;
    info!(repo = %options.repo.display(), output = %options.output.display(), "generating site");

    let output = OutputDir::create(&options.output)?;
    Site::new(&repo, &HtmlTemplates, &output, options).build()
}
