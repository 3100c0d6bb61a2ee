//! Static site generator for Git repositories.

mod assets;
pub mod bounded;
pub mod components;
mod config;
pub mod dataset;
mod error;
pub mod filetype;
pub mod git;
pub mod pages;
pub mod refs;
pub mod site;
pub mod stats;
pub mod templates;
#[cfg(test)]
mod testing;
pub mod tree;
mod util;
pub mod walk;

pub use bounded::Bounded;
pub use config::{Config, DEFAULT_DESCRIPTION};
pub use dataset::{PageData, PageDataset, RepoMeta};
pub use error::SiteError;
pub use filetype::{AllowList, Category, Classification, classify, is_viewable};
pub use git::{Commit, GitRepository, ObjectGraph, ObjectId, TreeChange};
pub use refs::{RefKind, Reference, list_remote_branches, list_tags};
pub use site::{Limits, OutputDir, PageKind, Site, SiteOptions, Summary, generate};
pub use stats::{DiffStats, commit_stats};
pub use templates::{HtmlTemplates, Templates};
pub use tree::{FlatFileEntry, flatten, flatten_sorted};
pub use util::{format_file_size, format_time};
pub use walk::CommitWalk;
