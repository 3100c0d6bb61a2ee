//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::dataset::RepoMeta;
use crate::filetype::AllowList;
use crate::site::{Limits, PageKind, SiteOptions};

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "no description provided.";

/// Command line configuration for gitpages.
#[derive(Debug, Clone, Parser)]
#[command(name = "gitpages", version, about, long_about = None)]
pub struct Config {
    /// Repository path
    #[arg(value_name = "REPOSITORY")]
    pub repo: PathBuf,

    /// Output directory, created if absent
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Project name (defaults to the repository directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Revision to render (defaults to HEAD)
    #[arg(long)]
    pub rev: Option<String>,

    /// Maximum number of commits listed
    #[arg(long, default_value_t = 100)]
    pub max_commits: usize,

    /// Maximum number of branches and of tags listed
    #[arg(long, default_value_t = 100)]
    pub max_refs: usize,

    /// Maximum number of files listed
    #[arg(long, default_value_t = 1000)]
    pub max_files: usize,

    /// Page that index.html points at
    #[arg(long, value_enum, default_value_t = PageKind::Commits)]
    pub index_page: PageKind,

    /// Extra media type to render as text (repeatable)
    #[arg(long = "allow-type", value_name = "MEDIA-TYPE")]
    pub allow_types: Vec<String>,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if repository path does not exist or a cap is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.repo.exists() {
            bail!("Repository path does not exist: {}", self.repo.display());
        }

        for (flag, value) in [
            ("--max-commits", self.max_commits),
            ("--max-refs", self.max_refs),
            ("--max-files", self.max_files),
        ] {
            if value == 0 {
                bail!("{} must be at least 1", flag);
            }
        }

        Ok(())
    }

    /// Returns project name from configuration or repository directory.
    ///
    /// # Errors
    ///
    /// Returns error if repository path has no name component or contains invalid UTF8.
    pub fn project_name(&self) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        let path = self
            .repo
            .canonicalize()
            .unwrap_or_else(|_| self.repo.clone());

        path.file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Cannot extract project name from path: {}", path.display()))
            .map(String::from)
    }

    /// Returns project description or the placeholder.
    pub fn project_description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }

    /// Converts the command line into library options.
    pub fn site_options(&self) -> Result<SiteOptions> {
        let mut allow_list = AllowList::default();
        allow_list.extend(&self.allow_types);

        Ok(SiteOptions {
            repo: self.repo.clone(),
            output: self.output.clone(),
            meta: RepoMeta {
                name: self.project_name()?,
                description: self.project_description(),
            },
            rev: self.rev.clone(),
            limits: Limits {
                commits: self.max_commits,
                refs: self.max_refs,
                files: self.max_files,
            },
            index_page: self.index_page,
            allow_list,
        })
    }
}
