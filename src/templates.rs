//! Named-template rendering.

use anyhow::Result;

use crate::dataset::{PageData, PageDataset};
use crate::error::SiteError;
use crate::pages;

/// Renders a named template with a page dataset.
pub trait Templates {
    fn render(&self, name: &str, page: &PageDataset) -> Result<String>;
}

pub const COMMITS_TEMPLATE: &str = "commits.html";
pub const REFS_TEMPLATE: &str = "refs.html";
pub const FILES_TEMPLATE: &str = "files.html";
pub const FILE_TEMPLATE: &str = "file.html";

/// Built-in HTML templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTemplates;

impl Templates for HtmlTemplates {
    fn render(&self, name: &str, page: &PageDataset) -> Result<String> {
        let markup = match (name, &page.data) {
            (COMMITS_TEMPLATE, PageData::Commits(commits)) => {
                pages::commits::generate(page, commits)
            }
            (REFS_TEMPLATE, PageData::Refs { branches, tags }) => {
                pages::refs::generate(page, branches, tags)
            }
            (FILES_TEMPLATE, PageData::Files(files)) => pages::files::generate(page, files),
            (FILE_TEMPLATE, PageData::File(file)) => pages::file::generate(page, file),
            (COMMITS_TEMPLATE, _) => return Err(mismatch(COMMITS_TEMPLATE, &page.data)),
            (REFS_TEMPLATE, _) => return Err(mismatch(REFS_TEMPLATE, &page.data)),
            (FILES_TEMPLATE, _) => return Err(mismatch(FILES_TEMPLATE, &page.data)),
            (FILE_TEMPLATE, _) => return Err(mismatch(FILE_TEMPLATE, &page.data)),
            (other, _) => return Err(SiteError::TemplateNotFound(other.to_string()).into()),
        };
        Ok(markup.into_string())
    }
}

fn mismatch(template: &'static str, data: &PageData) -> anyhow::Error {
    SiteError::TemplateMismatch {
        template,
        page: data.label(),
    }
    .into()
}
