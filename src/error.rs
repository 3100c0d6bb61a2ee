//! Error taxonomy for site generation.
//!
//! Fatal variants abort the run and surface as a non-zero exit. Per-item
//! variants (`ContentDecode`, `ReferenceResolution` for enumerated refs) are
//! logged by their callers and the item degrades instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to open repository at {}", path.display())]
    RepositoryOpen {
        path: PathBuf,
        #[source]
        source: Box<gix::open::Error>,
    },

    #[error("Cannot resolve '{spec}' to a commit: {reason}")]
    ReferenceResolution { spec: String, reason: String },

    #[error("Content of {path} is not valid UTF-8")]
    ContentDecode {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tree {path:?} exceeds the maximum depth of {max}")]
    TreeTooDeep { path: String, max: usize },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template {template} cannot render {page} data")]
    TemplateMismatch {
        template: &'static str,
        page: &'static str,
    },
}
