//! Reusable HTML components for page generation
//!
//! Components shared by every page type: the document wrapper, the site
//! header with its navigation links, and the truncation notice shown under
//! capped lists.

pub mod layout;
pub mod nav;
