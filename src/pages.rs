//! Page generation modules for different view types
//!
//! Each page module renders the body of one page kind from its
//! `PageDataset` and relies on the shared components for the surrounding
//! document structure.

pub mod commits;
pub mod file;
pub mod files;
pub mod refs;
