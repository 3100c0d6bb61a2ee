//! File listing page

use maud::{Markup, html};

use crate::bounded::Bounded;
use crate::components::layout::page_wrapper;
use crate::components::nav::truncation_note;
use crate::dataset::{FileRow, PageDataset};

/// Generates the flat file listing
///
/// Viewable files link to their viewer page; every other file is listed
/// as plain text.
///
/// # Arguments
///
/// * `page`: Page title, metadata and root prefix
/// * `files`: Capped file rows sorted by path
///
/// # Returns
///
/// Rendered HTML markup
pub fn generate(page: &PageDataset, files: &Bounded<FileRow>) -> Markup {
    page_wrapper(
        page,
        html! {
            h2 { "Files" }
            @if files.is_empty() {
                p class="empty-state" { "No files in this repository" }
            } @else {
                table class="file-table" {
                    thead {
                        tr {
                            th { "Mode" }
                            th { "Name" }
                            th class="num" { "Size" }
                        }
                    }
                    tbody {
                        @for file in files.items() {
                            tr class="file-row" {
                                td class="file-mode" { code { (file.mode) } }
                                td class="file-link" {
                                    @if let Some(href) = &file.href {
                                        a href=(format!("{}{}", page.root, href)) { (file.path) }
                                    } @else {
                                        (file.path)
                                    }
                                }
                                td class="num" { (file.size) }
                            }
                        }
                    }
                }
            }
            (truncation_note(files, "files"))
        },
    )
}
