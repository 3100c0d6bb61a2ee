//! File viewer page generation

use maud::{Markup, html};

use crate::components::layout::page_wrapper;
use crate::dataset::{FileView, PageDataset};

/// Generates a viewer page with line-numbered, escaped file content.
pub fn generate(page: &PageDataset, file: &FileView) -> Markup {
    let lines: Vec<&str> = file.text.lines().collect();

    page_wrapper(
        page,
        html! {
            div class="file-header" {
                h2 class="file-path" { (file.path) }
                span class="file-meta" {
                    code { (file.mode) } " · " (lines.len()) " lines · " (file.size)
                }
            }
            div class="blob-container" {
                table class="blob-code" {
                    tbody {
                        @for (index, line) in lines.iter().enumerate() {
                            @let number = index + 1;
                            tr id=(format!("L{}", number)) {
                                td class="line-number" {
                                    a href=(format!("#L{}", number)) { (number) }
                                }
                                td class="line-content" { pre { (line) } }
                            }
                        }
                    }
                }
            }
        },
    )
}
