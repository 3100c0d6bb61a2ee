//! Commits page generation for commit history viewing

use maud::{Markup, html};

use crate::bounded::Bounded;
use crate::components::layout::page_wrapper;
use crate::components::nav::truncation_note;
use crate::dataset::{CommitRow, PageDataset};

/// Generates HTML page displaying commit history
///
/// Rows are rendered in the order given, newest first, with per-commit
/// change statistics.
///
/// # Arguments
///
/// * `page`: Page title, metadata and root prefix
/// * `commits`: Capped commit rows
///
/// # Returns
///
/// Rendered HTML markup
pub fn generate(page: &PageDataset, commits: &Bounded<CommitRow>) -> Markup {
    page_wrapper(
        page,
        html! {
            h2 { "Commits" }
            @if commits.is_empty() {
                p class="empty-state" { "No commits found" }
            } @else {
                table class="commit-list" {
                    thead {
                        tr {
                            th { "Date" }
                            th { "Subject" }
                            th { "Author" }
                            th { "Commit" }
                            th class="num" { "Files" }
                            th class="num" { "+" }
                            th class="num" { "-" }
                        }
                    }
                    tbody {
                        @for commit in commits.items() {
                            tr class="commit-entry" {
                                td class="commit-date" { (commit.time) }
                                td class="commit-message" { (commit.subject) }
                                td class="commit-author" title=(commit.author_email) {
                                    (commit.author_name)
                                }
                                td class="commit-hash" title=(commit.id) {
                                    code { (commit.short_id) }
                                }
                                td class="num" { (commit.files_changed) }
                                td class="num insertions" { "+" (commit.insertions) }
                                td class="num deletions" { "-" (commit.deletions) }
                            }
                        }
                    }
                }
            }
            (truncation_note(commits, "commits"))
        },
    )
}
