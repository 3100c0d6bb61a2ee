//! Refs page listing remote branches and tags

use maud::{Markup, html};

use crate::bounded::Bounded;
use crate::components::layout::page_wrapper;
use crate::components::nav::truncation_note;
use crate::dataset::{PageDataset, RefRow};

/// Generates the refs page with one table for branches and one for tags.
pub fn generate(page: &PageDataset, branches: &Bounded<RefRow>, tags: &Bounded<RefRow>) -> Markup {
    page_wrapper(
        page,
        html! {
            h2 { "Branches" }
            (ref_table(branches, "branches"))
            h2 { "Tags" }
            (ref_table(tags, "tags"))
        },
    )
}

fn ref_table(refs: &Bounded<RefRow>, noun: &str) -> Markup {
    html! {
        @if refs.is_empty() {
            p class="empty-state" { "No " (noun) " found" }
        } @else {
            table class="ref-list" {
                thead {
                    tr {
                        th { "Name" }
                        th { "Last commit" }
                        th { "Date" }
                        th { "Commit" }
                    }
                }
                tbody {
                    @for reference in refs.items() {
                        tr {
                            td class="ref-name" { (reference.name) }
                            td class="commit-message" { (reference.subject) }
                            td class="commit-date" { (reference.time) }
                            td class="commit-hash" title=(reference.commit_id) {
                                code { (reference.short_id) }
                            }
                        }
                    }
                }
            }
        }
        (truncation_note(refs, noun))
    }
}
