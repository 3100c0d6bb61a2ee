//! Site header and list navigation components

use maud::{Markup, html};

use crate::bounded::Bounded;
use crate::dataset::RepoMeta;

/// Renders the site header
///
/// Shows the repository name and description followed by links to the
/// commit, ref and file pages.
///
/// # Arguments
///
/// * `meta`: Repository name and description
/// * `root`: Relative prefix back to the site root
///
/// # Returns
///
/// Header markup with navigation links
pub fn site_header(meta: &RepoMeta, root: &str) -> Markup {
    html! {
        header class="site-header" {
            h1 class="repo-name" {
                a href=(format!("{}index.html", root)) { (meta.name) }
            }
            p class="repo-description" { (meta.description) }
            nav class="site-nav" {
                a href=(format!("{}commits.html", root)) { "Commits" }
                span class="nav-separator" { "|" }
                a href=(format!("{}refs.html", root)) { "Refs" }
                span class="nav-separator" { "|" }
                a href=(format!("{}files.html", root)) { "Files" }
            }
        }
    }
}

/// Renders "showing N of M" under a capped list, or nothing when complete.
pub fn truncation_note<T>(list: &Bounded<T>, noun: &str) -> Markup {
    html! {
        @if list.is_truncated() {
            p class="truncated" {
                "Showing " (list.len()) " of " (list.total()) " " (noun) "."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_header_links() {
        // Arrange
        let meta = RepoMeta {
            name: "demo".to_string(),
            description: "<b>escaped</b>".to_string(),
        };

        // Act
        let html = site_header(&meta, "../").into_string();

        // Assert
        assert!(html.contains(r#"href="../commits.html""#));
        assert!(html.contains(r#"href="../refs.html""#));
        assert!(html.contains(r#"href="../files.html""#));
        assert!(html.contains("&lt;b&gt;escaped&lt;/b&gt;"));
    }

    #[test]
    fn test_truncation_note() {
        let capped = Bounded::new(vec![1, 2, 3], 2);
        let complete = Bounded::new(vec![1, 2, 3], 5);

        let shown = truncation_note(&capped, "commits").into_string();

        assert!(shown.contains("Showing 2 of 3 commits."));
        assert!(truncation_note(&complete, "commits").into_string().is_empty());
    }
}
