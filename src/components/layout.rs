//! Page layout wrapper component

use maud::{DOCTYPE, Markup, html};

use super::nav::site_header;
use crate::dataset::PageDataset;

/// Wraps page content with standard HTML structure
///
/// Provides consistent DOCTYPE, html, head, and container structure across
/// all page types. The stylesheet and navigation links are resolved against
/// the page's root prefix so nested viewer pages link correctly.
///
/// # Arguments
///
/// * `page`: Dataset providing the title, repository metadata and root prefix
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(page: &PageDataset, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.title) }
                link rel="stylesheet" href=(format!("{}style.css", page.root));
            }
            body {
                div class="container" {
                    (site_header(&page.meta, &page.root))
                    main {
                        (body)
                    }
                }
            }
        }
    }
}
