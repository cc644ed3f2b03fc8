//! HTML link extraction
//!
//! The extractor returns raw `href` values exactly as written in the
//! document. Resolution and scoping happen later, in the worker.

use crate::ExtractError;
use scraper::{ElementRef, Html};

/// Pulls raw anchor hrefs out of an HTML document
pub trait LinkExtractor: Sync {
    /// Returns every non-empty `<a href>` value; order is not significant
    fn extract(&self, html: &str) -> Result<Vec<String>, ExtractError>;
}

/// [`LinkExtractor`] backed by the `scraper` HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, html: &str) -> Result<Vec<String>, ExtractError> {
        // A NUL byte means a binary payload mislabeled as HTML
        if html.contains('\0') {
            return Err(ExtractError::Malformed {
                reason: "document contains NUL bytes".to_string(),
            });
        }

        let document = Html::parse_document(html);
        Ok(collect_hrefs(document.root_element()))
    }
}

/// Walks the element tree with an explicit stack, in document order
///
/// Stack depth is bounded by the tree's width, not its nesting depth.
fn collect_hrefs(root: ElementRef<'_>) -> Vec<String> {
    let mut links = Vec::new();
    let mut stack = vec![root];

    while let Some(element) = stack.pop() {
        if element.value().name() == "a" {
            if let Some(href) = element.value().attr("href") {
                if !href.is_empty() {
                    links.push(href.to_string());
                }
            }
        }

        // Reverse so the first child is visited first
        let children: Vec<ElementRef<'_>> =
            element.children().filter_map(ElementRef::wrap).collect();
        stack.extend(children.into_iter().rev());
    }

    links
}
