//! Title and author extraction.
//!
//! Nothing here fails: absent or empty fields resolve to the fallback
//! strings configured in [`ParseOptions`].

use crate::dom::{Document, NodeId};
use crate::options::ParseOptions;

/// Name parts of a FictionBook `<author>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl AuthorName {
    /// Read the name parts of an `<author>` element.
    pub fn from_element(dom: &Document, author: NodeId) -> Self {
        let part = |local: &str| {
            dom.find_child(author, dom.name(local))
                .map(|id| dom.text_content(id))
                .and_then(non_empty)
        };
        Self {
            first: part("first-name"),
            middle: part("middle-name"),
            last: part("last-name"),
        }
    }

    /// Space-joined name in first, middle, last order; `None` when empty.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.first, &self.middle, &self.last]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Trimmed text of the first `<book-title>`, or the fallback title.
pub fn extract_title(dom: &Document, options: &ParseOptions) -> String {
    dom.find_descendant(dom.document(), dom.name("book-title"))
        .map(|id| dom.text_content(id))
        .and_then(non_empty)
        .unwrap_or_else(|| options.untitled.clone())
}

/// Display name of the first `<author>`, or the fallback author.
pub fn extract_author(dom: &Document, options: &ParseOptions) -> String {
    dom.find_descendant(dom.document(), dom.name("author"))
        .and_then(|id| AuthorName::from_element(dom, id).display_name())
        .unwrap_or_else(|| options.unknown_author.clone())
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}
