//! Plain-text linearization of the first `<body>`.
//!
//! Each outermost `<section>` of the body becomes one block of lines; blocks
//! are separated by a blank line. The walk is an explicit depth-first visit
//! over the tree, so nested sections are emitted inline, exactly once.

use crate::dom::{Document, NodeData, NodeId};

/// Paragraph-level elements collected as lines.
const PARAGRAPH_TAGS: &[&str] = &["p", "v", "subtitle", "text-author"];

/// Heading-level elements collected as lines.
const HEADING_TAGS: &[&str] = &["title"];

/// Separator between lines of one section.
const LINE_SEPARATOR: &str = "\n";

/// Separator between section blocks.
const SECTION_SEPARATOR: &str = "\n\n";

/// Extract the body text of a document; empty when there is no body.
pub fn extract_body_text(dom: &Document) -> String {
    let Some(body) = dom.find_descendant(dom.document(), dom.name("body")) else {
        return String::new();
    };

    let blocks: Vec<String> = top_level_sections(dom, body)
        .into_iter()
        .map(|section| section_text(dom, section))
        .filter(|block| !block.is_empty())
        .collect();

    blocks.join(SECTION_SEPARATOR)
}

/// Outermost `<section>` elements under `body`, in document order.
fn top_level_sections(dom: &Document, body: NodeId) -> Vec<NodeId> {
    let mut sections = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(body).collect();
    stack.reverse();

    while let Some(id) = stack.pop() {
        if dom.is_element(id, dom.name("section")) {
            sections.push(id);
            continue;
        }
        let start = stack.len();
        stack.extend(dom.children(id));
        stack[start..].reverse();
    }
    sections
}

/// Lines of one section joined by newlines.
fn section_text(dom: &Document, section: NodeId) -> String {
    let mut collector = LineCollector::default();
    collector.visit(dom, section);
    collector.lines.join(LINE_SEPARATOR)
}

/// Depth-first visitor collecting text-bearing elements.
#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
}

impl LineCollector {
    fn visit(&mut self, dom: &Document, id: NodeId) {
        match dom.data(id) {
            Some(NodeData::Element { .. }) => {}
            // Bare text between blocks is not paragraph content
            _ => return,
        }

        if is_text_bearing(dom, id) && !has_text_bearing_descendant(dom, id) {
            let line = dom.text_content(id);
            let line = line.trim();
            if !line.is_empty() {
                self.lines.push(line.to_string());
            }
            return;
        }

        for child in dom.children(id) {
            self.visit(dom, child);
        }
    }
}

fn is_text_bearing(dom: &Document, id: NodeId) -> bool {
    PARAGRAPH_TAGS
        .iter()
        .chain(HEADING_TAGS)
        .any(|tag| dom.is_element(id, dom.name(tag)))
}

fn has_text_bearing_descendant(dom: &Document, id: NodeId) -> bool {
    dom.descendants(id).any(|node| is_text_bearing(dom, node))
}
