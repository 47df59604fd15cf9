//! Builds a [`Document`] from raw FictionBook bytes.

use quick_xml::NsReader;
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::arena::{Attribute, Document, ExpandedName, NodeId};
use crate::error::{FormatError, Result};
use crate::util::decode_text;

impl Document {
    /// Parse a byte payload into a tree.
    ///
    /// `namespace` is the document's canonical namespace; it is stored on
    /// the tree for later lookups and does not change how names resolve.
    /// Any malformation is fatal and reported as [`FormatError`].
    pub fn parse(bytes: &[u8], namespace: &str) -> Result<Document> {
        let text = decode_text(bytes);
        Self::parse_str(&text, namespace)
    }

    /// Parse already-decoded markup.
    pub fn parse_str(text: &str, namespace: &str) -> Result<Document> {
        let mut reader = NsReader::from_str(text);
        let mut dom = Document::new(namespace);
        let mut stack: Vec<NodeId> = vec![dom.document()];
        let mut seen_root = false;

        loop {
            let position = reader.buffer_position() as u64;
            let (resolved, event) = reader
                .read_resolved_event()
                .map_err(|source| FormatError::Syntax { position, source })?;
            let namespace = resolve_namespace(resolved)?;

            match event {
                Event::Start(e) => {
                    let id = open_element(&mut dom, &reader, &stack, &mut seen_root, namespace, &e, position)?;
                    stack.push(id);
                }
                Event::Empty(e) => {
                    open_element(&mut dom, &reader, &stack, &mut seen_root, namespace, &e, position)?;
                }
                Event::End(e) => {
                    // quick-xml rejects mismatched names; an end tag at the
                    // document level can only come from a reader without checks
                    if stack.len() < 2 {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        return Err(FormatError::UnexpectedEndTag(name).into());
                    }
                    stack.pop();
                }
                Event::Text(e) => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    push_text(&mut dom, &stack, &raw)?;
                }
                Event::CData(e) => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    push_text(&mut dom, &stack, &raw)?;
                }
                Event::GeneralRef(e) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    let resolved = resolve_entity(&entity)
                        .ok_or_else(|| FormatError::UnknownEntity(entity.to_string()))?;
                    push_text(&mut dom, &stack, &resolved)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() > 1 {
            let open = stack
                .last()
                .and_then(|&id| dom.element_name(id))
                .map(|n| n.local.clone())
                .unwrap_or_default();
            return Err(FormatError::UnclosedElement(open).into());
        }
        if !seen_root {
            return Err(FormatError::NoRootElement.into());
        }

        if let Some(root) = dom.root()
            && dom.element_name(root).and_then(|n| n.namespace.as_deref()) != Some(namespace)
        {
            tracing::debug!(namespace, "root element is outside the expected namespace");
        }

        Ok(dom)
    }
}

fn open_element(
    dom: &mut Document,
    reader: &NsReader<&[u8]>,
    stack: &[NodeId],
    seen_root: &mut bool,
    namespace: Option<String>,
    start: &BytesStart<'_>,
    position: u64,
) -> Result<NodeId> {
    let parent = *stack.last().unwrap_or(&dom.document());
    if parent == dom.document() {
        if *seen_root {
            return Err(FormatError::MultipleRoots.into());
        }
        *seen_root = true;
    }

    let name = ExpandedName {
        namespace,
        local: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
    };

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| FormatError::Syntax {
            position,
            source: e.into(),
        })?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        attrs.push(read_attribute(reader, attr, position)?);
    }

    let id = dom.create_element(name, attrs);
    dom.append(parent, id);
    Ok(id)
}

fn read_attribute(
    reader: &NsReader<&[u8]>,
    attr: XmlAttribute<'_>,
    position: u64,
) -> Result<Attribute> {
    let (resolved, local) = reader.resolver().resolve_attribute(attr.key);
    let namespace = resolve_namespace(resolved)?;

    let raw = String::from_utf8_lossy(&attr.value);
    let value = quick_xml::escape::unescape(&raw)
        .map_err(|e| FormatError::Syntax {
            position,
            source: e.into(),
        })?
        .into_owned();

    Ok(Attribute {
        name: ExpandedName {
            namespace,
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        },
        value,
    })
}

fn resolve_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => {
            Err(FormatError::UnknownPrefix(String::from_utf8_lossy(&prefix).into_owned()).into())
        }
    }
}

fn push_text(dom: &mut Document, stack: &[NodeId], text: &str) -> Result<()> {
    match stack.last() {
        Some(&parent) if parent != dom.document() => {
            dom.append_text(parent, text);
            Ok(())
        }
        // Whitespace around the root element is insignificant
        _ if text.trim().is_empty() => Ok(()),
        _ => Err(FormatError::ContentOutsideRoot.into()),
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
