//! Namespace-aware document tree for FictionBook markup.
//!
//! [`Document::parse`] decodes and loads a payload; the tree is then
//! navigated with [`Name`]-based lookups.

mod arena;
mod loader;

pub use arena::{Attribute, Children, Descendants, Document, ExpandedName, Name, Node, NodeData, NodeId};
