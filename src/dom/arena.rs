//! Arena-allocated XML tree.
//!
//! Nodes live in one contiguous vector; parent, child and sibling links are
//! indices into it. The tree is built once by the loader and is read-only
//! afterwards.

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Namespace-resolved element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    /// Namespace URI, `None` for names in no namespace.
    pub namespace: Option<String>,
    pub local: String,
}

impl ExpandedName {
    pub fn matches(&self, name: Name<'_>) -> bool {
        self.local == name.local && self.namespace.as_deref() == name.namespace
    }
}

/// Borrowed name used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<'a> {
    pub namespace: Option<&'a str>,
    pub local: &'a str,
}

impl<'a> Name<'a> {
    /// Name in the given namespace.
    pub fn new(namespace: &'a str, local: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            local,
        }
    }

    /// Name in no namespace (plain attributes such as `id`).
    pub fn local(local: &'a str) -> Self {
        Self {
            namespace: None,
            local,
        }
    }
}

/// Attribute of an element. Namespace declarations are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: ExpandedName,
    pub value: String,
}

/// Node variants of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root (parent of the root element).
    Document,
    /// Element with resolved name and attributes.
    Element {
        name: ExpandedName,
        attrs: Vec<Attribute>,
    },
    /// Character data, entity references already resolved.
    Text(String),
}

impl NodeData {
    /// Text of a text node, `None` for other variants.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// A parsed FictionBook document.
///
/// Carries the namespace it was loaded with so lookups can build names in
/// the document's namespace through [`Document::name`].
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    document: NodeId,
    namespace: String,
}

impl Document {
    /// Create an empty tree holding only the document node.
    pub(crate) fn new(namespace: &str) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            namespace: namespace.to_string(),
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Namespace the document was loaded with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build a lookup name in the document's namespace.
    pub fn name<'a>(&'a self, local: &'a str) -> Name<'a> {
        Name::new(&self.namespace, local)
    }

    /// The document node.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The root element, if the tree has one.
    pub fn root(&self) -> Option<NodeId> {
        self.children(self.document)
            .find(|&id| matches!(self.data(id), Some(NodeData::Element { .. })))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(|n| &n.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_some)
    }

    /// Number of nodes, including the document node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds only the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn create_element(&mut self, name: ExpandedName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::new(NodeData::Element { name, attrs }))
    }

    /// Append a child to a parent node.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Append text to the last child if it is a text node, or create one.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.alloc(Node::new(NodeData::Text(text.to_string())));
        self.append(parent, text_node);
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            dom: self,
            current: first,
        }
    }

    /// Iterate over all descendants of a node in document order.
    pub fn descendants(&self, ancestor: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            stack: self.children(ancestor).collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }

    /// Local name and namespace of an element.
    pub fn element_name(&self, id: NodeId) -> Option<&ExpandedName> {
        match self.data(id)? {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check whether a node is an element with the given name.
    pub fn is_element(&self, id: NodeId, name: Name<'_>) -> bool {
        self.element_name(id).is_some_and(|n| n.matches(name))
    }

    /// First child element with the given name.
    pub fn find_child(&self, parent: NodeId, name: Name<'_>) -> Option<NodeId> {
        self.children(parent).find(|&id| self.is_element(id, name))
    }

    /// First descendant element with the given name, in document order.
    pub fn find_descendant(&self, ancestor: NodeId, name: Name<'_>) -> Option<NodeId> {
        self.descendants(ancestor).find(|&id| self.is_element(id, name))
    }

    /// Get an attribute value.
    pub fn attr(&self, id: NodeId, name: Name<'_>) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.matches(name))
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Concatenated character data of a node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.data(id).and_then(NodeData::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|node| self.data(node).and_then(NodeData::as_text))
            .collect()
    }
}

/// Iterator over children of a node.
pub struct Children<'a> {
    dom: &'a Document,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Depth-first, document-order iterator over descendants of a node.
pub struct Descendants<'a> {
    dom: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        let start = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[start..].reverse();
        Some(id)
    }
}
