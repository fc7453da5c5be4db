//! Arena-based DOM consumed by the renderer.
//!
//! All nodes of a parsed document live in one indextree [`Arena`]; the
//! renderer walks it through [`NodeId`]s and never mutates it. Trees can come
//! from the parser ([`crate::parse_document`], [`crate::parse_fragment`]) or
//! be assembled by hand with [`Document::append`].

use html5ever::QualName;
use html5ever::ns;
use indextree::{Arena, NodeId};
use smallvec::SmallVec;
use tendril::StrTendril;

/// A node tree. The root is always a [`NodeKind::Document`] node.
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,

    /// The Document node (parent of the doctype and `<html>`)
    pub root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a tree holding nothing but the Document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::new(NodeKind::Document));
        Self { arena, root }
    }

    /// Create a detached node. Attach it with [`Document::append`] or the
    /// indextree API on [`Document::arena`].
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.new_node(NodeData::new(kind))
    }

    /// Create a node and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.new_node(kind);
        parent.append(id, &mut self.arena);
        id
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// The node's kind.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    /// Element data, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// First child of a node, if any.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    /// Whether the node has at least one child.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// The `<html>` element, if present
    pub fn html(&self) -> Option<NodeId> {
        self.find_child_element(self.root, "html")
    }

    /// The `<head>` element, if present
    pub fn head(&self) -> Option<NodeId> {
        self.find_child_element(self.html()?, "head")
    }

    /// The `<body>` element, if present
    pub fn body(&self) -> Option<NodeId> {
        self.find_child_element(self.html()?, "body")
    }

    /// The doctype declaration, if the document has one.
    pub fn doctype(&self) -> Option<&DoctypeData> {
        self.children(self.root).find_map(|id| match self.kind(id) {
            NodeKind::Doctype(doctype) => Some(doctype),
            _ => None,
        })
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&id| self.element(id).is_some_and(|elem| elem.tag() == tag))
    }
}

/// Nodes produced by parsing a fragment.
///
/// The parser nests fragment content under a synthetic `<html>` element;
/// `nodes` lists that element's children, which are the fragment's
/// top-level nodes.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// The tree owning the nodes
    pub document: Document,

    /// Top-level nodes, in document order
    pub nodes: Vec<NodeId>,
}

impl Fragment {
    /// Iterate the top-level nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What the node is
    pub kind: NodeKind,
}

impl NodeData {
    /// Wrap a node kind.
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content, escaped on output
    Text(StrTendril),
    /// Comment content, written verbatim
    Comment(StrTendril),
    /// `<!DOCTYPE ...>`
    Doctype(DoctypeData),
    /// Processing instruction. HTML has no serialization for these.
    ProcessingInstruction {
        /// PI target
        target: StrTendril,
        /// PI body
        data: StrTendril,
    },
    /// Placeholder for a malformed subtree; cannot be rendered.
    Error,
}

impl NodeKind {
    /// Text node from anything string-like.
    pub fn text(text: impl Into<StrTendril>) -> Self {
        NodeKind::Text(text.into())
    }

    /// Comment node from anything string-like.
    pub fn comment(text: impl Into<StrTendril>) -> Self {
        NodeKind::Comment(text.into())
    }

    /// HTML element with no attributes.
    pub fn element(tag: &str) -> Self {
        NodeKind::Element(ElementData::new(tag))
    }
}

impl From<ElementData> for NodeKind {
    fn from(elem: ElementData) -> Self {
        NodeKind::Element(elem)
    }
}

impl From<DoctypeData> for NodeKind {
    fn from(doctype: DoctypeData) -> Self {
        NodeKind::Doctype(doctype)
    }
}

/// Attributes are almost always few; keep them inline.
pub type Attributes = SmallVec<[Attribute; 4]>;

/// Element data (qualified name + attributes in source order)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Qualified name; the renderer only writes the local part
    pub name: QualName,

    /// Attributes in source order
    pub attrs: Attributes,
}

impl ElementData {
    /// An HTML-namespace element with no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            name: QualName::new(None, ns!(html), tag.into()),
            attrs: SmallVec::new(),
        }
    }

    /// Builder-style attribute push.
    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Tag name (local part of the qualified name).
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// Value of the first attribute named `key`, ignoring namespaces.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_ref())
    }
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Prefix for adjusted foreign attributes (`xlink`, `xml`, `xmlns`)
    pub namespace: Option<String>,
    /// Local attribute name
    pub key: String,
    /// Unescaped value
    pub value: StrTendril,
}

impl Attribute {
    /// Attribute with no namespace.
    pub fn new(key: impl Into<String>, value: impl Into<StrTendril>) -> Self {
        Self {
            namespace: None,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attribute written as `namespace:key`.
    pub fn namespaced(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<StrTendril>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Doctype name and optional public/system identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// Usually `html`
    pub name: StrTendril,
    /// Public identifier; `None` when absent or empty
    pub public_id: Option<StrTendril>,
    /// System identifier; `None` when absent or empty
    pub system_id: Option<StrTendril>,
}

impl DoctypeData {
    /// Doctype with only a name.
    pub fn new(name: impl Into<StrTendril>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the public identifier. Empty strings count as absent.
    pub fn with_public_id(mut self, id: impl Into<StrTendril>) -> Self {
        self.public_id = non_empty(id.into());
        self
    }

    /// Set the system identifier. Empty strings count as absent.
    pub fn with_system_id(mut self, id: impl Into<StrTendril>) -> Self {
        self.system_id = non_empty(id.into());
        self
    }
}

fn non_empty(s: StrTendril) -> Option<StrTendril> {
    if s.is_empty() { None } else { Some(s) }
}
