//! HTML5 parsing into the arena DOM via html5ever's `TreeSink`.
//!
//! html5ever runs the full tree-construction algorithm, including
//! browser-compatible error recovery, and calls back into [`ArenaSink`] to
//! build nodes. The resulting [`Document`] keeps every node kind the renderer
//! cares about: doctype (with identifiers), elements, text, comments.

use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, Read};

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{LocalName, Namespace, ParseOpts, QualName, local_name, ns};
use indextree::{Arena, NodeId};
use tendril::StrTendril;

use crate::dom::{Attribute, DoctypeData, Document, ElementData, Fragment, NodeData, NodeKind};
use crate::trace;

/// Parse a full HTML document.
///
/// Never fails: malformed markup is recovered the way browsers recover it.
pub fn parse_document(html: &str) -> Document {
    html5ever::parse_document(ArenaSink::new(), ParseOpts::default()).one(StrTendril::from(html))
}

/// Parse a full HTML document from a byte stream (decoded as UTF-8, lossily).
pub fn parse_document_from(mut src: impl Read) -> io::Result<Document> {
    html5ever::parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut src)
}

/// Parse an HTML fragment as the contents of a `<div>`.
pub fn parse_fragment(html: &str) -> Fragment {
    fragment_parser()
        .one(StrTendril::from(html))
        .into_fragment()
}

/// Parse an HTML fragment from a byte stream (decoded as UTF-8, lossily).
pub fn parse_fragment_from(mut src: impl Read) -> io::Result<Fragment> {
    let doc = fragment_parser().from_utf8().read_from(&mut src)?;
    Ok(doc.into_fragment())
}

fn fragment_parser() -> html5ever::Parser<ArenaSink> {
    let context = QualName::new(None, ns!(html), local_name!("div"));
    html5ever::parse_fragment(ArenaSink::new(), ParseOpts::default(), context, Vec::new(), false)
}

impl Document {
    /// Fragment parsing nests everything under a synthetic `<html>` root;
    /// its children are the fragment.
    fn into_fragment(self) -> Fragment {
        let nodes = match self.html() {
            Some(html) => self.children(html).collect(),
            None => Vec::new(),
        };
        Fragment {
            document: self,
            nodes,
        }
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building the arena DOM
struct ArenaSink {
    /// The arena being built - wrapped in RefCell for interior mutability
    arena: RefCell<Arena<NodeData>>,

    /// Document node
    document: NodeId,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData::new(NodeKind::Document));
        ArenaSink {
            arena: RefCell::new(arena),
            document,
        }
    }

    fn new_node(&self, kind: NodeKind) -> NodeId {
        self.arena.borrow_mut().new_node(NodeData::new(kind))
    }
}

fn convert_attribute(attr: html5ever::Attribute) -> Attribute {
    Attribute {
        namespace: attr.name.prefix.map(|prefix| prefix.to_string()),
        key: attr.name.local.to_string(),
        value: attr.value,
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Document {
            arena: self.arena.into_inner(),
            root: self.document,
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own
        trace!("parse error: {}", _msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Rendering is the same in every mode
    }

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        match &arena[*target].get().kind {
            NodeKind::Element(elem) => OwnedElemName(elem.name.clone()),
            // Not an element - return placeholder
            _ => OwnedElemName(QualName::new(None, ns!(html), local_name!(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        self.new_node(NodeKind::Element(ElementData {
            name,
            attrs: attrs.into_iter().map(convert_attribute).collect(),
        }))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::Comment(text))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::ProcessingInstruction { target, data })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node, like browsers do
                if let Some(last) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = &mut arena[last].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }
                let text_node = arena.new_node(NodeData::new(NodeKind::Text(text)));
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                if let Some(prev) = arena[*sibling].previous_sibling()
                    && let NodeKind::Text(existing) = &mut arena[prev].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }
                let text_node = arena.new_node(NodeData::new(NodeKind::Text(text)));
                sibling.insert_before(text_node, &mut arena);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        // Foster parenting: insert before the table if it is still attached
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let doctype = DoctypeData::new(name)
            .with_public_id(public_id)
            .with_system_id(system_id);
        let node = self.new_node(NodeKind::Doctype(doctype));
        self.document.append(node, &mut self.arena.borrow_mut());
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs.into_iter().map(convert_attribute) {
                let present = elem
                    .attrs
                    .iter()
                    .any(|a| a.namespace == attr.namespace && a.key == attr.key);
                if !present {
                    elem.attrs.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}
