//! Indenting renderer for the arena DOM.
//!
//! The tree is written depth-first. Block elements start on a fresh line
//! indented by their depth; inline elements (see [`crate::elements`]) never
//! break the line. Whether a block element's end tag gets its own line
//! depends on its children:
//!
//! - `p` and `pre` never do
//! - any inline element child keeps the end tag on the same line
//! - a first child that is non-blank text keeps the end tag on the same line
//! - empty elements render as `<tag></tag>`
//!
//! Void elements self-close (`<br/>`). Text inside raw-text elements
//! (`script`, `style`, ...) is written verbatim, and a `<plaintext>` element
//! stops all further output for the node being rendered: neither it nor any
//! ancestor gets an end tag.

use std::io::Write;
use std::ops::ControlFlow;

use indextree::NodeId;

use crate::dom::{Document, DoctypeData, ElementData, Fragment, NodeKind};
use crate::elements::{
    drops_leading_newline, is_inline_element, is_raw_text_element, is_void_element,
};
use crate::error::RenderError;
use crate::escape::escape;
use crate::{debug, trace};

/// Line prefix and indent unit for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Written once after every inserted newline, before any indentation
    /// (default: "")
    pub prefix: String,
    /// Repeated once per nesting level (default: "")
    pub indent: String,
}

impl RenderOptions {
    /// Create new default options (no prefix, no indentation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-line prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// Render the subtree at `node` to `out`.
///
/// Rendering is best effort: re-parsing the output yields a tree equivalent
/// to the input only when the input is well-formed (for example, no `<a>`
/// nested inside another `<a>`). Trees produced by the parser usually are.
///
/// No trailing newline is written. Reaching a `<plaintext>` element ends
/// rendering early and still counts as success.
pub fn render<W: Write + ?Sized>(
    out: &mut W,
    doc: &Document,
    node: NodeId,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    match Renderer::new(out, doc, options).render_root(node)? {
        // A <plaintext> halt is a normal end of output.
        ControlFlow::Break(()) | ControlFlow::Continue(()) => Ok(()),
    }
}

/// Render a whole parsed document followed by a single newline.
pub fn render_document<W: Write + ?Sized>(
    out: &mut W,
    doc: &Document,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    debug!(prefix = ?options.prefix, indent = ?options.indent, "rendering document");
    render(out, doc, doc.root, options)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Render each top-level node of a fragment in order, then a single newline.
pub fn render_fragment<W: Write + ?Sized>(
    out: &mut W,
    fragment: &Fragment,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    debug!(
        nodes = fragment.nodes.len(),
        prefix = ?options.prefix,
        indent = ?options.indent,
        "rendering fragment"
    );
    // Each node is rendered on its own, so a <plaintext> halt only ends the
    // node that contains it.
    for node in fragment.nodes() {
        render(out, &fragment.document, node, options)?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

/// `Break` once a `<plaintext>` element has been written.
type Step = Result<ControlFlow<()>, RenderError>;

struct Renderer<'a, W: Write + ?Sized> {
    out: &'a mut W,
    doc: &'a Document,
    options: &'a RenderOptions,
}

impl<'a, W: Write + ?Sized> Renderer<'a, W> {
    fn new(out: &'a mut W, doc: &'a Document, options: &'a RenderOptions) -> Self {
        Self { out, doc, options }
    }

    fn render_root(&mut self, node: NodeId) -> Step {
        let step = self.render_node(node, 0);
        match &step {
            Ok(ControlFlow::Break(())) => {
                trace!("<plaintext> reached, nothing more will be rendered");
            }
            Err(_err) => {
                debug!(error = %_err, "render failed");
            }
            Ok(ControlFlow::Continue(())) => {}
        }
        step
    }

    fn render_node(&mut self, id: NodeId, depth: usize) -> Step {
        let doc = self.doc;
        match doc.kind(id) {
            NodeKind::Error => Err(RenderError::InvalidNode),
            NodeKind::Text(text) => {
                escape(&mut *self.out, text)?;
                Ok(ControlFlow::Continue(()))
            }
            NodeKind::Document => self.render_children(id, depth),
            NodeKind::Comment(text) => {
                self.out.write_all(b"<!--")?;
                self.out.write_all(text.as_bytes())?;
                self.out.write_all(b"-->")?;
                Ok(ControlFlow::Continue(()))
            }
            NodeKind::Doctype(doctype) => {
                self.write_doctype(doctype)?;
                Ok(ControlFlow::Continue(()))
            }
            NodeKind::ProcessingInstruction { .. } => {
                Err(RenderError::UnknownNodeKind("processing instruction"))
            }
            NodeKind::Element(elem) => self.render_element(id, elem, depth),
        }
    }

    fn render_children(&mut self, id: NodeId, depth: usize) -> Step {
        let doc = self.doc;
        for child in doc.children(id) {
            if self.render_node(child, depth)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn render_element(&mut self, id: NodeId, elem: &ElementData, depth: usize) -> Step {
        let doc = self.doc;
        let tag = elem.tag();
        let void = is_void_element(tag);
        if void && doc.has_children(id) {
            return Err(RenderError::VoidElementHasChildren {
                tag: tag.to_owned(),
            });
        }

        if !is_inline_element(tag) {
            self.newline(depth)?;
        }
        self.write_start_tag(elem)?;
        if void {
            self.out.write_all(b"/>")?;
            return Ok(ControlFlow::Continue(()));
        }
        self.out.write_all(b">")?;

        // The parser eats one newline right after these start tags.
        if drops_leading_newline(tag)
            && let Some(first) = doc.first_child(id)
            && let NodeKind::Text(text) = doc.kind(first)
            && text.starts_with('\n')
        {
            self.out.write_all(b"\n")?;
        }

        if is_raw_text_element(tag) {
            for child in doc.children(id) {
                if let NodeKind::Text(text) = doc.kind(child) {
                    self.out.write_all(text.as_bytes())?;
                } else if self.render_node(child, depth + 1)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            if tag == "plaintext" {
                // Everything after <plaintext> is text to a parser, so no
                // end tag for it or any ancestor.
                return Ok(ControlFlow::Break(()));
            }
        } else if self.render_children(id, depth + 1)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        if self.wants_end_tag_newline(id, elem) {
            self.newline(depth)?;
        }
        self.out.write_all(b"</")?;
        self.out.write_all(tag.as_bytes())?;
        self.out.write_all(b">")?;
        Ok(ControlFlow::Continue(()))
    }

    fn write_start_tag(&mut self, elem: &ElementData) -> Result<(), RenderError> {
        self.out.write_all(b"<")?;
        self.out.write_all(elem.tag().as_bytes())?;
        for attr in &elem.attrs {
            self.out.write_all(b" ")?;
            if let Some(namespace) = &attr.namespace {
                self.out.write_all(namespace.as_bytes())?;
                self.out.write_all(b":")?;
            }
            self.out.write_all(attr.key.as_bytes())?;
            self.out.write_all(b"=\"")?;
            escape(&mut *self.out, &attr.value)?;
            self.out.write_all(b"\"")?;
        }
        Ok(())
    }

    fn write_doctype(&mut self, doctype: &DoctypeData) -> Result<(), RenderError> {
        self.out.write_all(b"<!DOCTYPE ")?;
        self.out.write_all(doctype.name.as_bytes())?;
        let public_id = doctype.public_id.as_deref().filter(|id| !id.is_empty());
        let system_id = doctype.system_id.as_deref().filter(|id| !id.is_empty());
        match (public_id, system_id) {
            (Some(public), system) => {
                self.out.write_all(b" PUBLIC ")?;
                self.write_quoted(public)?;
                if let Some(system) = system {
                    self.out.write_all(b" ")?;
                    self.write_quoted(system)?;
                }
            }
            (None, Some(system)) => {
                self.out.write_all(b" SYSTEM ")?;
                self.write_quoted(system)?;
            }
            (None, None) => {}
        }
        self.out.write_all(b">")?;
        Ok(())
    }

    /// Double quotes unless `s` contains one; valid identifiers never
    /// contain both kinds.
    fn write_quoted(&mut self, s: &str) -> Result<(), RenderError> {
        let quote: &[u8] = if s.contains('"') { b"'" } else { b"\"" };
        self.out.write_all(quote)?;
        self.out.write_all(s.as_bytes())?;
        self.out.write_all(quote)?;
        Ok(())
    }

    fn wants_end_tag_newline(&self, id: NodeId, elem: &ElementData) -> bool {
        let doc = self.doc;
        let tag = elem.tag();
        if is_inline_element(tag) || matches!(tag, "p" | "pre") {
            return false;
        }
        let has_inline_child = doc
            .children(id)
            .any(|child| doc.element(child).is_some_and(|e| is_inline_element(e.tag())));
        if has_inline_child {
            return false;
        }
        match doc.first_child(id).map(|first| doc.kind(first)) {
            None => false,
            Some(NodeKind::Text(text)) => text.trim().is_empty(),
            Some(_) => true,
        }
    }

    fn newline(&mut self, depth: usize) -> Result<(), RenderError> {
        self.out.write_all(b"\n")?;
        self.out.write_all(self.options.prefix.as_bytes())?;
        for _ in 0..depth {
            self.out.write_all(self.options.indent.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Attribute;

    fn rendered(doc: &Document, node: NodeId, options: &RenderOptions) -> String {
        let mut out = Vec::new();
        render(&mut out, doc, node, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn two_spaces() -> RenderOptions {
        RenderOptions::new().with_indent("  ")
    }

    #[test]
    fn test_block_children_are_indented() {
        let mut doc = Document::new();
        let ul = doc.append(doc.root, NodeKind::element("ul"));
        for item in ["one", "two"] {
            let li = doc.append(ul, NodeKind::element("li"));
            doc.append(li, NodeKind::text(item));
        }

        assert_eq!(
            rendered(&doc, doc.root, &two_spaces()),
            "\n<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_prefix_comes_before_indent() {
        let mut doc = Document::new();
        let div = doc.append(doc.root, NodeKind::element("div"));
        doc.append(div, NodeKind::element("hr"));

        let options = RenderOptions::new().with_prefix("> ").with_indent("\t");
        assert_eq!(
            rendered(&doc, doc.root, &options),
            "\n> <div>\n> \t<hr/>\n> </div>"
        );
    }

    #[test]
    fn test_inline_child_keeps_end_tag_on_line() {
        // Any inline child suppresses the end-tag newline, even next to
        // block children.
        let mut doc = Document::new();
        let div = doc.append(doc.root, NodeKind::element("div"));
        let span = doc.append(div, NodeKind::element("span"));
        doc.append(span, NodeKind::text("x"));
        let p = doc.append(div, NodeKind::element("p"));
        doc.append(p, NodeKind::text("y"));

        assert_eq!(
            rendered(&doc, doc.root, &two_spaces()),
            "\n<div><span>x</span>\n  <p>y</p></div>"
        );
    }

    #[test]
    fn test_whitespace_only_text_gets_end_tag_newline() {
        let mut doc = Document::new();
        let div = doc.append(doc.root, NodeKind::element("div"));
        doc.append(div, NodeKind::text("\n  "));

        assert_eq!(
            rendered(&doc, doc.root, &two_spaces()),
            "\n<div>\n  \n</div>"
        );
    }

    #[test]
    fn test_empty_element_on_one_line() {
        let mut doc = Document::new();
        doc.append(doc.root, NodeKind::element("section"));
        assert_eq!(rendered(&doc, doc.root, &two_spaces()), "\n<section></section>");
    }

    #[test]
    fn test_attributes_in_order_and_escaped() {
        let mut doc = Document::new();
        let elem = ElementData::new("svg")
            .with_attr(Attribute::new("title", r#"a "b" & <c>"#))
            .with_attr(Attribute::namespaced("xlink", "href", "#id"));
        doc.append(doc.root, elem.into());

        assert_eq!(
            rendered(&doc, doc.root, &RenderOptions::new()),
            "\n<svg title=\"a &quot;b&quot; &amp; &lt;c&gt;\" xlink:href=\"#id\"></svg>"
        );
    }

    #[test]
    fn test_comment_is_verbatim() {
        let mut doc = Document::new();
        let div = doc.append(doc.root, NodeKind::element("div"));
        doc.append(div, NodeKind::comment(" a < b & c "));

        assert_eq!(
            rendered(&doc, div, &RenderOptions::new()),
            "\n<div><!-- a < b & c -->\n</div>"
        );
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let mut doc = Document::new();
        let script = doc.append(doc.root, NodeKind::element("script"));
        doc.append(script, NodeKind::text("if (a < b && c) {}"));

        assert_eq!(
            rendered(&doc, doc.root, &RenderOptions::new()),
            "\n<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_pre_leading_newline_is_doubled() {
        let mut doc = Document::new();
        let pre = doc.append(doc.root, NodeKind::element("pre"));
        doc.append(pre, NodeKind::text("\ncode"));

        assert_eq!(
            rendered(&doc, doc.root, &RenderOptions::new()),
            "\n<pre>\n\ncode</pre>"
        );
    }

    #[test]
    fn test_plaintext_halts_everything() {
        let mut doc = Document::new();
        let body = doc.append(doc.root, NodeKind::element("body"));
        let div = doc.append(body, NodeKind::element("div"));
        let plaintext = doc.append(div, NodeKind::element("plaintext"));
        doc.append(plaintext, NodeKind::text("<b>raw</b>"));
        doc.append(body, NodeKind::element("footer"));

        assert_eq!(
            rendered(&doc, doc.root, &RenderOptions::new()),
            "\n<body>\n<div>\n<plaintext><b>raw</b>"
        );
    }

    #[test]
    fn test_void_with_children_fails_before_writing_it() {
        let mut doc = Document::new();
        let div = doc.append(doc.root, NodeKind::element("div"));
        let br = doc.append(div, NodeKind::element("br"));
        doc.append(br, NodeKind::text("oops"));

        let mut out = Vec::new();
        let err = render(&mut out, &doc, doc.root, &RenderOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::VoidElementHasChildren { ref tag } if tag == "br"
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "\n<div>");
    }

    #[test]
    fn test_error_node_fails_immediately() {
        let mut doc = Document::new();
        let error = doc.append(doc.root, NodeKind::Error);

        let mut out = Vec::new();
        let err = render(&mut out, &doc, error, &RenderOptions::new()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidNode));
        assert!(out.is_empty());
    }

    #[test]
    fn test_processing_instruction_is_unknown_kind() {
        let mut doc = Document::new();
        doc.append(
            doc.root,
            NodeKind::ProcessingInstruction {
                target: "xml".into(),
                data: "version=\"1.0\"".into(),
            },
        );

        let mut out = Vec::new();
        let err = render(&mut out, &doc, doc.root, &RenderOptions::new()).unwrap_err();
        assert!(matches!(err, RenderError::UnknownNodeKind(_)));
    }

    #[test]
    fn test_doctype_variants() {
        let cases = [
            (DoctypeData::new("html"), "<!DOCTYPE html>"),
            (
                DoctypeData::new("html").with_public_id("-//W3C//DTD HTML 4.01//EN"),
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN">"#,
            ),
            (
                DoctypeData::new("html")
                    .with_public_id("-//W3C//DTD HTML 4.01//EN")
                    .with_system_id("http://www.w3.org/TR/html4/strict.dtd"),
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
            ),
            (
                DoctypeData::new("html").with_system_id("about:legacy-compat"),
                r#"<!DOCTYPE html SYSTEM "about:legacy-compat">"#,
            ),
            (
                DoctypeData::new("html").with_public_id(r#"say "hi""#),
                r#"<!DOCTYPE html PUBLIC 'say "hi"'>"#,
            ),
        ];

        for (doctype, expected) in cases {
            let mut doc = Document::new();
            let node = doc.append(doc.root, doctype.into());
            assert_eq!(rendered(&doc, node, &RenderOptions::new()), expected);
        }
    }

    #[test]
    fn test_empty_doctype_identifiers_are_absent() {
        let mut doc = Document::new();
        let doctype = DoctypeData {
            name: "html".into(),
            public_id: Some("".into()),
            system_id: Some("".into()),
        };
        let node = doc.append(doc.root, doctype.into());
        assert_eq!(rendered(&doc, node, &RenderOptions::new()), "<!DOCTYPE html>");

        let mut doc = Document::new();
        let doctype = DoctypeData {
            name: "html".into(),
            public_id: Some("".into()),
            system_id: Some("about:legacy-compat".into()),
        };
        let node = doc.append(doc.root, doctype.into());
        assert_eq!(
            rendered(&doc, node, &RenderOptions::new()),
            r#"<!DOCTYPE html SYSTEM "about:legacy-compat">"#
        );
    }

    #[test]
    fn test_element_fragment_starts_at_depth_zero() {
        let mut doc = Document::new();
        let html = doc.append(doc.root, NodeKind::element("html"));
        let body = doc.append(html, NodeKind::element("body"));
        let div = doc.append(body, NodeKind::element("div"));
        doc.append(div, NodeKind::element("hr"));

        assert_eq!(
            rendered(&doc, body, &two_spaces()),
            "\n<body>\n  <div>\n    <hr/>\n  </div>\n</body>"
        );
    }
}
