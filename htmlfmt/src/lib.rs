//! HTML pretty-printer built on html5ever.
//!
//! htmlfmt provides:
//! - **Arena DOM**: a read-only node tree in an indextree arena
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever, for whole
//!   documents and for fragments
//! - **Rendering**: re-serialization with one element per line, a
//!   configurable line prefix and indent unit, and inline elements kept in
//!   the flow of text
//!
//! # Example
//!
//! ```rust
//! use htmlfmt::{RenderOptions, format_str};
//!
//! let options = RenderOptions::new().with_indent("  ");
//! let html = format_str("<ul><li>one</li><li>two</li></ul>", &options).unwrap();
//! assert_eq!(
//!     html,
//!     "\n<html>\n  <head></head>\n  <body>\n    <ul>\n      <li>one</li>\n      <li>two</li>\n    </ul>\n  </body>\n</html>\n"
//! );
//! ```
//!
//! Trees can also be built by hand and rendered directly:
//!
//! ```rust
//! use htmlfmt::{Document, NodeKind, RenderOptions, render};
//!
//! let mut doc = Document::new();
//! let div = doc.append(doc.root, NodeKind::element("div"));
//! doc.append(div, NodeKind::element("br"));
//!
//! let mut out = Vec::new();
//! render(&mut out, &doc, div, &RenderOptions::new()).unwrap();
//! assert_eq!(out, b"\n<div><br/></div>");
//! ```

mod tracing_macros;

pub mod dom;
pub mod elements;
mod error;
mod escape;
mod format;
mod parser;
pub mod render;

pub use dom::{Attribute, DoctypeData, Document, ElementData, Fragment, NodeData, NodeKind};
pub use error::{FormatError, RenderError};
pub use escape::escape;
pub use format::{format, format_bytes, format_fragment, format_str};
pub use parser::{parse_document, parse_document_from, parse_fragment, parse_fragment_from};
pub use render::{RenderOptions, render, render_document, render_fragment};

pub use indextree::NodeId;
pub use tendril::StrTendril;
