//! Error types for rendering and formatting.

use std::io;

/// Rendering failed. Whatever was written before the failure stays written.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// An [`Error`](crate::NodeKind::Error) node was reached.
    #[error("cannot render an Error node")]
    InvalidNode,

    /// A node kind with no HTML serialization was reached.
    #[error("unknown node kind: {0}")]
    UnknownNodeKind(&'static str),

    /// A void element has child nodes.
    #[error("void element <{tag}> has child nodes")]
    VoidElementHasChildren {
        /// Tag of the offending element.
        tag: String,
    },

    /// The output sink rejected a write.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parsing or rendering failed during [`crate::format`] and friends.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// Reading the input failed.
    #[error("failed to read input")]
    Read(#[source] io::Error),

    /// Rendering the parsed tree failed.
    #[error("failed to render")]
    Render(#[from] RenderError),
}
