//! Parse-and-render entry points.

use std::io::{Read, Write};

use crate::error::FormatError;
use crate::parser::{parse_document_from, parse_fragment_from};
use crate::render::{RenderOptions, render_document, render_fragment};

/// Reformat a full HTML document read from `src` into `out`.
pub fn format<R: Read, W: Write>(
    src: R,
    out: &mut W,
    options: &RenderOptions,
) -> Result<(), FormatError> {
    let doc = parse_document_from(src).map_err(FormatError::Read)?;
    render_document(out, &doc, options)?;
    Ok(())
}

/// Reformat an HTML fragment (parsed as the contents of a `<div>`).
pub fn format_fragment<R: Read, W: Write>(
    src: R,
    out: &mut W,
    options: &RenderOptions,
) -> Result<(), FormatError> {
    let fragment = parse_fragment_from(src).map_err(FormatError::Read)?;
    render_fragment(out, &fragment, options)?;
    Ok(())
}

/// Reformat a document held in memory.
pub fn format_bytes(src: &[u8], options: &RenderOptions) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::with_capacity(src.len() + src.len() / 4);
    format(src, &mut out, options)?;
    Ok(out)
}

/// Reformat a document held in a string.
pub fn format_str(src: &str, options: &RenderOptions) -> Result<String, FormatError> {
    let out = format_bytes(src.as_bytes(), options)?;
    // Parsed text is already UTF-8 and the renderer only adds ASCII.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_spaces() -> RenderOptions {
        RenderOptions::new().with_indent("  ")
    }

    #[test]
    fn test_format_str_document() {
        let out = format_str(
            "<html><body><p>Hi <b>there</b></p></body></html>",
            &two_spaces(),
        )
        .unwrap();
        assert_eq!(
            out,
            "\n<html>\n  <head></head>\n  <body>\n    <p>Hi <b>there</b></p>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_format_fragment() {
        let mut out = Vec::new();
        format_fragment("<ul><li>a</li></ul>tail".as_bytes(), &mut out, &two_spaces()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n<ul>\n  <li>a</li>\n</ul>tail\n"
        );
    }

    #[test]
    fn test_format_bytes_empty_input() {
        let out = format_bytes(b"", &RenderOptions::new()).unwrap();
        assert_eq!(out, b"\n<html>\n<head></head>\n<body></body>\n</html>\n");
    }
}
