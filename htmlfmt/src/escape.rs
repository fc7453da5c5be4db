//! Escaping for text content and attribute values.

use std::io::{self, Write};

/// Write `s` with `&`, `<`, `>`, `"` replaced by named entities and carriage
/// returns by a numeric reference. Runs of safe characters go out in one write.
pub fn escape<W: Write + ?Sized>(w: &mut W, s: &str) -> io::Result<()> {
    let mut rest = s;
    while let Some(i) = rest.find(['&', '<', '>', '"', '\r']) {
        w.write_all(rest[..i].as_bytes())?;
        let entity: &[u8] = match rest.as_bytes()[i] {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'"' => b"&quot;",
            _ => b"&#13;",
        };
        w.write_all(entity)?;
        rest = &rest[i + 1..];
    }
    w.write_all(rest.as_bytes())
}
