//! Byte-level helpers shared by the loader stages.

use std::borrow::Cow;

use encoding_rs::{Encoding, WINDOWS_1252};
use memchr::memmem;

/// Only the first bytes of a document are searched for an XML declaration.
const DECLARATION_WINDOW: usize = 512;

/// Decode a FictionBook payload to text.
///
/// A payload that is valid UTF-8 (with or without a BOM) is borrowed as is.
/// A BOM pins the payload to UTF-8 even when it is malformed. Otherwise the
/// encoding named in the XML declaration is used, then windows-1252.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let body = strip_bom(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Cow::Borrowed(text);
    }
    if body.len() != bytes.len() {
        tracing::debug!("payload has a UTF-8 BOM but malformed sequences, replacing them");
        return String::from_utf8_lossy(body);
    }

    let encoding = match declared_encoding(body).and_then(|label| Encoding::for_label(label.as_bytes())) {
        Some(encoding) => encoding,
        None => {
            tracing::debug!("payload is not UTF-8 and declares no usable encoding");
            WINDOWS_1252
        }
    };
    tracing::debug!(encoding = encoding.name(), "decoding non-UTF-8 payload");
    let (text, _) = encoding.decode_without_bom_handling(body);
    text
}

/// Return the `encoding` pseudo-attribute of a leading XML declaration.
///
/// ```ignore
/// assert_eq!(declared_encoding(br#"<?xml version="1.0" encoding="windows-1251"?>"#), Some("windows-1251"));
/// ```
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let bytes = strip_bom(bytes);
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    if !window.starts_with(b"<?xml") {
        return None;
    }

    let end = memmem::find(window, b"?>")?;
    let decl = &window[..end];
    let at = memmem::find(decl, b"encoding")?;

    let rest = &decl[at + b"encoding".len()..];
    let rest = trim_ascii_start(rest).strip_prefix(b"=")?;
    let rest = trim_ascii_start(rest);

    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let close = memchr::memchr(quote, value)?;
    std::str::from_utf8(&value[..close]).ok()
}

/// Strip UTF-8 BOM if present.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}
