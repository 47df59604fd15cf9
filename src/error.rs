//! Error types for fb2-reader operations.
//!
//! Only the fatal paths live here. Cover extraction failures are absorbed
//! inside [`crate::cover`] and surface as an absent cover instead.

use thiserror::Error;

/// Errors that abort a parse call.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input looked like a zip archive but its structure is corrupt.
    #[error("container error: {0}")]
    Container(#[from] zip::result::ZipError),

    /// The payload is not well-formed FictionBook markup.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Diagnostics for markup that cannot be loaded into a document tree.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("XML syntax error at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("unexpected end of document, <{0}> is not closed")]
    UnclosedElement(String),

    #[error("unexpected closing tag </{0}>")]
    UnexpectedEndTag(String),

    #[error("unbound namespace prefix `{0}`")]
    UnknownPrefix(String),

    #[error("unknown entity reference `&{0};`")]
    UnknownEntity(String),

    #[error("document has no root element")]
    NoRootElement,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text content outside the root element")]
    ContentOutsideRoot,
}

pub type Result<T> = std::result::Result<T, Error>;
