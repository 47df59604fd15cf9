//! # fb2-reader
//!
//! A small, fast reader for FictionBook 2.0 e-books.
//!
//! ## Features
//!
//! - Reads plain `.fb2` files and zip-wrapped `.fb2.zip` containers
//! - Honors the XML declaration's encoding (UTF-8, Windows-1251, ...)
//! - Extracts title and author with stable fallbacks
//! - Produces a cover thumbnail that fits a bounding box, in its original format
//! - Linearizes the first body into plain text, one block per section
//!
//! ## Quick Start
//!
//! ```no_run
//! let doc = fb2_reader::parse_file("book.fb2.zip")?;
//!
//! println!("{} by {}", doc.title, doc.author);
//! if let Some(cover) = &doc.cover {
//!     std::fs::write(cover.file_name(), &cover.data)?;
//! }
//! println!("{}", doc.body_text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Errors
//!
//! Unreadable input, corrupt zip containers and malformed markup fail the
//! whole call with an [`Error`]. A cover that cannot be resolved or decoded
//! never fails a parse; the record simply has no cover.

pub mod container;
pub mod cover;
pub mod document;
pub mod dom;
pub mod error;
pub mod metadata;
pub mod options;
pub mod parser;
pub mod text;
pub(crate) mod util;

use std::path::Path;

pub use document::{Cover, CoverFormat, ParsedDocument};
pub use error::{Error, FormatError, Result};
pub use options::ParseOptions;
pub use parser::Fb2Parser;

/// Parse a FictionBook file from disk with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    Fb2Parser::default().parse_file(path)
}

/// Parse an in-memory FictionBook document with default options.
///
/// ```
/// let xml = br#"<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
///   <body><section><p>Hello</p></section></body>
/// </FictionBook>"#;
///
/// let doc = fb2_reader::parse_bytes(xml)?;
/// assert_eq!(doc.title, "Untitled");
/// assert_eq!(doc.body_text, "Hello");
/// # Ok::<(), fb2_reader::Error>(())
/// ```
pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedDocument> {
    Fb2Parser::default().parse_bytes(bytes)
}
