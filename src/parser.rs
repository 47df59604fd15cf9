//! The parse pipeline: container, tree, then the field extractors.

use std::io::Read;
use std::path::Path;

use crate::container::unwrap_container;
use crate::cover::extract_cover;
use crate::document::ParsedDocument;
use crate::dom::Document;
use crate::error::Result;
use crate::metadata::{extract_author, extract_title};
use crate::options::ParseOptions;
use crate::text::extract_body_text;

/// Reusable FictionBook parser.
///
/// Holds only immutable options, so one parser can serve any number of
/// threads. Every call builds and drops its own tree and image buffers.
///
/// # Example
///
/// ```no_run
/// use fb2_reader::{Fb2Parser, ParseOptions};
///
/// let parser = Fb2Parser::new(ParseOptions::default().with_cover_box(200, 300));
/// let doc = parser.parse_file("book.fb2.zip")?;
/// println!("{} by {}", doc.title, doc.author);
/// # Ok::<(), fb2_reader::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fb2Parser {
    options: ParseOptions,
}

impl Fb2Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read and parse a `.fb2` or zipped `.fb2.zip` file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading FictionBook file");
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }

    /// Parse from any [`Read`] source.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<ParsedDocument> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Parse an in-memory document, plain or zip-wrapped.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedDocument> {
        let payload = unwrap_container(bytes)?;
        let dom = Document::parse(&payload, &self.options.namespace)?;
        tracing::debug!(nodes = dom.len(), "document tree loaded");
        Ok(self.extract(&dom))
    }

    /// Build the reading record from a loaded tree.
    pub fn extract(&self, dom: &Document) -> ParsedDocument {
        let cover = if self.options.extract_cover {
            extract_cover(dom, &self.options)
        } else {
            None
        };

        ParsedDocument {
            title: extract_title(dom, &self.options),
            author: extract_author(dom, &self.options),
            cover,
            body_text: extract_body_text(dom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FormatError};

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
  <description>
    <title-info>
      <author><first-name>Лев</first-name><last-name>Толстой</last-name></author>
      <book-title>Война и мир</book-title>
    </title-info>
  </description>
  <body><section><p>Текст.</p></section></body>
</FictionBook>"#;

    #[test]
    fn test_parse_minimal_document() {
        let doc = Fb2Parser::default().parse_bytes(MINIMAL.as_bytes()).unwrap();
        assert_eq!(
            doc,
            ParsedDocument {
                title: "Война и мир".into(),
                author: "Лев Толстой".into(),
                cover: None,
                body_text: "Текст.".into(),
            }
        );
    }

    #[test]
    fn test_parse_reader_matches_bytes() {
        let parser = Fb2Parser::default();
        let from_reader = parser.parse_reader(MINIMAL.as_bytes()).unwrap();
        assert_eq!(from_reader, parser.parse_bytes(MINIMAL.as_bytes()).unwrap());
    }

    #[test]
    fn test_truncated_document_fails() {
        let cut = MINIMAL.find("<p>").unwrap();
        let truncated = &MINIMAL[..cut];
        let err = Fb2Parser::default().parse_bytes(truncated.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Fb2Parser::default()
            .parse_file("/nonexistent/book.fb2")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_custom_namespace() {
        let xml = MINIMAL.replace(
            "http://www.gribuser.ru/xml/fictionbook/2.0",
            "urn:example:fictionbook",
        );
        let default = Fb2Parser::default().parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(default.title, "Untitled");

        let custom = Fb2Parser::new(ParseOptions::default().with_namespace("urn:example:fictionbook"))
            .parse_bytes(xml.as_bytes())
            .unwrap();
        assert_eq!(custom.title, "Война и мир");
    }

    #[test]
    fn test_empty_input_is_format_error() {
        let err = Fb2Parser::default().parse_bytes(b"").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::NoRootElement)));
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Fb2Parser>();
    }
}
