//! Parser configuration.

use crate::document::CoverFormat;

/// Canonical FictionBook 2.0 namespace URI.
pub const FB2_NAMESPACE: &str = "http://www.gribuser.ru/xml/fictionbook/2.0";

/// XLink namespace used by `<image l:href="#...">` references.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Title used when the document has no usable `<book-title>`.
pub const UNTITLED: &str = "Untitled";

/// Author used when the first `<author>` has no name parts.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Options controlling how a document is parsed.
///
/// The defaults describe stock FictionBook 2.0 handling. Namespaces are
/// carried here rather than in any global parser state so each lookup is
/// explicit about what it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub namespace: String,
    pub xlink_namespace: String,
    pub max_cover_width: u32,
    pub max_cover_height: u32,
    pub default_cover_format: CoverFormat,
    pub untitled: String,
    pub unknown_author: String,
    /// Skip cover decoding entirely (text-only consumers).
    pub extract_cover: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            namespace: FB2_NAMESPACE.to_string(),
            xlink_namespace: XLINK_NAMESPACE.to_string(),
            max_cover_width: 400,
            max_cover_height: 600,
            default_cover_format: CoverFormat::Jpeg,
            untitled: UNTITLED.to_string(),
            unknown_author: UNKNOWN_AUTHOR.to_string(),
            extract_cover: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_xlink_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.xlink_namespace = namespace.into();
        self
    }

    /// Bounding box a cover thumbnail must fit in. Zero is clamped to one.
    pub fn with_cover_box(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_cover_width = max_width.max(1);
        self.max_cover_height = max_height.max(1);
        self
    }

    pub fn with_default_cover_format(mut self, format: CoverFormat) -> Self {
        self.default_cover_format = format;
        self
    }

    pub fn with_fallbacks(
        mut self,
        untitled: impl Into<String>,
        unknown_author: impl Into<String>,
    ) -> Self {
        self.untitled = untitled.into();
        self.unknown_author = unknown_author.into();
        self
    }

    pub fn with_cover(mut self, extract_cover: bool) -> Self {
        self.extract_cover = extract_cover;
        self
    }
}
