//! The reading record produced by a parse call.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Structured reading record extracted from one FictionBook document.
///
/// All fields are always present: `title` and `author` carry fallback strings
/// when the document lacks them, `body_text` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParsedDocument {
    pub title: String,
    pub author: String,
    pub cover: Option<Cover>,
    pub body_text: String,
}

/// A re-encoded cover thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Cover {
    /// Encoded image bytes in `format`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Vec<u8>,
    pub format: CoverFormat,
    pub width: u32,
    pub height: u32,
}

impl Cover {
    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Asset name for storing the cover next to a catalog entry (`cover.jpg`).
    pub fn file_name(&self) -> String {
        format!("cover.{}", self.format.extension())
    }

    /// Size of the encoded bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Image formats a cover can be re-encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoverFormat {
    /// JPEG image
    #[default]
    Jpeg,
    /// PNG image
    Png,
    /// GIF image
    Gif,
    /// WebP image
    WebP,
    /// BMP image
    Bmp,
}

impl CoverFormat {
    /// Map a detected image format to a cover format.
    ///
    /// Returns `None` for formats no enabled encoder can write (TIFF, ...),
    /// so the caller can substitute its default.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(CoverFormat::Jpeg),
            image::ImageFormat::Png => Some(CoverFormat::Png),
            image::ImageFormat::Gif => Some(CoverFormat::Gif),
            image::ImageFormat::WebP => Some(CoverFormat::WebP),
            image::ImageFormat::Bmp => Some(CoverFormat::Bmp),
            _ => None,
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            CoverFormat::Jpeg => image::ImageFormat::Jpeg,
            CoverFormat::Png => image::ImageFormat::Png,
            CoverFormat::Gif => image::ImageFormat::Gif,
            CoverFormat::WebP => image::ImageFormat::WebP,
            CoverFormat::Bmp => image::ImageFormat::Bmp,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            CoverFormat::Jpeg => "image/jpeg",
            CoverFormat::Png => "image/png",
            CoverFormat::Gif => "image/gif",
            CoverFormat::WebP => "image/webp",
            CoverFormat::Bmp => "image/bmp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            CoverFormat::Jpeg => "jpg",
            CoverFormat::Png => "png",
            CoverFormat::Gif => "gif",
            CoverFormat::WebP => "webp",
            CoverFormat::Bmp => "bmp",
        }
    }
}
