//! Cover thumbnail extraction.
//!
//! A FictionBook cover is declared in the metadata as
//! `<coverpage><image l:href="#id"/></coverpage>` and stored as a base64
//! `<binary id="id">` element at the end of the document. Resolution,
//! decoding, resampling and re-encoding are all best-effort: every failure
//! ends in `None` and never aborts the parse.

use std::io::Cursor;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

use crate::document::{Cover, CoverFormat};
use crate::dom::{Document, Name, NodeId};
use crate::options::ParseOptions;

/// Standard alphabet, padding optional: FictionBook producers disagree on it.
const BINARY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a declared cover could not be produced. Only ever logged.
#[derive(Error, Debug)]
enum CoverError {
    #[error("binary payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image could not be read: {0}")]
    Read(#[from] std::io::Error),

    #[error("image could not be decoded or encoded: {0}")]
    Image(#[from] image::ImageError),
}

/// Extract and thumbnail the cover image, if the document declares one.
pub fn extract_cover(dom: &Document, options: &ParseOptions) -> Option<Cover> {
    let binary = find_cover_binary(dom, options)?;
    let payload = dom.text_content(binary);
    if payload.trim().is_empty() {
        tracing::debug!("cover binary is empty");
        return None;
    }
    let content_type = dom.attr(binary, Name::local("content-type"));

    match build_cover(&payload, content_type, options) {
        Ok(cover) => Some(cover),
        Err(e) => {
            tracing::debug!(error = %e, "dropping cover");
            None
        }
    }
}

/// Resolve `coverpage/image@xlink:href` to its `<binary>` element.
fn find_cover_binary(dom: &Document, options: &ParseOptions) -> Option<NodeId> {
    let coverpage = dom.find_descendant(dom.document(), dom.name("coverpage"))?;
    let image = dom.find_child(coverpage, dom.name("image"))?;
    let href = dom.attr(image, Name::new(&options.xlink_namespace, "href"))?;

    let id = href.trim_start_matches('#');
    if id.is_empty() {
        return None;
    }

    let binary = dom
        .descendants(dom.document())
        .find(|&node| {
            dom.is_element(node, dom.name("binary")) && dom.attr(node, Name::local("id")) == Some(id)
        });
    if binary.is_none() {
        tracing::debug!(id, "cover references a missing binary");
    }
    binary
}

fn build_cover(
    payload: &str,
    content_type: Option<&str>,
    options: &ParseOptions,
) -> Result<Cover, CoverError> {
    let bytes = decode_base64(payload)?;

    let mut reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
    if reader.format().is_none()
        && let Some(format) = content_type.and_then(ImageFormat::from_mime_type)
    {
        reader.set_format(format);
    }
    let detected = reader.format();
    let image = reader.decode()?;

    let (width, height) = fit_within(
        image.width(),
        image.height(),
        options.max_cover_width,
        options.max_cover_height,
    );
    let image = if (width, height) != (image.width(), image.height()) {
        tracing::debug!(
            from_width = image.width(),
            from_height = image.height(),
            width,
            height,
            "resizing cover"
        );
        image.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        image
    };

    let format = detected
        .and_then(CoverFormat::from_image_format)
        .unwrap_or(options.default_cover_format);
    let data = encode(image, format)?;

    Ok(Cover {
        data,
        format,
        width,
        height,
    })
}

/// Decode a `<binary>` payload, ignoring the line breaks and indentation
/// producers wrap it in.
fn decode_base64(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BINARY_ENGINE.decode(compact)
}

/// Encode into `format`, first converting pixel layouts its encoder rejects.
fn encode(image: DynamicImage, format: CoverFormat) -> Result<Vec<u8>, image::ImageError> {
    let image = match (format, image) {
        (CoverFormat::Png, image) => image,
        // JPEG has no alpha channel and only 8-bit samples
        (CoverFormat::Jpeg, image @ (DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_))) => image,
        (CoverFormat::Jpeg, image) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (_, image @ (DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_))) => image,
        (_, image) => DynamicImage::ImageRgba8(image.to_rgba8()),
    };
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), format.image_format())?;
    Ok(buffer)
}

/// Dimensions of a `width` x `height` image scaled down to fit the box.
///
/// Aspect ratio is preserved (within rounding) and images already inside
/// the box keep their size. Neither result is ever zero.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    // Compare width/max_width against height/max_height without floats
    let (w, h) = (width as u64, height as u64);
    let (mw, mh) = (max_width as u64, max_height as u64);
    if w * mh >= h * mw {
        let scaled = (h * mw + w / 2) / w;
        (max_width, (scaled as u32).clamp(1, max_height))
    } else {
        let scaled = (w * mh + h / 2) / h;
        ((scaled as u32).clamp(1, max_width), max_height)
    }
}
