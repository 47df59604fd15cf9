//! Fixture builders shared by the integration tests.
//!
//! Documents, containers and cover images are generated in memory so the
//! tests do not depend on binary fixtures.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const FB2_NS: &str = "http://www.gribuser.ru/xml/fictionbook/2.0";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Builder for FictionBook documents.
#[derive(Debug, Clone, Default)]
pub struct BookBuilder {
    title: Option<String>,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    cover_href: Option<String>,
    sections: Vec<String>,
    binaries: Vec<(String, String, String)>,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> Self {
        self.first_name = first.map(str::to_string);
        self.middle_name = middle.map(str::to_string);
        self.last_name = last.map(str::to_string);
        self
    }

    /// Add a section holding one `<p>` per paragraph.
    pub fn section(mut self, paragraphs: &[&str]) -> Self {
        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        self.sections.push(format!("<section>{body}</section>"));
        self
    }

    /// Add a section from raw inner markup.
    pub fn raw_section(mut self, markup: &str) -> Self {
        self.sections.push(format!("<section>{markup}</section>"));
        self
    }

    pub fn cover_href(mut self, href: &str) -> Self {
        self.cover_href = Some(href.to_string());
        self
    }

    pub fn binary(mut self, id: &str, content_type: &str, base64: &str) -> Self {
        self.binaries
            .push((id.to_string(), content_type.to_string(), base64.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str(&format!(
            "<FictionBook xmlns=\"{FB2_NS}\" xmlns:l=\"{XLINK_NS}\">\n<description><title-info>\n"
        ));
        xml.push_str("<genre>prose_classic</genre>\n");
        if self.first_name.is_some() || self.middle_name.is_some() || self.last_name.is_some() {
            xml.push_str("<author>");
            for (tag, value) in [
                ("first-name", &self.first_name),
                ("middle-name", &self.middle_name),
                ("last-name", &self.last_name),
            ] {
                if let Some(value) = value {
                    xml.push_str(&format!("<{tag}>{value}</{tag}>"));
                }
            }
            xml.push_str("</author>\n");
        }
        if let Some(title) = &self.title {
            xml.push_str(&format!("<book-title>{title}</book-title>\n"));
        }
        if let Some(href) = &self.cover_href {
            xml.push_str(&format!("<coverpage><image l:href=\"{href}\"/></coverpage>\n"));
        }
        xml.push_str("<lang>ru</lang>\n</title-info></description>\n<body>\n");
        for section in &self.sections {
            xml.push_str(section);
            xml.push('\n');
        }
        xml.push_str("</body>\n");
        for (id, content_type, data) in &self.binaries {
            xml.push_str(&format!(
                "<binary id=\"{id}\" content-type=\"{content_type}\">{data}</binary>\n"
            ));
        }
        xml.push_str("</FictionBook>\n");
        xml
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.build().into_bytes()
    }
}

/// Wrap entries into an in-memory zip archive.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Encode a solid-color image and return it base64-encoded.
pub fn image_base64(width: u32, height: u32, format: ImageFormat) -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 200])));
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode image");
    base64::engine::general_purpose::STANDARD.encode(buffer)
}

/// The "Война и мир" document used across the suites.
pub fn war_and_peace() -> BookBuilder {
    BookBuilder::new()
        .title("Война и мир")
        .author(Some("Лев"), None, Some("Толстой"))
        .section(&["Текст."])
}
