//! Zip container detection and FictionBook payload extraction.
//!
//! FictionBook files are commonly distributed as `book.fb2.zip`: a plain zip
//! archive holding one `.fb2` entry. Anything that is not a zip archive is
//! passed through untouched.

use std::borrow::Cow;
use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::Result;

/// Leading bytes of a zip local file header.
const ZIP_SIGNATURE: &[u8] = b"PK";

/// Upper bound on the buffer reserved from an entry's declared size.
///
/// The declared size comes from the archive headers and is untrusted; the
/// buffer still grows past this as real data arrives.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Extension of the markup entry inside a container.
const FB2_EXTENSION: &str = ".fb2";

/// Check whether a buffer starts with the zip signature.
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_SIGNATURE)
}

/// Return the FictionBook payload of `bytes`.
///
/// For a zip archive this is the decompressed content of the first entry,
/// in archive order, whose name ends in `.fb2`. An archive without such an
/// entry, or a buffer that is not an archive, yields the input unchanged.
/// A corrupt archive is an [`Error::Container`](crate::Error::Container).
pub fn unwrap_container(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !is_zip(bytes) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let Some(index) = find_fb2_entry(&archive) else {
        tracing::debug!(entries = archive.len(), "zip archive holds no .fb2 entry, using raw bytes");
        return Ok(Cow::Borrowed(bytes));
    };

    let mut entry = archive.by_index(index)?;
    tracing::debug!(name = entry.name(), size = entry.size(), "extracting FictionBook entry");

    let mut payload = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
    entry.read_to_end(&mut payload).map_err(ZipError::Io)?;
    Ok(Cow::Owned(payload))
}

fn find_fb2_entry<R: Read + Seek>(archive: &ZipArchive<R>) -> Option<usize> {
    (0..archive.len()).find(|&i| archive.name_for_index(i).is_some_and(has_fb2_extension))
}

fn has_fb2_extension(name: &str) -> bool {
    name.len() >= FB2_EXTENSION.len()
        && name
            .get(name.len() - FB2_EXTENSION.len()..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(FB2_EXTENSION))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;
    use crate::error::Error;

    fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let xml = b"<FictionBook/>";
        let out = unwrap_container(xml).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), xml);
    }

    #[test]
    fn test_extracts_first_fb2_entry() {
        let archive = zip_with(&[
            ("readme.txt", b"not this"),
            ("book.fb2", b"<first/>"),
            ("other.fb2", b"<second/>"),
        ]);
        let out = unwrap_container(&archive).unwrap();
        assert_eq!(out.as_ref(), b"<first/>");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let archive = zip_with(&[("dir/BOOK.FB2", b"<upper/>")]);
        assert_eq!(unwrap_container(&archive).unwrap().as_ref(), b"<upper/>");
    }

    #[test]
    fn test_archive_without_fb2_returns_original() {
        let archive = zip_with(&[("notes.txt", b"hello"), ("book.fb2.bak", b"nope")]);
        let out = unwrap_container(&archive).unwrap();
        assert_eq!(out.as_ref(), archive.as_slice());
    }

    #[test]
    fn test_corrupt_archive_is_container_error() {
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(&[0xAB; 64]);
        let err = unwrap_container(&bytes).unwrap_err();
        assert!(matches!(err, Error::Container(_)));
    }

    #[test]
    fn test_has_fb2_extension() {
        assert!(has_fb2_extension("book.fb2"));
        assert!(has_fb2_extension("a/b/Book.Fb2"));
        assert!(!has_fb2_extension("fb2"));
        assert!(!has_fb2_extension("book.fb2.zip"));
        assert!(!has_fb2_extension("книга"));
    }
}
