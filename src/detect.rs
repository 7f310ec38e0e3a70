//! Input document validation.
//!
//! Checks that a path names an existing regular file whose first bytes carry
//! a `%PDF-x.y` header, before any parsing work is attempted.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Validate that `path` is an existing file with a PDF header.
///
/// Returns the PDF version string (e.g. `"1.7"`).
///
/// # Errors
/// * [`Error::DocumentNotFound`] if nothing exists at `path`
/// * [`Error::NotAFile`] if `path` is a directory or other non-file
/// * [`Error::InvalidDocument`] if the header is missing or malformed
pub fn validate_document_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        log::error!("PDF file does not exist: {}", path.display());
        return Err(Error::DocumentNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        log::error!("Path is not a file: {}", path.display());
        return Err(Error::NotAFile(path.to_path_buf()));
    }

    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    pdf_version(&header)
}

/// Read the PDF version from the leading bytes of a document.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::InvalidDocument("missing %PDF- header".to_string()));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::InvalidDocument(format!(
            "unsupported PDF version: {}",
            version
        )));
    }

    Ok(version)
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_pdf_version() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(pdf_version(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(
            pdf_version(b"<!DOCTYPE html>"),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(pdf_version(b"%PDF"), Err(Error::InvalidDocument(_))));
        assert!(!is_pdf_bytes(b"%PDF-x.y"));
    }

    #[test]
    fn test_missing_path() {
        let result = validate_document_path("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::DocumentNotFound(_))));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_document_path(dir.path());
        assert!(matches!(result, Err(Error::NotAFile(_))));
    }

    #[test]
    fn test_file_with_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n%rest").unwrap();
        assert_eq!(validate_document_path(file.path()).unwrap(), "1.4");
    }
}
