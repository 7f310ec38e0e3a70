//! Error types for pagesift.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pagesift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or writing page text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The document is not a PDF, has no pages, or is corrupted.
    #[error("Invalid or unreadable document: {0}")]
    InvalidDocument(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Text could not be extracted from a single page.
    #[error("Page {page}: text extraction failed: {message}")]
    PageExtract {
        /// 1-based page number
        page: u32,
        /// Underlying failure
        message: String,
    },

    /// Writing an output file failed.
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Extraction options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No page of the document produced any body text.
    #[error("No text could be extracted from the document")]
    NoTextExtracted,
}

impl Error {
    /// Wrap an I/O error raised while writing `path`.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is local to one page and the run may continue.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Error::PageExtract { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::InvalidDocument(err.to_string()),
        }
    }
}
