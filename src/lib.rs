//! # pagesift
//!
//! Body-text extraction from PDF documents.
//!
//! pagesift reads a PDF page by page, drops running headers and footers,
//! and either writes the remaining text as one flat file or splits it into
//! titled sections (one file per section) by spotting title/author headings
//! at the top of pages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagesift::{extract_text, ExtractOptions};
//!
//! fn main() -> pagesift::Result<()> {
//!     let text = extract_text("book.pdf", &ExtractOptions::flat())?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Sections
//!
//! ```no_run
//! use pagesift::{extract_sections, ExtractOptions};
//!
//! let report = extract_sections("anthology.pdf", ExtractOptions::segmented()).unwrap();
//! for section in report.sections.non_empty() {
//!     println!("{} ({} pages)", section.title, section.page_count());
//! }
//! ```
//!
//! ## Features
//!
//! - **Two boilerplate filters**: vertical header/footer band or footer keyword
//! - **Heading detection**: wrapped titles followed by an author line
//! - **Partial failure**: unreadable pages are skipped and reported
//! - **Parallel processing**: pages are processed on the rayon pool, then
//!   filed in document order

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, pdf_version, validate_document_path};
pub use error::{Error, Result};
pub use extract::{
    ExtractionReport, Extractor, FilterStrategy, Normalizer, PageOutcome, PageRecord,
    SectionAccumulator, TitleDetector,
};
pub use model::{Heading, Line, Page, Section, SectionRegistry, UNCLASSIFIED};
pub use parser::{ExtractOptions, MemorySource, PageSelection, PageSource, PdfPageSource};

use std::path::{Path, PathBuf};

/// Open a PDF file as a page source.
///
/// # Example
///
/// ```no_run
/// use pagesift::{open, PageSource};
///
/// let source = open("document.pdf").unwrap();
/// println!("Pages: {}", source.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<PdfPageSource> {
    PdfPageSource::open(path)
}

/// Extract the body text of a PDF as one flat string.
///
/// Page texts are joined with a blank line, ignoring section boundaries.
/// Fails with [`Error::NoTextExtracted`] when no page produced text.
pub fn extract_text<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<String> {
    let report = extract_sections(path, options.clone())?;
    report.flat_text().ok_or(Error::NoTextExtracted)
}

/// Run the full pipeline over a PDF file and return the run report.
///
/// Options are validated before the file is opened.
pub fn extract_sections<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractionReport> {
    options.validate()?;
    let source = open(path)?;
    Ok(Extractor::new(source, options)?.run())
}

/// Extract flat text from `input` and write it to `output`.
///
/// Nothing is written if no page produced text.
pub fn extract_to_file<P, Q>(input: P, output: Q, options: &ExtractOptions) -> Result<ExtractionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let report = extract_sections(input, options.clone())?;
    let text = report.flat_text().ok_or(Error::NoTextExtracted)?;
    render::write_flat(output, &text)?;
    Ok(report)
}

/// Extract sections from `input` and write one file per non-empty section
/// into `dir`.
///
/// Returns the run report and the written file paths.
pub fn extract_sections_to_dir<P, Q>(
    input: P,
    dir: Q,
    options: ExtractOptions,
) -> Result<(ExtractionReport, Vec<PathBuf>)>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let report = extract_sections(input, options)?;
    let files = render::write_sections(dir, &report.sections)?;
    Ok((report, files))
}
