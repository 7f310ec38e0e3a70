//! Page sources and extraction options.

mod backend;
mod layout;
pub(crate) mod options;
mod pdf_parser;

pub use backend::{MemorySource, PageSource};
pub use layout::{group_spans_into_lines, LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ExtractOptions, PageSelection, DEFAULT_AUTHOR_MARKER, DEFAULT_FOOTER_KEYWORD};
pub use pdf_parser::PdfPageSource;
