//! Page source abstraction.
//!
//! The extraction pipeline only needs ordered pages with a height and
//! position-annotated lines. [`PageSource`] isolates that capability from
//! any concrete PDF library, so the pipeline can run over lopdf documents
//! and in-memory fixtures alike.

use crate::error::{Error, Result};
use crate::model::Page;

/// Abstract interface for paginated document access.
///
/// Pages are numbered from 1. Implementations must be shareable across
/// threads so pages can be loaded in parallel.
pub trait PageSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Load one page (1-based).
    ///
    /// A failure here is local to the page: the caller skips it and
    /// continues with the next one.
    fn page(&self, number: u32) -> Result<Page>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page(&self, number: u32) -> Result<Page> {
        (**self).page(number)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page(&self, number: u32) -> Result<Page> {
        (**self).page(number)
    }
}

/// A page source over pages already held in memory.
///
/// Individual pages can be marked as failing to exercise per-page recovery.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<std::result::Result<Page, String>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from pages, renumbering them 1..=n.
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        let mut source = Self::new();
        for page in pages {
            source.push(page);
        }
        source
    }

    /// Append a page; its number becomes its position.
    pub fn push(&mut self, mut page: Page) {
        page.number = self.pages.len() as u32 + 1;
        self.pages.push(Ok(page));
    }

    /// Append a page that fails to load with `message`.
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.pages.push(Err(message.into()));
    }

    /// Builder-style variant of [`MemorySource::push`].
    pub fn with_page(mut self, page: Page) -> Self {
        self.push(page);
        self
    }

    /// Builder-style variant of [`MemorySource::push_failure`].
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.push_failure(message);
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<Page> {
        let entry = number
            .checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .ok_or_else(|| Error::PageExtract {
                page: number,
                message: format!("page out of range (document has {} pages)", self.pages.len()),
            })?;

        entry.clone().map_err(|message| Error::PageExtract {
            page: number,
            message,
        })
    }
}
