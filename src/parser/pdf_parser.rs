//! PDF page source using lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::{pdf_version, validate_document_path};
use crate::error::{Error, Result};
use crate::model::Page;

use super::backend::PageSource;
use super::layout::{get_number, LayoutAnalyzer};

/// Letter height, used when a page has no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// [`PageSource`] backed by a lopdf document.
pub struct PdfPageSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    version: String,
}

impl PdfPageSource {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::DocumentNotFound`] or [`Error::NotAFile`] for bad
    /// paths, and [`Error::InvalidDocument`] when the file is not a PDF,
    /// cannot be parsed, or has no pages.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        validate_document_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| {
            log::error!("Invalid or unreadable PDF {}: {}", path.display(), e);
            Error::from(e)
        })?;
        Self::from_document(doc)
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        pdf_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            log::error!("PDF contains no pages");
            return Err(Error::InvalidDocument("document has no pages".to_string()));
        }

        let version = doc.version.to_string();
        Ok(Self {
            doc,
            pages,
            version,
        })
    }

    /// PDF version string (e.g. "1.7").
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolve a page's MediaBox as `(bottom, top)` in user space,
    /// following inherited attributes up the page tree.
    fn vertical_extent(&self, page_id: ObjectId) -> (f32, f32) {
        let mut current = Some(page_id);
        // Guard against cyclic Parent links
        for _ in 0..32 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };

            let media_box = dict.get(b"MediaBox").ok().and_then(|obj| match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            });
            if let Some(Ok(array)) = media_box.map(Object::as_array) {
                let nums: Vec<f32> = array.iter().filter_map(get_number).collect();
                if nums.len() >= 4 {
                    let (bottom, top) = (nums[1].min(nums[3]), nums[1].max(nums[3]));
                    if top > bottom {
                        return (bottom, top);
                    }
                }
            }

            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        (0.0, DEFAULT_PAGE_HEIGHT)
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<Page> {
        let page_id = *self.pages.get(&number).ok_or_else(|| Error::PageExtract {
            page: number,
            message: format!("page out of range (document has {} pages)", self.pages.len()),
        })?;

        let (bottom, top) = self.vertical_extent(page_id);
        let lines = LayoutAnalyzer::new(&self.doc)
            .extract_page_lines(page_id, top)
            .map_err(|e| Error::PageExtract {
                page: number,
                message: e.to_string(),
            })?;

        Ok(Page {
            number,
            height: top - bottom,
            lines,
        })
    }
}
