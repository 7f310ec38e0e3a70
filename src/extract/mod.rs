//! Page-text segmentation and filtering pipeline.
//!
//! For each page, in document order:
//! 1. the title detector inspects the raw leading lines and may switch the
//!    active section;
//! 2. the boilerplate filter drops header/footer lines;
//! 3. the normalizer joins the remaining lines into one text block;
//! 4. the accumulator files that block under the active section.
//!
//! Page loading, detection, filtering and normalization are independent per
//! page and may run in parallel. Filing always happens sequentially in
//! document order.

mod accumulator;
mod filter;
mod normalize;
mod report;
mod title;

pub use accumulator::SectionAccumulator;
pub use filter::FilterStrategy;
pub use normalize::Normalizer;
pub use report::{ExtractionReport, PageOutcome, PageRecord};
pub use title::TitleDetector;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::Heading;
use crate::parser::{ExtractOptions, PageSource};

/// A page after the per-page stages, before it is filed.
#[derive(Debug)]
struct ProcessedPage {
    number: u32,
    heading: Option<Heading>,
    body: Result<Option<String>>,
}

/// Runs the extraction pipeline over a page source.
pub struct Extractor<S: PageSource> {
    source: S,
    options: ExtractOptions,
    detector: TitleDetector,
    normalizer: Normalizer,
}

impl<S: PageSource> Extractor<S> {
    /// Create an extractor.
    ///
    /// Options are validated here, before any page is read. A source with
    /// no pages is rejected as [`Error::InvalidDocument`].
    pub fn new(source: S, options: ExtractOptions) -> Result<Self> {
        options.validate()?;

        if source.page_count() == 0 {
            return Err(Error::InvalidDocument("document has no pages".to_string()));
        }

        if options.detect_titles {
            log::debug!(
                "Title threshold {} is accepted but not used by detection",
                options.title_threshold
            );
        }

        Ok(Self {
            detector: TitleDetector::from_options(&options),
            normalizer: Normalizer::new(options.normalize_unicode),
            source,
            options,
        })
    }

    /// The options this extractor was built with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The underlying page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Process every selected page.
    pub fn run(&self) -> ExtractionReport {
        self.run_with_progress(|_, _| {})
    }

    /// Process every selected page, calling `progress(done, total)` after
    /// each page is filed.
    pub fn run_with_progress<F>(&self, mut progress: F) -> ExtractionReport
    where
        F: FnMut(u32, u32),
    {
        let page_count = self.source.page_count();
        let numbers: Vec<u32> = (1..=page_count)
            .filter(|n| self.options.pages.includes(*n))
            .collect();
        let total = numbers.len() as u32;
        log::info!(
            "Processing PDF: {} pages ({} selected)",
            page_count,
            total
        );

        let mut accumulator = SectionAccumulator::new();
        let mut records = Vec::with_capacity(numbers.len());
        let mut file = |processed: ProcessedPage, records: &mut Vec<PageRecord>| {
            records.push(self.file_page(&mut accumulator, processed));
            progress(records.len() as u32, total);
        };

        if self.options.parallel {
            // collect() keeps document order
            let processed: Vec<ProcessedPage> = numbers
                .par_iter()
                .map(|&n| self.process_page(n, page_count))
                .collect();
            for page in processed {
                file(page, &mut records);
            }
        } else {
            for &n in &numbers {
                file(self.process_page(n, page_count), &mut records);
            }
        }

        let report = ExtractionReport {
            page_count,
            pages: records,
            sections: accumulator.into_registry(),
        };

        let failed = report.failed_pages();
        if !failed.is_empty() {
            log::warn!("{} page(s) skipped after errors: {:?}", failed.len(), failed);
        }
        report
    }

    /// Load, detect, filter and normalize one page.
    fn process_page(&self, number: u32, page_count: u32) -> ProcessedPage {
        log::info!("Processing page {} of {}", number, page_count);

        let page = match self.source.page(number) {
            Ok(page) => page,
            Err(e) => {
                log::error!("Error processing page {}: {}", number, e);
                let e = if e.is_page_local() {
                    e
                } else {
                    Error::PageExtract {
                        page: number,
                        message: e.to_string(),
                    }
                };
                return ProcessedPage {
                    number,
                    heading: None,
                    body: Err(e),
                };
            }
        };

        let heading = if self.options.detect_titles {
            self.detector.detect(&page.text())
        } else {
            None
        };

        if page.is_blank() {
            log::warn!("Page {} has no extractable text", number);
            return ProcessedPage {
                number,
                heading,
                body: Ok(None),
            };
        }

        let kept = self.options.filter.retain(&page);
        log::debug!(
            "Page {}: {} raw lines, {} kept",
            number,
            page.lines.len(),
            kept.len()
        );

        let body = if kept.is_empty() {
            None
        } else {
            Some(self.normalizer.normalize_lines(&kept)).filter(|t| !t.is_empty())
        };

        ProcessedPage {
            number,
            heading,
            body: Ok(body),
        }
    }

    /// Apply a processed page to the accumulator.
    fn file_page(&self, accumulator: &mut SectionAccumulator, page: ProcessedPage) -> PageRecord {
        if let Some(heading) = &page.heading {
            accumulator.enter(heading.clone());
        }

        let outcome = match page.body {
            Ok(Some(text)) => PageOutcome::Kept {
                section: accumulator.file(text.clone()).to_string(),
                text,
            },
            Ok(None) => PageOutcome::Empty,
            Err(e) => PageOutcome::Failed {
                reason: e.to_string(),
            },
        };

        PageRecord {
            number: page.number,
            heading: page.heading,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Page, UNCLASSIFIED};
    use crate::parser::{MemorySource, PageSelection};

    fn segmented() -> ExtractOptions {
        ExtractOptions::segmented()
    }

    #[test]
    fn test_zero_pages_rejected() {
        let result = Extractor::new(MemorySource::new(), segmented());
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_invalid_options_rejected_first() {
        let options = ExtractOptions::flat().with_filter(FilterStrategy::band(0.9, 0.1));
        let result = Extractor::new(MemorySource::new(), options);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_heading_page_files_into_new_section() {
        let source = MemorySource::new()
            .with_page(Page::from_text(0, 792.0, "preface text"))
            .with_page(Page::from_text(0, 792.0, "Essay\n作者名: A\nbody  one"));

        let report = Extractor::new(source, segmented()).unwrap().run();
        let sections = &report.sections;

        assert_eq!(sections.get(UNCLASSIFIED).unwrap().pages, vec!["preface text"]);
        assert_eq!(
            sections.get("Essay").unwrap().pages,
            vec!["Essay 作者名: A body one"]
        );
        assert_eq!(report.pages[1].heading, Some(Heading::new("Essay", "作者名: A")));
    }

    #[test]
    fn test_failed_page_is_recorded_and_skipped() {
        let source = MemorySource::new()
            .with_page(Page::from_text(0, 792.0, "one"))
            .with_failure("broken")
            .with_page(Page::from_text(0, 792.0, "three"));

        let report = Extractor::new(source, segmented()).unwrap().run();
        assert_eq!(report.failed_pages(), vec![2]);
        assert_eq!(report.flat_text().unwrap(), "one\n\nthree");
    }

    /// Fails page 2 with a document-level error.
    struct CorruptPageSource;

    impl PageSource for CorruptPageSource {
        fn page_count(&self) -> u32 {
            2
        }

        fn page(&self, number: u32) -> Result<Page> {
            match number {
                2 => Err(Error::InvalidDocument("dangling reference".to_string())),
                _ => Ok(Page::from_text(0, 792.0, "fine")),
            }
        }
    }

    #[test]
    fn test_document_error_on_page_is_tagged_with_page() {
        let report = Extractor::new(CorruptPageSource, segmented()).unwrap().run();
        assert_eq!(report.failed_pages(), vec![2]);
        match &report.pages[1].outcome {
            PageOutcome::Failed { reason } => {
                assert_eq!(
                    reason,
                    "Page 2: text extraction failed: Invalid or unreadable document: dangling reference"
                );
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_page_error_is_not_wrapped_twice() {
        let source = MemorySource::new().with_failure("broken");
        let report = Extractor::new(source, segmented()).unwrap().run();
        match &report.pages[0].outcome {
            PageOutcome::Failed { reason } => {
                assert_eq!(reason.matches("Page 1:").count(), 1, "{}", reason);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_all_boilerplate_page_is_empty() {
        let source = MemorySource::new()
            .with_page(Page::from_text(0, 792.0, "xxx footer"))
            .with_page(Page::from_text(0, 792.0, ""));

        let report = Extractor::new(source, segmented()).unwrap().run();
        assert_eq!(report.empty_pages(), vec![1, 2]);
        assert_eq!(report.sections.non_empty().count(), 0);
    }

    #[test]
    fn test_band_filter_in_pipeline() {
        let page = Page::new(0, 1000.0)
            .with_line(Line::at("Journal of Things", 20.0))
            .with_line(Line::at("body", 500.0))
            .with_line(Line::at("- 3 -", 960.0));
        let source = MemorySource::from_pages([page]);

        let report = Extractor::new(source, ExtractOptions::flat()).unwrap().run();
        assert_eq!(report.flat_text().unwrap(), "body");
    }

    #[test]
    fn test_page_selection() {
        let source = MemorySource::from_pages(
            ["a", "b", "c"].map(|t| Page::from_text(0, 792.0, t)),
        );
        let options = segmented().with_pages(PageSelection::Pages(vec![1, 3]));

        let report = Extractor::new(source, options).unwrap().run();
        assert_eq!(report.page_count, 3);
        assert_eq!(report.flat_text().unwrap(), "a\n\nc");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut source = MemorySource::new();
        for i in 0..40 {
            let text = if i % 10 == 0 {
                format!("Part {}\n作者名: X\nbody {}", i / 10, i)
            } else {
                format!("body {}", i)
            };
            source.push(Page::from_text(0, 792.0, &text));
        }

        let sequential = Extractor::new(&source, segmented()).unwrap().run();
        let parallel = Extractor::new(&source, segmented().with_parallel(true))
            .unwrap()
            .run();

        assert_eq!(sequential.pages, parallel.pages);
        let seq: Vec<_> = sequential.sections.iter().cloned().collect();
        let par: Vec<_> = parallel.sections.iter().cloned().collect();
        assert_eq!(seq, par);
        assert_eq!(par.len(), 5);
        assert_eq!(par[1].pages.len(), 10);
    }

    #[test]
    fn test_progress_callback() {
        let source = MemorySource::from_pages(["a", "b"].map(|t| Page::from_text(0, 792.0, t)));
        let mut calls = Vec::new();
        Extractor::new(source, segmented())
            .unwrap()
            .run_with_progress(|done, total| calls.push((done, total)));
        assert_eq!(calls, vec![(1, 2), (2, 2)]);
    }
}
