//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::extract::FilterStrategy;

/// Default author marker that tags the line under a title.
pub const DEFAULT_AUTHOR_MARKER: &str = "作者名";

/// Default footer keyword used by the segmented preset.
pub const DEFAULT_FOOTER_KEYWORD: &str = "xxx";

/// Options for a single extraction run.
///
/// Built once, validated once, then shared read-only by every page.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// How header/footer lines are recognized
    pub filter: FilterStrategy,

    /// Whether pages are checked for a title/author heading
    pub detect_titles: bool,

    /// Substring that marks the author line of a heading
    pub author_marker: String,

    /// How many leading lines of a page may form a heading
    pub heading_lines: usize,

    /// Reserved title-area fraction. Validated, not used by detection.
    pub title_threshold: f32,

    /// Apply Unicode NFC after whitespace normalization
    pub normalize_unicode: bool,

    /// Process pages on the rayon pool
    pub parallel: bool,

    /// Pages to process
    pub pages: PageSelection,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat-mode preset: header/footer band 0.2..0.8, no sectioning.
    pub fn flat() -> Self {
        Self {
            filter: FilterStrategy::band(0.2, 0.8),
            detect_titles: false,
            ..Self::default()
        }
    }

    /// Segmented-mode preset: keyword footer filter and title detection.
    pub fn segmented() -> Self {
        Self {
            filter: FilterStrategy::keyword(DEFAULT_FOOTER_KEYWORD),
            detect_titles: true,
            ..Self::default()
        }
    }

    /// Set the boilerplate filter.
    pub fn with_filter(mut self, filter: FilterStrategy) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable title detection.
    pub fn with_titles(mut self, detect: bool) -> Self {
        self.detect_titles = detect;
        self
    }

    /// Set the author marker.
    pub fn with_author_marker(mut self, marker: impl Into<String>) -> Self {
        self.author_marker = marker.into();
        self
    }

    /// Set the number of leading lines inspected for a heading.
    pub fn with_heading_lines(mut self, lines: usize) -> Self {
        self.heading_lines = lines;
        self
    }

    /// Set the reserved title threshold.
    pub fn with_title_threshold(mut self, threshold: f32) -> Self {
        self.title_threshold = threshold;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Check thresholds and markers before any page is processed.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.pages.validate()?;

        if !in_unit_interval(self.title_threshold) {
            return Err(Error::InvalidConfig(format!(
                "title threshold must be in (0, 1), got {}",
                self.title_threshold
            )));
        }
        if self.detect_titles {
            if self.author_marker.is_empty() {
                return Err(Error::InvalidConfig(
                    "author marker must not be empty".to_string(),
                ));
            }
            if self.heading_lines < 2 {
                return Err(Error::InvalidConfig(format!(
                    "heading lines must be at least 2, got {}",
                    self.heading_lines
                )));
            }
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            filter: FilterStrategy::band(0.2, 0.8),
            detect_titles: true,
            author_marker: DEFAULT_AUTHOR_MARKER.to_string(),
            heading_lines: 4,
            title_threshold: 0.15,
            normalize_unicode: false,
            parallel: false,
            pages: PageSelection::All,
        }
    }
}

/// Check `0 < value < 1`.
pub(crate) fn in_unit_interval(value: f32) -> bool {
    value > 0.0 && value < 1.0
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Several ranges, sorted and non-overlapping
    Ranges(Vec<RangeInclusive<u32>>),
    /// Specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Reject page 0 and reversed ranges.
    pub fn validate(&self) -> Result<()> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Range(range) => check_range(range),
            PageSelection::Ranges(ranges) => ranges.iter().try_for_each(check_range),
            PageSelection::Pages(pages) => {
                if pages.contains(&0) {
                    Err(Error::InvalidConfig(
                        "page numbers start at 1".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    ///
    /// Overlapping and adjacent parts are merged, so the result never
    /// grows with the number of pages covered.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let mut ranges = s
            .split(',')
            .map(|part| parse_range(part.trim()))
            .collect::<Result<Vec<_>>>()?;

        ranges.sort_by_key(|r| *r.start());
        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    if range.end() > last.end() {
                        *last = *last.start()..=*range.end();
                    }
                }
                _ => merged.push(range),
            }
        }

        if merged.len() == 1 {
            Ok(PageSelection::Range(merged.remove(0)))
        } else {
            Ok(PageSelection::Ranges(merged))
        }
    }
}

fn parse_range(part: &str) -> Result<RangeInclusive<u32>> {
    let page = |p: &str| {
        p.trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidConfig(format!("invalid page range: {}", part)))
    };

    let range = match part.split_once('-') {
        Some((start, end)) => page(start)?..=page(end)?,
        None => {
            let p = page(part)?;
            p..=p
        }
    };
    check_range(&range)?;
    Ok(range)
}

fn check_range(range: &RangeInclusive<u32>) -> Result<()> {
    if *range.start() == 0 {
        return Err(Error::InvalidConfig(format!(
            "page numbers start at 1, got {}-{}",
            range.start(),
            range.end()
        )));
    }
    if range.start() > range.end() {
        return Err(Error::InvalidConfig(format!(
            "page range {}-{} is reversed",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}
