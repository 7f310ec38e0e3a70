//! Run report: what happened to each page.

use serde::{Deserialize, Serialize};

use crate::model::{Heading, SectionRegistry};
use crate::render::render_flat;

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Body text was filed into `section`.
    Kept {
        /// Section that received the text
        section: String,
        /// Normalized page text
        text: String,
    },
    /// Every line was boilerplate, or the page had no text.
    Empty,
    /// The page could not be loaded; it contributed nothing.
    Failed {
        /// Error message
        reason: String,
    },
}

/// Per-page entry of an [`ExtractionReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number
    pub number: u32,
    /// Heading detected at the top of the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<Heading>,
    /// What the page contributed
    pub outcome: PageOutcome,
}

/// Result of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Total pages in the document
    pub page_count: u32,
    /// Processed pages, in document order
    pub pages: Vec<PageRecord>,
    /// Sections in first-seen order
    pub sections: SectionRegistry,
}

impl ExtractionReport {
    /// Numbers of pages that failed to load.
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Failed { .. }))
            .map(|p| p.number)
            .collect()
    }

    /// Numbers of pages that contributed no text.
    pub fn empty_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.outcome == PageOutcome::Empty)
            .map(|p| p.number)
            .collect()
    }

    /// Number of pages whose text was kept.
    pub fn kept_count(&self) -> usize {
        self.kept_texts().count()
    }

    /// Kept page texts in document order, ignoring sections.
    pub fn kept_texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().filter_map(|p| match &p.outcome {
            PageOutcome::Kept { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// All kept page texts joined with a blank line, or `None` if no page
    /// produced text.
    pub fn flat_text(&self) -> Option<String> {
        let texts: Vec<&str> = self.kept_texts().collect();
        if texts.is_empty() {
            None
        } else {
            Some(render_flat(texts))
        }
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
