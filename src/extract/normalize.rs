//! Whitespace normalization of page text.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Joins retained lines into one page-level text block.
#[derive(Debug, Clone)]
pub struct Normalizer {
    whitespace: Regex,
    nfc: bool,
}

impl Normalizer {
    /// Create a normalizer; `nfc` additionally applies Unicode NFC.
    pub fn new(nfc: bool) -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
            nfc,
        }
    }

    /// Join lines with a space, collapse whitespace runs, and trim.
    pub fn normalize_lines(&self, lines: &[&str]) -> String {
        self.normalize(&lines.join(" "))
    }

    /// Collapse every whitespace run to one space and trim both ends.
    pub fn normalize(&self, text: &str) -> String {
        let collapsed = self.whitespace.replace_all(text, " ");
        let trimmed = collapsed.trim();
        if self.nfc {
            trimmed.nfc().collect()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(false)
    }
}
