//! Title/author heading detection.
//!
//! A heading is a short title, possibly wrapped over several lines,
//! followed by a line tagged with the author marker. Only the first few raw
//! lines of a page are inspected, before any boilerplate filtering.

use crate::model::Heading;
use crate::parser::ExtractOptions;

/// Shortest line, in characters, that can be an author line.
const MIN_AUTHOR_LINE_CHARS: usize = 4;

/// Detects the title/author heading at the top of a page.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    marker: String,
    max_lines: usize,
}

impl TitleDetector {
    /// Create a detector for `marker`, inspecting at most `max_lines` lines.
    pub fn new(marker: impl Into<String>, max_lines: usize) -> Self {
        Self {
            marker: marker.into(),
            max_lines,
        }
    }

    /// Create a detector from extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self::new(options.author_marker.clone(), options.heading_lines)
    }

    /// Split the leading lines of `text` into a title and an author line.
    ///
    /// Returns `None` when fewer than two non-empty lines lead the page or
    /// none of them after the first carries the author marker.
    pub fn detect(&self, text: &str) -> Option<Heading> {
        let lines: Vec<&str> = text
            .lines()
            .take(self.max_lines)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() < 2 {
            return None;
        }

        let author_idx = (1..lines.len()).find(|&i| self.is_author_line(lines[i]))?;
        let heading = Heading::new(lines[..author_idx].join(" "), lines[author_idx]);

        log::debug!("Detected title: {}", heading.title);
        log::debug!("Detected author line: {}", heading.author_info);
        Some(heading)
    }

    fn is_author_line(&self, line: &str) -> bool {
        line.chars().count() >= MIN_AUTHOR_LINE_CHARS && line.contains(self.marker.as_str())
    }
}

impl Default for TitleDetector {
    fn default() -> Self {
        Self::from_options(&ExtractOptions::default())
    }
}
