//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page as delivered by a page source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page height in points
    pub height: f32,

    /// Text lines in reading order
    pub lines: Vec<Line>,
}

impl Page {
    /// Create an empty page with the given number and height.
    pub fn new(number: u32, height: f32) -> Self {
        Self {
            number,
            height,
            lines: Vec::new(),
        }
    }

    /// Create a page whose lines carry no position.
    pub fn from_text(number: u32, height: f32, text: &str) -> Self {
        Self {
            number,
            height,
            lines: text.split('\n').map(Line::new).collect(),
        }
    }

    /// Add a line to the end of the page.
    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Builder-style variant of [`Page::push_line`].
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Raw page text: all lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the page has no visible text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }

    /// Top offset of the first line whose text equals `text` exactly.
    ///
    /// When a line repeats on the page, the first occurrence wins.
    pub fn line_top_offset(&self, text: &str) -> Option<f32> {
        self.lines
            .iter()
            .find(|l| l.text == text)
            .and_then(|l| l.top)
    }
}

/// One line of page text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Raw line text
    pub text: String,

    /// Distance from the top edge of the page, growing downward.
    /// `None` when the source cannot locate the line.
    pub top: Option<f32>,
}

impl Line {
    /// Create a line with unknown position.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            top: None,
        }
    }

    /// Create a line at the given top offset.
    pub fn at(text: impl Into<String>, top: f32) -> Self {
        Self {
            text: text.into(),
            top: Some(top),
        }
    }
}
