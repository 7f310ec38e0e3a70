//! Header/footer removal.

use crate::error::{Error, Result};
use crate::model::Page;
use crate::parser::options::in_unit_interval;

/// Strategy for deciding which lines of a page are boilerplate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStrategy {
    /// Keep lines whose top offset lies strictly inside the band
    /// `(height * header, height * footer)`.
    Band {
        /// Header fraction of page height
        header: f32,
        /// Footer fraction of page height
        footer: f32,
    },
    /// Drop every line containing the marker substring.
    Keyword {
        /// Footer marker
        marker: String,
    },
}

impl FilterStrategy {
    /// Positional strategy with header/footer fractions.
    pub fn band(header: f32, footer: f32) -> Self {
        FilterStrategy::Band { header, footer }
    }

    /// Keyword strategy with a literal marker.
    pub fn keyword(marker: impl Into<String>) -> Self {
        FilterStrategy::Keyword {
            marker: marker.into(),
        }
    }

    /// Check that thresholds lie in `(0, 1)` with header below footer,
    /// or that the keyword is non-empty.
    pub fn validate(&self) -> Result<()> {
        match self {
            FilterStrategy::Band { header, footer } => {
                if !in_unit_interval(*header) || !in_unit_interval(*footer) {
                    return Err(Error::InvalidConfig(format!(
                        "header/footer thresholds must be in (0, 1), got {}/{}",
                        header, footer
                    )));
                }
                if header >= footer {
                    return Err(Error::InvalidConfig(format!(
                        "header threshold {} must be below footer threshold {}",
                        header, footer
                    )));
                }
                Ok(())
            }
            FilterStrategy::Keyword { marker } => {
                if marker.is_empty() {
                    return Err(Error::InvalidConfig(
                        "footer keyword must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Return the body lines of `page`, in page order.
    pub fn retain<'a>(&self, page: &'a Page) -> Vec<&'a str> {
        match self {
            FilterStrategy::Band { header, footer } => {
                let header_height = page.height * header;
                let footer_height = page.height * footer;
                log::debug!(
                    "Page {}: height={:.1}, keeping {:.1} < top < {:.1}",
                    page.number,
                    page.height,
                    header_height,
                    footer_height
                );

                page.lines
                    .iter()
                    .filter(|line| match line.top {
                        Some(top) => header_height < top && top < footer_height,
                        // Unlocatable lines are treated as furniture
                        None => false,
                    })
                    .map(|line| line.text.as_str())
                    .collect()
            }
            FilterStrategy::Keyword { marker } => page
                .lines
                .iter()
                .filter(|line| !line.text.contains(marker.as_str()))
                .map(|line| line.text.as_str())
                .collect(),
        }
    }
}
