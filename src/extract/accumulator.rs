//! Routing of page texts into titled sections.

use crate::model::{Heading, SectionRegistry, UNCLASSIFIED};

/// Tracks the active section and files page texts into it.
///
/// Pages must be fed in document order: a heading on a page takes effect
/// before that same page's text is filed.
#[derive(Debug, Clone)]
pub struct SectionAccumulator {
    active: String,
    registry: SectionRegistry,
}

impl SectionAccumulator {
    /// Start with the fallback section active.
    pub fn new() -> Self {
        Self {
            active: UNCLASSIFIED.to_string(),
            registry: SectionRegistry::new(),
        }
    }

    /// Title of the section that currently receives page texts.
    pub fn active_title(&self) -> &str {
        &self.active
    }

    /// Switch to the section named by `heading`, creating it on first sight.
    pub fn enter(&mut self, heading: Heading) {
        if self.registry.contains(&heading.title) {
            log::info!("Returning to section: {}", heading.title);
        } else {
            log::info!("Detected new section: {}", heading.title);
        }
        self.active = heading.title.clone();
        self.registry.get_or_insert(heading);
    }

    /// Append a normalized page text to the active section.
    ///
    /// Returns the title of the section that received it.
    pub fn file(&mut self, text: String) -> &str {
        let appended = self.registry.append(&self.active, text);
        debug_assert!(appended, "active section is always registered");
        &self.active
    }

    /// Borrow the sections collected so far.
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Finish accumulation and hand over the registry.
    pub fn into_registry(self) -> SectionRegistry {
        self.registry
    }
}

impl Default for SectionAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
