//! Titled sections and the registry that collects them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Title of the section that collects pages seen before any heading.
pub const UNCLASSIFIED: &str = "unclassified";

/// A title/author heading found at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Title text, wrapped lines joined with single spaces
    pub title: String,
    /// The author line, verbatim after trimming
    pub author_info: String,
}

impl Heading {
    /// Create a heading.
    pub fn new(title: impl Into<String>, author_info: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_info: author_info.into(),
        }
    }
}

/// A named accumulation of page texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title (unique within a registry)
    pub title: String,
    /// Author line recorded when the section was first seen
    pub author_info: String,
    /// Normalized page texts in document order
    pub pages: Vec<String>,
}

impl Section {
    /// Create an empty section.
    pub fn new(title: impl Into<String>, author_info: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_info: author_info.into(),
            pages: Vec::new(),
        }
    }

    /// Check if no non-blank page text was ever added.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }

    /// Number of page texts collected.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Insertion-ordered mapping from title to [`Section`].
///
/// A fresh registry holds only the [`UNCLASSIFIED`] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionRegistry {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl SectionRegistry {
    /// Create a registry holding only the fallback section.
    pub fn new() -> Self {
        let mut registry = Self {
            sections: Vec::new(),
            index: HashMap::new(),
        };
        registry.get_or_insert(Heading::new(UNCLASSIFIED, ""));
        registry
    }

    /// Look up the section for `heading.title`, creating it if absent.
    ///
    /// An existing section keeps its original author line.
    pub fn get_or_insert(&mut self, heading: Heading) -> &mut Section {
        let idx = match self.index.get(&heading.title) {
            Some(&idx) => idx,
            None => {
                let idx = self.sections.len();
                self.index.insert(heading.title.clone(), idx);
                self.sections
                    .push(Section::new(heading.title, heading.author_info));
                idx
            }
        };
        &mut self.sections[idx]
    }

    /// Append a page text to the section named `title`.
    ///
    /// Returns `false` if no such section exists.
    pub fn append(&mut self, title: &str, text: String) -> bool {
        match self.index.get(title) {
            Some(&idx) => {
                self.sections[idx].pages.push(text);
                true
            }
            None => false,
        }
    }

    /// Get a section by title.
    pub fn get(&self, title: &str) -> Option<&Section> {
        self.index.get(title).map(|&idx| &self.sections[idx])
    }

    /// Check if a section with this title exists.
    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    /// All sections in first-seen order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Sections that have at least one non-blank page text.
    pub fn non_empty(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_empty())
    }

    /// Number of sections, including empty ones.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false: the fallback section is present from creation.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Section>> for SectionRegistry {
    fn from(sections: Vec<Section>) -> Self {
        let index = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.title.clone(), i))
            .collect();
        Self { sections, index }
    }
}

impl From<SectionRegistry> for Vec<Section> {
    fn from(registry: SectionRegistry) -> Self {
        registry.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_fallback() {
        let registry = SectionRegistry::new();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(UNCLASSIFIED));
        assert_eq!(registry.non_empty().count(), 0);
    }

    #[test]
    fn test_existing_title_keeps_author() {
        let mut registry = SectionRegistry::new();
        registry.get_or_insert(Heading::new("Title", "作者名: A"));
        registry.get_or_insert(Heading::new("Title", "作者名: B"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Title").unwrap().author_info, "作者名: A");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut registry = SectionRegistry::new();
        registry.get_or_insert(Heading::new("T", ""));
        assert!(registry.append("T", "one".to_string()));
        assert!(registry.append("T", "two".to_string()));
        assert!(!registry.append("missing", "x".to_string()));

        assert_eq!(registry.get("T").unwrap().pages, vec!["one", "two"]);
    }

    #[test]
    fn test_insertion_order() {
        let mut registry = SectionRegistry::new();
        registry.get_or_insert(Heading::new("B", ""));
        registry.get_or_insert(Heading::new("A", ""));
        let titles: Vec<_> = registry.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec![UNCLASSIFIED, "B", "A"]);
    }

    #[test]
    fn test_blank_pages_count_as_empty() {
        let mut section = Section::new("T", "");
        section.pages.push("   ".to_string());
        assert!(section.is_empty());
        section.pages.push("text".to_string());
        assert!(!section.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_keeps_index() {
        let mut registry = SectionRegistry::new();
        registry.get_or_insert(Heading::new("T", "a"));
        registry.append("T", "body".to_string());

        let json = serde_json::to_string(&registry).unwrap();
        let back: SectionRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("T").unwrap().pages, vec!["body"]);
    }
}
