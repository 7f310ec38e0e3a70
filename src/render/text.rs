//! Plain text rendering of extraction results.

use crate::model::Section;

/// Characters that are not allowed in file names on common platforms.
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Separator between page texts.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Replace reserved characters in a section title so it can be used as a
/// file name. Nothing else is changed.
pub fn sanitize_file_name(title: &str) -> String {
    title
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Render a section as a text file body: title line, author line, a blank
/// line, then the page texts separated by blank lines.
pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    out.push_str(&section.title);
    out.push('\n');
    out.push_str(&section.author_info);
    out.push_str("\n\n");
    out.push_str(&section.pages.join(PAGE_SEPARATOR));
    out
}

/// Join page texts into a single flat document.
pub fn render_flat<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().collect::<Vec<_>>().join(PAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_reserved() {
        assert_eq!(sanitize_file_name("a/b:c?"), "a_b_c_");
        assert_eq!(sanitize_file_name(r#"<x>"y"\z|*"#), "_x__y__z__");
        assert_eq!(sanitize_file_name("春の歌 Vol. 2"), "春の歌 Vol. 2");
    }

    #[test]
    fn test_render_section_layout() {
        let mut section = Section::new("Essay", "作者名: A");
        section.pages.push("one".to_string());
        section.pages.push("two".to_string());

        assert_eq!(render_section(&section), "Essay\n作者名: A\n\none\n\ntwo");
    }

    #[test]
    fn test_render_section_without_author() {
        let mut section = Section::new("unclassified", "");
        section.pages.push("body".to_string());
        assert_eq!(render_section(&section), "unclassified\n\n\nbody");
    }

    #[test]
    fn test_render_flat() {
        assert_eq!(render_flat(["a", "b", "c"]), "a\n\nb\n\nc");
        assert_eq!(render_flat(std::iter::empty()), "");
    }
}
