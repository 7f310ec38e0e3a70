//! Line reconstruction for PDF pages.
//!
//! Walks a page's content stream, collects positioned text spans, and groups
//! them into lines in top-to-bottom reading order. Each line carries its top
//! offset measured down from the top edge of the page, which is what the
//! header/footer band filter compares against.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::Line;

/// Leading used by `T*` until a `TL`/`TD` operator sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// A text span with position information, in PDF user space (y grows up).
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new span, estimating its width from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Approximate top of the glyph box (baseline plus ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line from spans, ordering them by X.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self { spans }
    }

    /// Highest glyph top in the line, in user space.
    pub fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(TextSpan::top)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Combined text of all spans.
    ///
    /// A space is inserted where the gap between spans is wider than a
    /// fraction of a character, except between CJK/kana characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);
                let char_count = span.text.chars().count().max(1);
                let space_threshold = span.width / char_count as f32 * 0.2;

                let both_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > space_threshold && !both_spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }
}

/// Extracts position-annotated lines from lopdf pages.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract the lines of a page, top to bottom.
    ///
    /// `page_top` is the upper edge of the page box in user space; line
    /// offsets are measured down from it.
    pub fn extract_page_lines(&self, page_id: ObjectId, page_top: f32) -> Result<Vec<Line>> {
        let spans = self.extract_page_spans(page_id)?;
        let lines = group_spans_into_lines(spans);

        Ok(lines
            .iter()
            .filter_map(|line| {
                let text = line.text();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(Line::at(text, page_top - line.top()))
                }
            })
            .collect())
    }

    /// Extract text spans from a page with position information.
    pub fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::InvalidDocument(e.to_string()))?;
        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Get the decompressed content stream(s) of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content has no text
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => stream_content(s),
                _ => Err(Error::InvalidDocument("invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    let Object::Reference(r) = obj else { continue };
                    let Ok(Object::Stream(s)) = self.doc.get_object(*r) else {
                        continue;
                    };
                    match stream_content(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::warn!("Skipping unreadable content stream {:?}: {}", r, e),
                    }
                }
                Ok(content)
            }
            _ => Err(Error::InvalidDocument("invalid content stream".to_string())),
        }
    }

    /// Walk text operators and emit positioned spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let content = lopdf::content::Content::decode(content)?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix.reset();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_name = name.clone();
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| get_number(o).unwrap_or(0.0))
                            .collect();
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(arr)) => self.decode_array(fonts, &font_name, arr),
                            _ => String::new(),
                        },
                        "\"" => self.decode_operand(fonts, &font_name, op.operands.get(2)),
                        _ => self.decode_operand(fonts, &font_name, op.operands.first()),
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = matrix.position();
                        spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn decode_operand(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        operand: Option<&Object>,
    ) -> String {
        match operand {
            Some(Object::String(bytes, _)) => self.decode_text(fonts, font_name, bytes),
            _ => String::new(),
        }
    }

    /// Decode a `TJ` array. Large negative kerning values are word breaks.
    fn decode_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        items: &[Object],
    ) -> String {
        // 1/1000 text space units
        const WORD_GAP: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            let adjustment = match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_text(fonts, font_name, bytes));
                    continue;
                }
                Object::Integer(n) => -(*n as f32),
                Object::Real(n) => -*n,
                _ => continue,
            };

            if adjustment > WORD_GAP
                && !combined.ends_with([' ', '\u{00A0}'])
                && combined
                    .chars()
                    .last()
                    .is_some_and(|c| !is_spaceless_script_char(c))
            {
                combined.push(' ');
            }
        }
        combined
    }

    /// Decode bytes with the font's encoding, falling back to simple decoding.
    fn decode_text(
        &self,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        if let Some(font) = fonts.get(font_name) {
            if let Ok(encoding) = font.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Group spans into lines by baseline, top of page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward, so descending Y is top-to-bottom
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Text matrix tracking the current text position.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    /// Reset position at `BT`; leading persists across text objects.
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Raw bytes of a content stream, inflated when it declares a `/Filter`.
fn stream_content(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

/// Extract a number from a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
    // Fullwidth forms
    || (0xFF00..=0xFFEF).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, 10.0)
    }

    #[test]
    fn test_group_spans_top_to_bottom() {
        let spans = vec![
            span("bottom", 72.0, 100.0),
            span("world", 130.0, 700.0),
            span("hello", 72.0, 701.0),
        ];
        let lines = group_spans_into_lines(spans);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "hello world");
        assert_eq!(lines[1].text(), "bottom");
    }

    #[test]
    fn test_adjacent_spans_not_spaced() {
        // "ab" is 2 chars * 10pt * 0.5 = 10pt wide
        let line = TextLine::from_spans(vec![span("ab", 0.0, 0.0), span("cd", 10.0, 0.0)]);
        assert_eq!(line.text(), "abcd");
    }

    #[test]
    fn test_cjk_spans_not_spaced() {
        let line = TextLine::from_spans(vec![span("中文", 0.0, 0.0), span("文本", 50.0, 0.0)]);
        assert_eq!(line.text(), "中文文本");
    }

    #[test]
    fn test_line_top() {
        let line = TextLine::from_spans(vec![span("a", 0.0, 700.0)]);
        assert!((line.top() - 708.0).abs() < 0.01);
    }

    #[test]
    fn test_text_matrix_leading() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 720.0);
        m.leading = 14.0;
        m.next_line();
        assert_eq!(m.position(), (72.0, 706.0));

        m.reset();
        assert_eq!(m.position(), (0.0, 0.0));
        assert_eq!(m.leading, 14.0);
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0xE9]), "H\u{e9}");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_get_number() {
        assert_eq!(get_number(&Object::Integer(42)), Some(42.0));
        assert_eq!(get_number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(get_number(&Object::Null), None);
    }
}
