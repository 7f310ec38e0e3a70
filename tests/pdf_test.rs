//! End-to-end tests over generated PDF files.

mod common;

use std::fs;

use common::{build_pdf, write_pdf};
use pagesift::{
    extract_sections, extract_sections_to_dir, extract_text, extract_to_file, Error,
    ExtractOptions, PageSource, PdfPageSource,
};
use tempfile::TempDir;

/// Header at the top, footer at the bottom, body in between.
const REPORT_PAGES: &[&[(&str, f32)]] = &[
    &[
        ("Quarterly Journal", 780.0),
        ("First body line", 500.0),
        ("continues here", 485.0),
        ("Page 1", 30.0),
    ],
    &[("Quarterly Journal", 780.0), ("Second page", 500.0), ("Page 2", 30.0)],
];

#[test]
fn test_flat_extraction_drops_header_and_footer() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "report.pdf", REPORT_PAGES);

    let text = extract_text(&path, &ExtractOptions::flat()).unwrap();
    assert_eq!(text, "First body line continues here\n\nSecond page");
}

#[test]
fn test_extract_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(dir.path(), "report.pdf", REPORT_PAGES);
    let output = dir.path().join("out/report.txt");

    let report = extract_to_file(&input, &output, &ExtractOptions::flat()).unwrap();
    assert_eq!(report.page_count, 2);
    assert_eq!(report.kept_count(), 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "First body line continues here\n\nSecond page"
    );
}

#[test]
fn test_flat_extraction_with_no_body_text() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(
        dir.path(),
        "furniture.pdf",
        &[&[("Header only", 790.0), ("Footer only", 10.0)]],
    );

    let output = dir.path().join("never.txt");
    let err = extract_to_file(&path, &output, &ExtractOptions::flat()).unwrap_err();
    assert!(matches!(err, Error::NoTextExtracted));
    assert!(!output.exists());
}

#[test]
fn test_segmented_extraction_from_pdf() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(
        dir.path(),
        "anthology.pdf",
        &[
            &[("Editors note", 600.0)],
            &[
                ("The Long", 700.0),
                ("Road Home", 685.0),
                ("Author: Jane Doe", 670.0),
                ("It was late.", 500.0),
                ("xxx Press 2", 30.0),
            ],
            &[("She walked on.", 500.0), ("xxx Press 3", 30.0)],
        ],
    );
    let options = ExtractOptions::segmented().with_author_marker("Author:");

    let out = dir.path().join("sections");
    let (report, files) = extract_sections_to_dir(&input, &out, options).unwrap();

    assert_eq!(
        files,
        vec![out.join("unclassified.txt"), out.join("The Long Road Home.txt")]
    );
    let section = report.sections.get("The Long Road Home").unwrap();
    assert_eq!(section.author_info, "Author: Jane Doe");
    assert_eq!(
        section.pages,
        vec![
            "The Long Road Home Author: Jane Doe It was late.",
            "She walked on."
        ]
    );
    assert_eq!(
        fs::read_to_string(&files[1]).unwrap(),
        "The Long Road Home\nAuthor: Jane Doe\n\nThe Long Road Home Author: Jane Doe It was late.\n\nShe walked on."
    );
}

#[test]
fn test_page_selection_on_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "report.pdf", REPORT_PAGES);
    let options = ExtractOptions::flat().with_pages(pagesift::PageSelection::Pages(vec![2]));

    let report = extract_sections(&path, options).unwrap();
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.flat_text().unwrap(), "Second page");
}

#[test]
fn test_parallel_pdf_extraction() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "report.pdf", REPORT_PAGES);

    let sequential = extract_text(&path, &ExtractOptions::flat()).unwrap();
    let parallel = extract_text(&path, &ExtractOptions::flat().with_parallel(true)).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_source_from_bytes() {
    let data = build_pdf(REPORT_PAGES);
    let source = PdfPageSource::from_bytes(&data).unwrap();
    assert_eq!(source.page_count(), 2);

    let page = source.page(2).unwrap();
    assert_eq!(page.text(), "Quarterly Journal\nSecond page\nPage 2");
}
