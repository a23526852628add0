/*!
 * Tests for document text extraction
 */

use eduscript::document::{DocumentFormat, extract_text};
use eduscript::errors::StageErrorKind;

use crate::common;

#[test]
fn test_extractText_withTxt_shouldReturnContent() {
    let text = extract_text("notes.txt", "Hello world.\nSecond line.".as_bytes()).unwrap();
    assert_eq!(text, "Hello world.\nSecond line.");
}

#[test]
fn test_extractText_withBomPrefixedTxt_shouldDropBom() {
    let text = extract_text("notes.txt", "\u{feff}Bonjour".as_bytes()).unwrap();
    assert_eq!(text, "Bonjour");
}

#[test]
fn test_extractText_withInvalidUtf8_shouldBeExtractionError() {
    let err = extract_text("notes.txt", &[0xff, 0xfe, 0x00, 0xc3]).unwrap_err();
    assert_eq!(err.kind, StageErrorKind::Extraction);
    assert!(!err.is_fatal());
}

#[test]
fn test_extractText_withDocx_shouldJoinParagraphsByLine() {
    let docx = common::build_docx(&["First paragraph.", "Second &amp; last."]).unwrap();
    let text = extract_text("lesson.docx", &docx).unwrap();
    assert_eq!(text, "First paragraph.\nSecond & last.\n");
}

#[test]
fn test_extractText_withCorruptDocx_shouldBeExtractionError() {
    let err = extract_text("lesson.docx", b"definitely not a zip").unwrap_err();
    assert_eq!(err.kind, StageErrorKind::Extraction);
}

#[test]
fn test_extractText_withCsv_shouldBeFatalUnsupportedFormat() {
    let err = extract_text("data.csv", b"a,b,c").unwrap_err();
    assert_eq!(err.kind, StageErrorKind::UnsupportedFormat);
    assert!(err.is_fatal());
    assert!(err.user_message().contains("Please upload TXT, PDF, or DOCX files."));
}

#[test]
fn test_fromFileName_withAcceptedExtensions_shouldPickReader() {
    assert_eq!(DocumentFormat::from_file_name("a.txt").unwrap(), DocumentFormat::Txt);
    assert_eq!(DocumentFormat::from_file_name("a.PDF").unwrap(), DocumentFormat::Pdf);
    assert_eq!(DocumentFormat::from_file_name("a.docx").unwrap(), DocumentFormat::Docx);
    assert!(DocumentFormat::from_file_name("a.doc").is_err());
}
