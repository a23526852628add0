/*!
 * Plain-text extraction from uploaded documents.
 *
 * The reader is chosen from the file extension. Anything other than TXT, PDF
 * or DOCX is rejected with a fatal `UnsupportedFormat` error.
 */

use anyhow::{Context, Result, anyhow};
use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::errors::{StageError, StageErrorKind, StageResult};

/// Document formats with a text reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Extensions accepted for upload, without the dot
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["txt", "pdf", "docx"];

    /// Pick the reader from a file name's extension (case-insensitive)
    pub fn from_file_name(file_name: &str) -> StageResult<Self> {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(StageError::new(
                StageErrorKind::UnsupportedFormat,
                "Please upload TXT, PDF, or DOCX files.",
            )),
        }
    }
}

/// Extract the plain text of an uploaded document
///
/// An unsupported extension yields `UnsupportedFormat`; a reader failure yields
/// `Extraction`.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> StageResult<String> {
    let format = DocumentFormat::from_file_name(file_name)?;
    debug!("Extracting {:?} text from '{}' ({} bytes)", format, file_name, bytes.len());

    let text = match format {
        DocumentFormat::Txt => read_txt(bytes),
        DocumentFormat::Pdf => read_pdf(bytes),
        DocumentFormat::Docx => read_docx(bytes),
    };

    text.map_err(|e| StageError::new(StageErrorKind::Extraction, format!("{:#}", e)))
}

fn read_txt(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).context("Text file is not valid UTF-8")?;
    // Editors on Windows like to prepend a BOM
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn read_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow!("Failed to read PDF: {}", e))
}

/// Concatenate the text of every paragraph in `word/document.xml`, one per line
fn read_docx(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("DOCX file is not a valid archive")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX archive has no word/document.xml")?
        .read_to_string(&mut xml)
        .context("Failed to read word/document.xml")?;

    paragraphs_from_document_xml(&xml)
}

/// Walk WordprocessingML and collect run text, ending each `w:p` with a newline
pub fn paragraphs_from_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().context("Malformed document XML")? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let run = t.unescape().context("Malformed text run")?;
                text.push_str(&run);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
