//! Raw text extraction from uploaded CV documents.
//!
//! PDFs go through `pdf-extract`. DOCX is a zip container whose body lives in
//! `word/document.xml`; the XML is walked directly so no external converter
//! is needed. TXT is decoded as UTF-8.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFormat(String),

    #[error("Failed to read {format} content: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("No readable text found in the document")]
    EmptyText,
}

/// Supported upload formats, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFormat {
    Pdf,
    Docx,
    Txt,
}

impl CvFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(CvFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(CvFormat::Docx)
        } else if lower.ends_with(".txt") {
            Some(CvFormat::Txt)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CvFormat::Pdf => "pdf",
            CvFormat::Docx => "docx",
            CvFormat::Txt => "txt",
        }
    }
}

/// Extracts raw text from an uploaded document.
/// A document that parses but yields no text (e.g. a scanned, image-only PDF)
/// is an error: downstream analysis has nothing to work with.
pub fn extract_text(content: &[u8], filename: &str) -> Result<(CvFormat, String), ExtractError> {
    let format = CvFormat::from_filename(filename)
        .ok_or_else(|| ExtractError::UnsupportedFormat(filename.to_string()))?;

    let text = match format {
        CvFormat::Pdf => extract_pdf(content)?,
        CvFormat::Docx => extract_docx(content)?,
        CvFormat::Txt => String::from_utf8(content.to_vec()).map_err(|e| ExtractError::Parse {
            format: "txt",
            message: e.to_string(),
        })?,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyText);
    }

    Ok((format, text))
}

fn extract_pdf(content: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(content).map_err(|e| ExtractError::Parse {
        format: "pdf",
        message: e.to_string(),
    })
}

/// Paragraph ends become newlines and table cells become spaces so the
/// line-based profile heuristics keep working on DOCX input.
fn extract_docx(content: &[u8]) -> Result<String, ExtractError> {
    let docx_err = |message: String| ExtractError::Parse {
        format: "docx",
        message,
    };

    let mut archive =
        zip::ZipArchive::new(Cursor::new(content)).map_err(|e| docx_err(e.to_string()))?;

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| docx_err(e.to_string()))?
        .read_to_string(&mut document)
        .map_err(|e| docx_err(e.to_string()))?;

    let mut reader = Reader::from_str(&document);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let fragment = t.unescape().map_err(|e| docx_err(e.to_string()))?;
                text.push_str(&fragment);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::End(e)) if e.name().as_ref() == b"w:tc" => text.push(' '),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:tab" => text.push('\t'),
            Ok(Event::Eof) => break,
            Err(e) => return Err(docx_err(e.to_string())),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Builds a minimal DOCX (zip with a word/document.xml) in memory.
    fn make_docx(body_xml: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(body_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_format_detection_from_extension() {
        assert_eq!(CvFormat::from_filename("cv.PDF"), Some(CvFormat::Pdf));
        assert_eq!(CvFormat::from_filename("cv.docx"), Some(CvFormat::Docx));
        assert_eq!(CvFormat::from_filename("notes.txt"), Some(CvFormat::Txt));
        assert_eq!(CvFormat::from_filename("photo.png"), None);
    }

    #[test]
    fn test_txt_extraction_roundtrips_utf8() {
        let (format, text) = extract_text("Jane Doe\nPython, SQL".as_bytes(), "cv.txt").unwrap();
        assert_eq!(format, CvFormat::Txt);
        assert_eq!(text, "Jane Doe\nPython, SQL");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = extract_text(b"data", "cv.png").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("cv.png"));
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        let err = extract_text(b"   \n\t  ", "cv.txt").unwrap_err();
        assert!(matches!(err, ExtractError::EmptyText));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let docx = make_docx(
            "<w:document><w:body>\
             <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Skills: Python</w:t></w:r></w:p>\
             </w:body></w:document>",
        );
        let (format, text) = extract_text(&docx, "cv.docx").unwrap();
        assert_eq!(format, CvFormat::Docx);
        assert_eq!(text, "Jane Doe\nSkills: Python\n");
    }

    #[test]
    fn test_docx_table_cells_are_space_separated() {
        let docx = make_docx(
            "<w:document><w:body><w:tbl><w:tr>\
             <w:tc><w:p><w:r><w:t>Python</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>Expert</w:t></w:r></w:p></w:tc>\
             </w:tr></w:tbl></w:body></w:document>",
        );
        let (_, text) = extract_text(&docx, "cv.docx").unwrap();
        assert_eq!(text, "Python\n Expert\n ");
    }

    #[test]
    fn test_docx_without_document_xml_fails() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default();
            writer.start_file("other.xml", options).unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text(&cursor.into_inner(), "cv.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { format: "docx", .. }));
    }

    #[test]
    fn test_non_zip_bytes_fail_as_docx() {
        let err = extract_text(b"definitely not a zip", "cv.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { format: "docx", .. }));
    }
}
