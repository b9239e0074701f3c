//! Document text extraction. PDF goes through `pdf-extract`; everything else
//! is treated as a word-processor document and read with `docx-rs`.
//!
//! Only the PDF path needs an on-disk file; it is spooled to a temp file
//! that is removed when the handle drops, success or failure, so failed
//! extractions never accumulate on disk. Word documents are parsed straight
//! from the upload bytes.

use std::io::Write;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

impl DocumentKind {
    /// Dispatch on the declared media type: PDF is explicit, anything else
    /// falls through to the word-processor path.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some("application/pdf") => DocumentKind::Pdf,
            _ => DocumentKind::Word,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Word extraction failed: {0}")]
    Word(String),
}

/// Extracts plain text from an uploaded document. Blocking; run it on the
/// blocking thread pool.
pub fn extract_text(data: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => {
            // pdf-extract wants a path; the temp file is deleted on drop
            // regardless of the outcome.
            let mut file = NamedTempFile::new()?;
            file.write_all(data)?;
            pdf_extract::extract_text(file.path()).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        DocumentKind::Word => docx_text(data),
    }
}

/// Walks the docx body collecting run text, one line per paragraph.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Word(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for p_child in paragraph.children {
                if let ParagraphChild::Run(run) = p_child {
                    for r_child in run.children {
                        if let RunChild::Text(t) = r_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_dispatch() {
        assert_eq!(
            DocumentKind::from_content_type(Some("application/pdf")),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_content_type(Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )),
            DocumentKind::Word
        );
        assert_eq!(DocumentKind::from_content_type(None), DocumentKind::Word);
    }

    #[test]
    fn word_text_is_read_straight_from_the_upload_bytes() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Rust interview")),
            )
            .build()
            .pack(&mut cursor)
            .unwrap();

        let text = extract_text(cursor.get_ref(), DocumentKind::Word).unwrap();
        assert_eq!(text, "Rust interview");
    }

    #[test]
    fn corrupt_document_is_an_extraction_failure() {
        let garbage = b"definitely not a zip archive";
        assert!(extract_text(garbage, DocumentKind::Word).is_err());
        assert!(extract_text(garbage, DocumentKind::Pdf).is_err());
    }
}
