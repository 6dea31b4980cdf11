//! Résumé text extraction.
//!
//! Pasted text is used verbatim. Uploaded files are routed by type: PDFs page
//! by page, DOCX through an ordered ladder of extraction strategies, anything
//! else as plain text. Extraction is CPU-bound and runs on the blocking pool.

pub mod docx;
pub mod pdf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::resume::{ResumeData, ResumeFile};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Resume text cannot be empty")]
    BlankText,

    #[error("No resume data provided")]
    Missing,

    #[error("{kind} file produced no text")]
    Empty { kind: DocumentKind },

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("Document extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::PlainText => "Text",
        })
    }
}

impl DocumentKind {
    pub fn detect(file: &ResumeFile) -> Self {
        let name = file.name.to_lowercase();
        match file.content_type.as_deref() {
            Some(PDF_MIME) => DocumentKind::Pdf,
            Some(DOCX_MIME) => DocumentKind::Docx,
            _ if name.ends_with(".pdf") => DocumentKind::Pdf,
            _ if name.ends_with(".docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// Resolves résumé input to plain text.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, resume: &ResumeData) -> Result<String, DocumentError>;
}

/// Production parser backed by pdf-extract and the DOCX strategy ladder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

#[async_trait]
impl ResumeParser for DocumentParser {
    async fn parse(&self, resume: &ResumeData) -> Result<String, DocumentError> {
        if let Some(text) = &resume.text {
            if text.trim().is_empty() {
                return Err(DocumentError::BlankText);
            }
            debug!("Using pasted resume text ({} chars)", text.chars().count());
            return Ok(text.clone());
        }

        let file = resume.file.as_ref().ok_or(DocumentError::Missing)?;
        let kind = DocumentKind::detect(file);
        info!("Extracting text from {} ({:?})", file.name, kind);

        let bytes = file.bytes.clone();
        let text = tokio::task::spawn_blocking(move || extract_file_text(kind, &bytes))
            .await
            .map_err(|e| DocumentError::Task(e.to_string()))??;

        debug!("Extracted {} chars from {}", text.chars().count(), file.name);
        Ok(text)
    }
}

fn extract_file_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError> {
    let text = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes)?,
        DocumentKind::Docx => docx::extract_docx_text(bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };
    if text.trim().is_empty() {
        return Err(DocumentError::Empty { kind });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn file(name: &str, content_type: Option<&str>, bytes: &'static [u8]) -> ResumeFile {
        ResumeFile {
            name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_detect_by_mime_then_extension() {
        assert_eq!(
            DocumentKind::detect(&file("cv", Some(PDF_MIME), b"")),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(&file("cv.bin", Some(DOCX_MIME), b"")),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::detect(&file("CV.DOCX", Some("application/octet-stream"), b"")),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::detect(&file("cv.pdf", None, b"")),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(&file("cv.txt", Some("text/plain"), b"")),
            DocumentKind::PlainText
        );
    }

    #[tokio::test]
    async fn test_pasted_text_is_returned_verbatim() {
        let text = "  Jane Doe\nRust engineer  ";
        let parsed = DocumentParser.parse(&ResumeData::from_text(text)).await.unwrap();
        assert_eq!(parsed, text);
    }

    #[tokio::test]
    async fn test_blank_pasted_text_is_rejected() {
        let err = DocumentParser
            .parse(&ResumeData::from_text(" \n\t"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::BlankText));
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let err = DocumentParser.parse(&ResumeData::default()).await.unwrap_err();
        assert!(matches!(err, DocumentError::Missing));
    }

    #[tokio::test]
    async fn test_plain_text_file() {
        let resume = ResumeData::from_file(file("cv.txt", Some("text/plain"), b"Jane Doe, SRE"));
        assert_eq!(DocumentParser.parse(&resume).await.unwrap(), "Jane Doe, SRE");
    }

    #[tokio::test]
    async fn test_blank_plain_text_file_is_empty_error() {
        let resume = ResumeData::from_file(file("cv.txt", None, b"   \n"));
        let err = DocumentParser.parse(&resume).await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Empty {
                kind: DocumentKind::PlainText
            }
        ));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let resume = ResumeData::from_file(file("cv.pdf", Some(PDF_MIME), b"not a pdf at all"));
        let err = DocumentParser.parse(&resume).await.unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_) | DocumentError::Task(_)));
    }
}
