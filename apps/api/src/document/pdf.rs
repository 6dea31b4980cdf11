use tracing::debug;

use crate::document::{DocumentError, DocumentKind};

/// Extracts text page by page, in page order, each page followed by a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocumentError::Pdf(e.to_string()))?;
    debug!("PDF has {} pages", pages.len());

    let text = join_pages(&pages);
    if text.trim().is_empty() {
        return Err(DocumentError::Empty {
            kind: DocumentKind::Pdf,
        });
    }
    Ok(text)
}

fn join_pages(pages: &[String]) -> String {
    pages.iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page);
        acc.push('\n');
        acc
    })
}
