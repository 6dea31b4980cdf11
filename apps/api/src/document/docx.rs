//! DOCX text extraction as an ordered ladder of strategies.
//!
//! The first strategy that yields non-blank text wins. Later rungs decode the
//! raw bytes under different encodings; their output is accepted as-is.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use encoding_rs::{GBK, UTF_16LE};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::document::{DocumentError, DocumentKind};

const DOCUMENT_XML: &str = "word/document.xml";

/// Why a single rung of the ladder produced nothing.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("bytes are not valid {0}")]
    Decode(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxStrategy {
    /// Walk the document XML collecting run text.
    RawText,
    /// Lenient scan into HTML paragraphs, then strip tags.
    HtmlConversion,
    Utf8,
    Gbk,
    Utf16Le,
    LossyUtf8,
}

impl DocxStrategy {
    pub const ORDER: [DocxStrategy; 6] = [
        DocxStrategy::RawText,
        DocxStrategy::HtmlConversion,
        DocxStrategy::Utf8,
        DocxStrategy::Gbk,
        DocxStrategy::Utf16Le,
        DocxStrategy::LossyUtf8,
    ];

    pub fn extract(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        match self {
            DocxStrategy::RawText => raw_text(&read_document_xml(bytes)?),
            DocxStrategy::HtmlConversion => {
                Ok(strip_html(&document_to_html(&read_document_xml(bytes)?)))
            }
            DocxStrategy::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|_| StrategyError::Decode("UTF-8")),
            DocxStrategy::Gbk => GBK
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or(StrategyError::Decode("GBK")),
            DocxStrategy::Utf16Le => UTF_16LE
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or(StrategyError::Decode("UTF-16LE")),
            DocxStrategy::LossyUtf8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Runs the ladder; fails only when every strategy yields blank text.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    for strategy in DocxStrategy::ORDER {
        match strategy.extract(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("DOCX text extracted via {:?} ({} chars)", strategy, text.len());
                return Ok(text);
            }
            Ok(_) => debug!("DOCX strategy {:?} produced blank text", strategy),
            Err(e) => debug!("DOCX strategy {:?} failed: {e}", strategy),
        }
    }
    warn!("Every DOCX extraction strategy came back empty");
    Err(DocumentError::Empty {
        kind: DocumentKind::Docx,
    })
}

fn read_document_xml(bytes: &[u8]) -> Result<String, StrategyError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = archive.by_name(DOCUMENT_XML)?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

fn raw_text(xml: &str) -> Result<String, StrategyError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_run_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

fn paragraph_regex() -> &'static Regex {
    static PARAGRAPH: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH.get_or_init(|| Regex::new(r"(?s)<w:p[ >].*?</w:p>").expect("paragraph pattern"))
}

fn run_text_regex() -> &'static Regex {
    static RUN_TEXT: OnceLock<Regex> = OnceLock::new();
    RUN_TEXT.get_or_init(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").expect("run pattern"))
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern"))
}

/// Tolerates malformed XML: only paragraph and run-text tags need to line up.
fn document_to_html(xml: &str) -> String {
    paragraph_regex()
        .find_iter(xml)
        .map(|paragraph| {
            let runs: String = run_text_regex()
                .captures_iter(paragraph.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect();
            format!("<p>{runs}</p>")
        })
        .collect()
}

fn strip_html(html: &str) -> String {
    let with_breaks = html.replace("</p>", "\n");
    decode_entities(&tag_regex().replace_all(&with_breaks, ""))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
