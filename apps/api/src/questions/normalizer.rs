//! AI response normalization.
//!
//! Turns whatever text the model sent back into a bounded list of well-formed
//! questions. Parsing tries an ordered list of extraction strategies; items are
//! coerced field by field; short or empty items are dropped; the fallback set
//! fills the gap when too few survive. Never fails.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::question::{Category, Question};
use crate::questions::fallback::fallback_questions;

/// Trimmed question text must be strictly longer than this many characters.
const MIN_TEXT_CHARS: usize = 10;
/// Below `min(FALLBACK_THRESHOLD, question_count)` usable items the fallback set is merged in.
const FALLBACK_THRESHOLD: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no JSON array could be extracted from the model output")]
    Unparseable,
}

/// One way of locating a JSON array inside model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// The whole payload is the array.
    Direct,
    /// The array sits inside a ``` fenced block, optionally tagged `json`.
    FencedBlock,
    /// The span from the first `[` to the last `]`.
    BracketSpan,
}

impl ParseStrategy {
    pub const ORDER: [ParseStrategy; 3] = [
        ParseStrategy::Direct,
        ParseStrategy::FencedBlock,
        ParseStrategy::BracketSpan,
    ];

    fn candidate<'a>(&self, content: &'a str) -> Option<&'a str> {
        match self {
            ParseStrategy::Direct => Some(content),
            ParseStrategy::FencedBlock => fence_regex()
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
            ParseStrategy::BracketSpan => {
                let start = content.find('[')?;
                let end = content.rfind(']')?;
                (start < end).then(|| &content[start..=end])
            }
        }
    }

    /// Returns the parsed items if this strategy finds a JSON array.
    pub fn apply(&self, content: &str) -> Option<Vec<Value>> {
        let candidate = self.candidate(content)?;
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        }
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
    })
}

/// Runs the strategies in order and returns the first array found.
pub fn parse_items(content: &str) -> Result<Vec<Value>, NormalizeError> {
    for strategy in ParseStrategy::ORDER {
        if let Some(items) = strategy.apply(content) {
            debug!("Parsed {} items via {:?}", items.len(), strategy);
            return Ok(items);
        }
    }
    Err(NormalizeError::Unparseable)
}

/// Coerces raw items into questions, dropping anything without usable text.
pub fn coerce_items(items: &[Value]) -> Vec<Question> {
    items
        .iter()
        .filter_map(|item| item.as_object())
        .filter_map(|obj| question_text(obj).map(|text| (obj, text)))
        .enumerate()
        .map(|(index, (obj, text))| Question {
            id: question_id(obj).unwrap_or_else(|| format!("q{}", index + 1)),
            text: text.to_string(),
            category: obj
                .get("category")
                .and_then(Value::as_str)
                .and_then(Category::parse_exact)
                .unwrap_or(Category::Behavioral),
        })
        .filter(|q| q.text.trim().chars().count() > MIN_TEXT_CHARS)
        .collect()
}

fn question_text(obj: &serde_json::Map<String, Value>) -> Option<&str> {
    ["text", "question"]
        .iter()
        .filter_map(|field| obj.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn question_id(obj: &serde_json::Map<String, Value>) -> Option<String> {
    match obj.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Merges in the fallback set when too few questions survived, then bounds the result.
pub fn apply_fallback_policy(mut valid: Vec<Question>, question_count: usize) -> Vec<Question> {
    if valid.len() >= FALLBACK_THRESHOLD.min(question_count) {
        valid.truncate(question_count);
        return valid;
    }

    warn!(
        "Only {} usable questions from the model, merging fallback set",
        valid.len()
    );
    let mut seen = HashSet::new();
    valid
        .into_iter()
        .chain(fallback_questions())
        .filter(|q| seen.insert(q.text.clone()))
        .take(question_count)
        .collect()
}

/// Full normalization: parse, coerce, filter, fall back. An unparseable
/// payload is handled exactly like an empty list.
pub fn normalize_questions(content: &str, question_count: usize) -> Vec<Question> {
    let valid = match parse_items(content) {
        Ok(items) => coerce_items(&items),
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    };
    apply_fallback_policy(valid, question_count)
}
