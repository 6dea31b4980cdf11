//! Question export in JSON, CSV and plain text.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::question::Question;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    #[default]
    Text,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "interview-questions.json",
            ExportFormat::Csv => "interview-questions.csv",
            ExportFormat::Text => "interview-questions.txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Text => "text/plain",
        }
    }

    pub fn render(&self, questions: &[Question]) -> Result<String, serde_json::Error> {
        Ok(match self {
            ExportFormat::Json => export_json(questions)?,
            ExportFormat::Csv => export_csv(questions),
            ExportFormat::Text => export_text(questions),
        })
    }
}

/// Pretty-printed JSON array with two-space indentation.
pub fn export_json(questions: &[Question]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(questions)
}

/// `ID,Question,Category` header; only the question text is quoted.
pub fn export_csv(questions: &[Question]) -> String {
    std::iter::once("ID,Question,Category".to_string())
        .chain(questions.iter().map(|q| {
            format!(
                "{},\"{}\",{}",
                q.id,
                q.text.replace('"', "\"\""),
                q.category
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn export_text(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. [{}] {}", i + 1, q.category, q.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds a downloadable file response for the given format.
pub fn export_response(format: ExportFormat, questions: &[Question]) -> Result<Response, AppError> {
    let body = format
        .render(questions)
        .map_err(|e| AppError::Internal(e.into()))?;
    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.filename()),
        ),
    ];
    Ok((headers, body).into_response())
}
