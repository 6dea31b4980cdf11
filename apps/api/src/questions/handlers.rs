//! Axum route handlers for question generation and export.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::export::{export_response, ExportFormat};
use crate::models::question::{
    validate_question_count, Category, GenerationConfig, GenerationRequest, JobDetails, Question,
    DEFAULT_QUESTION_COUNT,
};
use crate::models::resume::{ResumeData, ResumeFile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsBody {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
    pub question_count: Option<usize>,
    /// Unknown category names are dropped rather than rejected.
    pub question_types: Option<Vec<String>>,
}

impl GenerateQuestionsBody {
    /// Known categories in request order; all three when none are usable.
    fn categories(&self) -> Vec<Category> {
        let types: Vec<Category> = self
            .question_types
            .iter()
            .flatten()
            .filter_map(|name| Category::parse_exact(name))
            .collect();
        if types.is_empty() {
            Category::ALL.to_vec()
        } else {
            types
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Fields of the multipart generation form.
#[derive(Debug, Default)]
pub struct GenerationForm {
    pub resume: ResumeData,
    pub job: JobDetails,
    pub config: GenerationConfig,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-questions
///
/// Direct model call for clients that already hold the résumé text.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    body: Result<Json<GenerateQuestionsBody>, JsonRejection>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let question_types = body.categories();
    let (Some(resume_text), Some(job_description)) = (
        body.resume_text.filter(|s| !s.trim().is_empty()),
        body.job_description.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: resumeText and jobDescription".to_string(),
        ));
    };

    let question_count = body.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
    validate_question_count(question_count).map_err(AppError::Validation)?;

    let request = GenerationRequest {
        resume_text,
        job_description,
        question_count,
        question_types,
    };
    let questions = state.llm_source.generate_questions(&request).await;

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/questions/generate
///
/// Full pipeline from a multipart form: résumé file or text, job details, config.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuestionsResponse>, AppError> {
    let form = parse_generation_form(multipart).await?;
    let questions = state
        .generator
        .generate(&form.resume, &form.job, &form.config)
        .await?;
    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/questions/regenerate
///
/// Same form as generate; configuration fields are ignored in favor of the defaults.
pub async fn handle_regenerate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuestionsResponse>, AppError> {
    let form = parse_generation_form(multipart).await?;
    let questions = state.generator.regenerate(&form.resume, &form.job).await?;
    Ok(Json(QuestionsResponse { questions }))
}

/// GET /api/v1/questions/progress
pub async fn handle_progress(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "progress": state.generator.progress() }))
}

/// POST /api/v1/questions/export?format=json|csv|text
pub async fn handle_export(
    Query(query): Query<ExportQuery>,
    Json(body): Json<QuestionsResponse>,
) -> Result<Response, AppError> {
    export_response(query.format, &body.questions)
}

// ────────────────────────────────────────────────────────────────────────────
// Form parsing
// ────────────────────────────────────────────────────────────────────────────

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {e}"))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

pub async fn parse_generation_form(mut multipart: Multipart) -> Result<GenerationForm, AppError> {
    let mut form = GenerationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() && form.resume.text.is_none() {
                    form.resume = ResumeData::from_file(ResumeFile {
                        name: file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "resume_text" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.is_empty() {
                    form.resume = ResumeData::from_text(text);
                }
            }
            "job_title" => form.job.title = field.text().await.map_err(multipart_error)?,
            "company_name" => form.job.company = field.text().await.map_err(multipart_error)?,
            "job_description" => {
                form.job.description = field.text().await.map_err(multipart_error)?
            }
            "question_count" => {
                let raw = field.text().await.map_err(multipart_error)?;
                form.config.question_count = raw.trim().parse().map_err(|_| {
                    AppError::Validation(format!("question_count must be a number, got '{raw}'"))
                })?;
            }
            "include_technical" => {
                form.config.include_technical =
                    parse_flag(&field.text().await.map_err(multipart_error)?)
            }
            "include_behavioral" => {
                form.config.include_behavioral =
                    parse_flag(&field.text().await.map_err(multipart_error)?)
            }
            "include_position_related" => {
                form.config.include_position_related =
                    parse_flag(&field.text().await.map_err(multipart_error)?)
            }
            other => tracing::debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}
