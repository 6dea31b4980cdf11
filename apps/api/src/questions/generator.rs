//! Question generation: orchestrates the full pipeline for one request.
//!
//! Flow: validate input → resolve résumé text (20%) → build category list (40%)
//!       → question source (60%) → save history (90%) → done (100%).
//!
//! Progress is a single shared value. Concurrent `generate` calls are not
//! coordinated and will interleave their progress updates.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::document::ResumeParser;
use crate::errors::AppError;
use crate::history::HistoryRepository;
use crate::models::history::NewHistoryEntry;
use crate::models::question::{GenerationConfig, GenerationRequest, JobDetails, Question};
use crate::models::resume::ResumeData;
use crate::questions::source::QuestionSource;

pub const PROGRESS_PARSED: u8 = 20;
pub const PROGRESS_TYPES_READY: u8 = 40;
pub const PROGRESS_REQUESTED: u8 = 60;
pub const PROGRESS_SAVED: u8 = 90;
pub const PROGRESS_DONE: u8 = 100;

pub struct QuestionGenerator {
    parser: Arc<dyn ResumeParser>,
    source: Arc<dyn QuestionSource>,
    history: HistoryRepository,
    progress: watch::Sender<u8>,
}

impl QuestionGenerator {
    pub fn new(
        parser: Arc<dyn ResumeParser>,
        source: Arc<dyn QuestionSource>,
        history: HistoryRepository,
    ) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            parser,
            source,
            history,
            progress,
        }
    }

    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    fn set_progress(&self, value: u8) {
        self.progress.send_replace(value);
    }

    /// Runs the pipeline. Any failure resets progress to 0 and is returned as-is.
    pub async fn generate(
        &self,
        resume: &ResumeData,
        job: &JobDetails,
        config: &GenerationConfig,
    ) -> Result<Vec<Question>, AppError> {
        self.set_progress(0);
        match self.run(resume, job, config).await {
            Ok(questions) => Ok(questions),
            Err(e) => {
                warn!("Question generation aborted: {e}");
                self.set_progress(0);
                Err(e)
            }
        }
    }

    /// Starts over from the raw inputs with the default configuration.
    pub async fn regenerate(
        &self,
        resume: &ResumeData,
        job: &JobDetails,
    ) -> Result<Vec<Question>, AppError> {
        self.generate(resume, job, &GenerationConfig::default()).await
    }

    async fn run(
        &self,
        resume: &ResumeData,
        job: &JobDetails,
        config: &GenerationConfig,
    ) -> Result<Vec<Question>, AppError> {
        validate_inputs(resume, job, config)?;

        // Step 1: résumé text
        self.set_progress(PROGRESS_PARSED);
        let resume_text = self.parser.parse(resume).await?;

        // Step 2: categories
        self.set_progress(PROGRESS_TYPES_READY);
        let question_types = config.question_types();

        // Step 3: questions
        self.set_progress(PROGRESS_REQUESTED);
        let request = GenerationRequest {
            resume_text,
            job_description: job.description.clone(),
            question_count: config.question_count,
            question_types,
        };
        let questions = self.source.generate_questions(&request).await;
        info!(
            "Generated {} questions for '{}' at '{}'",
            questions.len(),
            job.title,
            job.company
        );

        // Step 4: history
        self.set_progress(PROGRESS_SAVED);
        self.history
            .append(NewHistoryEntry {
                job_title: job.title.clone(),
                company_name: job.company.clone(),
                questions: questions.clone(),
                resume_preview: resume.preview(),
            })
            .await?;

        self.set_progress(PROGRESS_DONE);
        Ok(questions)
    }
}

fn validate_inputs(
    resume: &ResumeData,
    job: &JobDetails,
    config: &GenerationConfig,
) -> Result<(), AppError> {
    match (&resume.text, &resume.file) {
        (Some(text), _) if text.trim().is_empty() => {
            return Err(AppError::Validation(
                "Resume text cannot be empty".to_string(),
            ));
        }
        (None, None) => {
            return Err(AppError::Validation(
                "A resume file or resume text is required".to_string(),
            ));
        }
        _ => {}
    }
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }
    config.validate().map_err(AppError::Validation)
}
