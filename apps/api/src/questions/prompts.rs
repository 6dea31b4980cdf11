// Prompt constants for the question-generation call.
// Reuses the cross-cutting output-format fragment from llm_client::prompts.

use crate::llm_client::prompts::QUESTION_ARRAY_FORMAT;
use crate::models::question::{Category, GenerationRequest};

/// Résumé text beyond this many characters is not sent to the model.
pub const RESUME_PROMPT_CHARS: usize = 2000;

pub const QUESTION_SYSTEM: &str = "You are an experienced interviewer who writes targeted \
    interview questions from a candidate's resume and a job description. \
    Respond strictly in JSON, with no other text or explanation.";

/// Builds the user prompt for one generation request.
pub fn build_question_prompt(request: &GenerationRequest) -> String {
    let resume: String = request
        .resume_text
        .chars()
        .take(RESUME_PROMPT_CHARS)
        .collect();
    let types = request
        .question_types
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Based on the resume and job description below, generate {count} interview questions.

RESUME:
{resume}

JOB DESCRIPTION:
{job}

Generate questions of these types:
{types}

Each question must:
1. Relate to the resume content and the job requirements
2. Target the candidate's skills, experience or projects
3. Include a concrete scenario or detail
4. Help assess whether the candidate fits the position

{format}

Make every question specific enough to measure how well the candidate matches the role."#,
        count = request.question_count,
        resume = resume,
        job = request.job_description,
        types = types,
        format = QUESTION_ARRAY_FORMAT,
    )
}
