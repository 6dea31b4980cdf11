//! The canned question set substituted whenever AI output is unusable.

use crate::models::question::{Category, Question};

const FALLBACK_SET: [(&str, &str, Category); 4] = [
    (
        "fallback-1",
        "Tell us about your background and why this position interests you.",
        Category::Behavioral,
    ),
    (
        "fallback-2",
        "What was the biggest challenge you faced in a past project, and how did you resolve it?",
        Category::Behavioral,
    ),
    (
        "fallback-3",
        "Walk us through the technical implementation of one of the projects on your resume.",
        Category::Technical,
    ),
    (
        "fallback-4",
        "What do you know about our company and this position?",
        Category::PositionRelated,
    ),
];

/// The full four-item fallback set, in fixed order.
pub fn fallback_questions() -> Vec<Question> {
    FALLBACK_SET
        .iter()
        .map(|(id, text, category)| Question {
            id: id.to_string(),
            text: text.to_string(),
            category: *category,
        })
        .collect()
}

/// The fallback set truncated to the requested count.
pub fn fallback_for(question_count: usize) -> Vec<Question> {
    let mut questions = fallback_questions();
    questions.truncate(question_count);
    questions
}
