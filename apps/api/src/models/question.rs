use serde::{Deserialize, Serialize};

/// Classification of an interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    Behavioral,
    PositionRelated,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Technical,
        Category::Behavioral,
        Category::PositionRelated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::PositionRelated => "position-related",
        }
    }

    /// Exact match only; no case folding or trimming.
    pub fn parse_exact(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: Category,
}

/// Input to a single question-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub resume_text: String,
    pub job_description: String,
    pub question_count: usize,
    pub question_types: Vec<Category>,
}

pub const MIN_QUESTION_COUNT: usize = 3;
pub const MAX_QUESTION_COUNT: usize = 20;
pub const DEFAULT_QUESTION_COUNT: usize = 8;

/// User-facing generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub question_count: usize,
    pub include_technical: bool,
    pub include_behavioral: bool,
    pub include_position_related: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            include_technical: true,
            include_behavioral: true,
            include_position_related: true,
        }
    }
}

impl GenerationConfig {
    /// Requested categories, always in technical, behavioral, position-related order.
    pub fn question_types(&self) -> Vec<Category> {
        let mut types = Vec::with_capacity(3);
        if self.include_technical {
            types.push(Category::Technical);
        }
        if self.include_behavioral {
            types.push(Category::Behavioral);
        }
        if self.include_position_related {
            types.push(Category::PositionRelated);
        }
        types
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_question_count(self.question_count)?;
        if self.question_types().is_empty() {
            return Err("At least one question type must be selected".to_string());
        }
        Ok(())
    }
}

pub fn validate_question_count(count: usize) -> Result<(), String> {
    if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
        return Err(format!(
            "questionCount must be between {MIN_QUESTION_COUNT} and {MAX_QUESTION_COUNT}, got {count}"
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::PositionRelated).unwrap();
        assert_eq!(json, r#""position-related""#);
        let parsed: Category = serde_json::from_str(r#""technical""#).unwrap();
        assert_eq!(parsed, Category::Technical);
    }

    #[test]
    fn test_parse_exact_rejects_near_misses() {
        assert_eq!(Category::parse_exact("behavioral"), Some(Category::Behavioral));
        assert_eq!(Category::parse_exact("Technical"), None);
        assert_eq!(Category::parse_exact("position_related"), None);
        assert_eq!(Category::parse_exact(" technical"), None);
    }

    #[test]
    fn test_question_types_follow_flags_in_fixed_order() {
        let config = GenerationConfig {
            include_technical: false,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.question_types(),
            vec![Category::Behavioral, Category::PositionRelated]
        );
        assert_eq!(GenerationConfig::default().question_types(), Category::ALL.to_vec());
    }

    #[test]
    fn test_validate_accepts_bounds() {
        for count in [3, 20] {
            let config = GenerationConfig {
                question_count: count,
                ..GenerationConfig::default()
            };
            assert!(config.validate().is_ok(), "count {count} should be accepted");
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_and_no_types() {
        let too_few = GenerationConfig {
            question_count: 2,
            ..GenerationConfig::default()
        };
        assert!(too_few.validate().is_err());

        let too_many = GenerationConfig {
            question_count: 21,
            ..GenerationConfig::default()
        };
        assert!(too_many.validate().is_err());

        let none = GenerationConfig {
            include_technical: false,
            include_behavioral: false,
            include_position_related: false,
            ..GenerationConfig::default()
        };
        assert!(none.validate().is_err());
    }

    #[test]
    fn test_generation_request_uses_camel_case() {
        let request = GenerationRequest {
            resume_text: "Rust engineer".to_string(),
            job_description: "Backend role".to_string(),
            question_count: 5,
            question_types: vec![Category::Technical],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["resumeText"], "Rust engineer");
        assert_eq!(value["questionCount"], 5);
        assert_eq!(value["questionTypes"][0], "technical");
    }
}
