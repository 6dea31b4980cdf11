use bytes::Bytes;

pub const PREVIEW_CHARS: usize = 100;

/// An uploaded résumé file.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Résumé input: pasted text takes precedence over an uploaded file.
#[derive(Debug, Clone, Default)]
pub struct ResumeData {
    pub text: Option<String>,
    pub file: Option<ResumeFile>,
}

impl ResumeData {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn from_file(file: ResumeFile) -> Self {
        Self {
            text: None,
            file: Some(file),
        }
    }

    /// First `PREVIEW_CHARS` characters of pasted text, or of the uploaded file's name.
    pub fn preview(&self) -> Option<String> {
        let source = match (&self.text, &self.file) {
            (Some(text), _) if !text.is_empty() => text,
            (_, Some(file)) => &file.name,
            _ => return None,
        };
        Some(source.chars().take(PREVIEW_CHARS).collect())
    }
}
