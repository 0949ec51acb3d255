// src/error.rs
//! Error taxonomy shared by the pipeline, the stores and both front ends.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoachError>;

#[derive(Debug, Error)]
pub enum CoachError {
    /// The PDF could not be parsed, was encrypted, or yielded no text.
    #[error("Failed to extract text from CV: {0}")]
    Extraction(String),

    #[error("{}", .kind.user_message(.message))]
    Completion {
        kind: CompletionFailure,
        message: String,
    },

    #[error("Failed to parse AI response: {source}")]
    ResponseParse {
        cleaned: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl CoachError {
    /// Build a completion error, classifying it from its message.
    pub fn completion(message: impl Into<String>) -> Self {
        let message = message.into();
        CoachError::Completion {
            kind: CompletionFailure::classify(&message),
            message,
        }
    }

    pub fn persistence(context: &str, err: impl std::fmt::Display) -> Self {
        CoachError::Persistence(format!("{}: {}", context, err))
    }

    /// Stable code used in HTTP error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoachError::Extraction(_) => "EXTRACTION_ERROR",
            CoachError::Completion { kind, .. } => match kind {
                CompletionFailure::Authentication => "AI_AUTHENTICATION_ERROR",
                CompletionFailure::Quota => "AI_QUOTA_EXCEEDED",
                CompletionFailure::Timeout => "AI_TIMEOUT",
                CompletionFailure::Other => "AI_SERVICE_ERROR",
            },
            CoachError::ResponseParse { .. } => "AI_RESPONSE_INVALID",
            CoachError::Persistence(_) => "STORAGE_ERROR",
            CoachError::Template(_) => "PROMPT_ERROR",
        }
    }

    /// Hints shown next to the error, on the console and in HTTP bodies.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CoachError::Extraction(_) => vec![
                "Make sure the file is a text-based PDF, not a scanned image".to_string(),
                "Check that the PDF is not password-protected".to_string(),
                "Place your CV PDF in the configured cv folder".to_string(),
            ],
            CoachError::Completion { kind, .. } => match kind {
                CompletionFailure::Authentication => vec![
                    "Check the OPENAI_API_KEY environment variable".to_string(),
                ],
                CompletionFailure::Quota => vec![
                    "Check your account usage at https://platform.openai.com/usage".to_string(),
                ],
                CompletionFailure::Timeout | CompletionFailure::Other => vec![
                    "Try again in a few moments".to_string(),
                ],
            },
            CoachError::ResponseParse { .. } => vec![
                "The AI returned an unexpected format, try again".to_string(),
            ],
            CoachError::Persistence(_) | CoachError::Template(_) => vec![
                "Contact support if the problem persists".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFailure {
    Authentication,
    Quota,
    Timeout,
    Other,
}

impl CompletionFailure {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if message.contains("401") || lower.contains("unauthorized") {
            CompletionFailure::Authentication
        } else if message.contains("429") || lower.contains("quota") {
            CompletionFailure::Quota
        } else if lower.contains("timeout") || lower.contains("timed out") {
            CompletionFailure::Timeout
        } else {
            CompletionFailure::Other
        }
    }

    fn user_message(&self, message: &str) -> String {
        match self {
            CompletionFailure::Authentication => {
                "Invalid OpenAI API key. Please check your OPENAI_API_KEY environment variable."
                    .to_string()
            }
            CompletionFailure::Quota => {
                "OpenAI API quota exceeded. Please check your account usage.".to_string()
            }
            CompletionFailure::Timeout => "OpenAI API timeout. Please try again.".to_string(),
            CompletionFailure::Other => format!("AI request failed: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_completion_failures() {
        assert_eq!(
            CompletionFailure::classify("HTTP 401 Unauthorized: bad key"),
            CompletionFailure::Authentication
        );
        assert_eq!(
            CompletionFailure::classify("You exceeded your current quota"),
            CompletionFailure::Quota
        );
        assert_eq!(
            CompletionFailure::classify("status 429"),
            CompletionFailure::Quota
        );
        assert_eq!(
            CompletionFailure::classify("operation timed out"),
            CompletionFailure::Timeout
        );
        assert_eq!(
            CompletionFailure::classify("connection refused"),
            CompletionFailure::Other
        );
    }

    #[test]
    fn test_completion_error_message_is_friendly() {
        let err = CoachError::completion("HTTP 401: invalid_api_key");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert_eq!(err.error_code(), "AI_AUTHENTICATION_ERROR");

        let err = CoachError::completion("connection reset");
        assert_eq!(err.to_string(), "AI request failed: connection reset");
    }
}
