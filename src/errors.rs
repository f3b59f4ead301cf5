//! Error taxonomy for extraction, generation, validation and the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Malformed file payload.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("text file '{name}' has no content")]
    MissingContent { name: String },

    #[error("invalid base64 in '{name}': {source}")]
    Base64 {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("'{name}' is not valid UTF-8 text: {source}")]
    Utf8 {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Failure while classifying or generating games.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("malformed template for {subject}/{game_type}: unknown placeholder '{placeholder}'")]
    MalformedTemplate {
        subject: String,
        game_type: String,
        placeholder: String,
    },

    #[error("template table has no entries for {0}")]
    EmptySubject(String),
}

/// Single error surfaced by `process_lesson`; wraps whichever step failed.
#[derive(Debug, Error)]
#[error("Error processing lesson: {0}")]
pub struct LessonProcessingError(pub String);

impl From<ExtractionError> for LessonProcessingError {
    fn from(e: ExtractionError) -> Self {
        Self(e.to_string())
    }
}

impl From<ProcessingError> for LessonProcessingError {
    fn from(e: ProcessingError) -> Self {
        Self(e.to_string())
    }
}

/// Static syntax-check failures for JavaScript game code.
/// Character counting only, not a parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Code should contain JavaScript functions or variables")]
    NoDeclarations,

    #[error("Mismatched braces in code")]
    UnbalancedBraces,

    #[error("Mismatched parentheses in code")]
    UnbalancedParens,
}

/// Remote game agent failures.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("agent HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("agent returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("agent reply contained no game code")]
    NoCode,
}

/// HTTP-level error. Every variant renders as `{"error": message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Processing(#[from] LessonProcessingError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Processing(e) => {
                tracing::error!(target: "lesson", error = %e, "Lesson processing failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
