use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::question_type::QuestionTypeTag;

pub type Result<T> = std::result::Result<T, Error>;

/// Shown when the remote API fails without a readable message.
pub const REMOTE_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Points must be between 0 and {max}, got {points}")]
    PointsOutOfRange { points: i32, max: i32 },

    #[error("Maximum points for review {review_id} are unknown")]
    MaxPointsUnknown { review_id: i64 },

    #[error("Page size must be one of 5, 10, 20, 50 or 100, got {0}")]
    InvalidPageSize(u32),

    #[error("Answer review {0} has already been reviewed")]
    AlreadyReviewed(i64),

    #[error("Answer review {0} is already being submitted")]
    ReviewInFlight(i64),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Local errors never reached the network and can be fixed by the user.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::BadRequest(_)
                | Error::UnknownQuestionType(_)
                | Error::Content(_)
                | Error::Validation(_)
                | Error::PointsOutOfRange { .. }
                | Error::InvalidPageSize(_)
                | Error::AlreadyReviewed(_)
                | Error::ReviewInFlight(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::UnknownQuestionType(_)
            | Error::Content(_)
            | Error::PointsOutOfRange { .. }
            | Error::MaxPointsUnknown { .. }
            | Error::InvalidPageSize(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::AlreadyReviewed(_) | Error::ReviewInFlight(_) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Remote { status: 404, message } => (StatusCode::NOT_FOUND, message),
            Error::Remote { message, .. } => (StatusCode::BAD_GATEWAY, message),
            Error::Reqwest(err) => {
                tracing::warn!(error = %err, "Remote API transport failure");
                (StatusCode::BAD_GATEWAY, REMOTE_FALLBACK_MESSAGE.to_string())
            }
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Question content that cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("insufficient pairs: at least {required} complete pairs are needed, found {found}")]
    InsufficientPairs { found: usize, required: usize },

    #[error("incomplete pair: pair #{} needs both an image and a text", .index + 1)]
    IncompletePair { index: usize },

    #[error("content shaped for {found} cannot be saved as {expected}")]
    ShapeMismatch {
        expected: QuestionTypeTag,
        found: QuestionTypeTag,
    },

    #[error("content does not match the {tag} schema: {reason}")]
    Malformed { tag: QuestionTypeTag, reason: String },
}

impl ContentError {
    pub fn reason(&self) -> &'static str {
        match self {
            ContentError::InsufficientPairs { .. } => "insufficient pairs",
            ContentError::IncompletePair { .. } => "incomplete pair",
            ContentError::ShapeMismatch { .. } => "shape mismatch",
            ContentError::Malformed { .. } => "malformed content",
        }
    }
}
