//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::effects::EffectError;
use crate::form::FormError;
use crate::models::DocumentType;
use crate::report::ReportError;
use crate::session::{GenerateError, SessionError};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unknown document type: {0}")]
    InvalidDocumentType(String),
    #[error("Unknown field '{field}' for {document_type}")]
    UnknownField {
        document_type: DocumentType,
        field: String,
    },
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("No instruction template configured for {0}")]
    TemplateNotConfigured(DocumentType),
    #[error("Report generation failed: {0}")]
    GenerationFailed(String),
    #[error("Feedback could not be delivered: {0}")]
    FeedbackFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::InvalidDocumentType(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_DOCUMENT_TYPE",
                self.to_string(),
            ),
            ApiError::UnknownField { .. } => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD", self.to_string())
            }
            ApiError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", self.to_string())
            }
            ApiError::TemplateNotConfigured(_) => (
                StatusCode::CONFLICT,
                "TEMPLATE_NOT_CONFIGURED",
                self.to_string(),
            ),
            ApiError::GenerationFailed(_) => {
                tracing::warn!(error = %self, "Report generation failed");
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", self.to_string())
            }
            ApiError::FeedbackFailed(_) => {
                (StatusCode::BAD_GATEWAY, "FEEDBACK_FAILED", self.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::InvalidDocumentType(value) => ApiError::InvalidDocumentType(value),
            FormError::UnknownField {
                document_type,
                field,
            } => ApiError::UnknownField {
                document_type,
                field,
            },
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => ApiError::SessionNotFound(id),
            SessionError::LockPoisoned => ApiError::Internal("session lock poisoned".into()),
            SessionError::Form(e) => e.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::TemplateNotConfigured(document_type) => {
                ApiError::TemplateNotConfigured(document_type)
            }
            ReportError::GenerationFailed(cause) => ApiError::GenerationFailed(cause.to_string()),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Session(e) => e.into(),
            GenerateError::Report(e) => e.into(),
        }
    }
}

impl From<EffectError> for ApiError {
    fn from(err: EffectError) -> Self {
        match err {
            EffectError::EmptyMessage | EffectError::MessageTooLong { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            EffectError::Delivery(detail) => ApiError::FeedbackFailed(detail),
        }
    }
}
