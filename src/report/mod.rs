//! Report Generator: template dispatch and the single completion call.

pub mod completion;
pub mod generator;
pub mod openai;
pub mod templates;

#[cfg(test)]
pub(crate) mod mock;

pub use completion::*;
pub use generator::*;
pub use openai::*;
pub use templates::*;

use std::time::Duration;

use thiserror::Error;

use crate::models::DocumentType;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No instruction template configured for {0}")]
    TemplateNotConfigured(DocumentType),

    #[error("Report generation failed: {0}")]
    GenerationFailed(#[source] CompletionError),
}

/// Failures of the completion service boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Completion service not reachable at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Completion service rejected the credentials")]
    Authentication,

    #[error("Completion service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
