//! Shared state and wire types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::effects::FeedbackSink;
use crate::form::{CaseNarrative, FieldSpec};
use crate::models::{DocumentType, GeneratedReport};
use crate::report::ReportGenerator;
use crate::session::{ReportSession, SessionStore};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
/// Only the session store holds mutable state; each session has its own lock.
#[derive(Clone)]
pub struct ApiContext {
    pub sessions: Arc<SessionStore>,
    pub generator: Arc<ReportGenerator>,
    pub feedback: Arc<dyn FeedbackSink>,
}

impl ApiContext {
    pub fn new(
        sessions: Arc<SessionStore>,
        generator: Arc<ReportGenerator>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            sessions,
            generator,
            feedback,
        }
    }
}

/// Parse a session id path segment.
pub fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid session ID: {raw}")))
}

// ═══════════════════════════════════════════════════════════
// Session views
// ═══════════════════════════════════════════════════════════

/// One form field with its current value.
#[derive(Debug, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: String,
}

/// Snapshot of a session as shown to the client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub document_type: DocumentType,
    pub document_label: &'static str,
    pub fields: Vec<FieldView>,
    pub narrative: CaseNarrative,
    pub report: Option<GeneratedReport>,
    pub created_at: String,
}

impl From<&ReportSession> for SessionView {
    fn from(session: &ReportSession) -> Self {
        let form = session.form();
        Self {
            session_id: session.id(),
            document_type: form.document_type(),
            document_label: form.document_type().label(),
            fields: form
                .fields()
                .iter()
                .map(|(spec, value)| FieldView {
                    spec: *spec,
                    value: value.to_string(),
                })
                .collect(),
            narrative: form.build_narrative(),
            report: session.report().cloned(),
            created_at: session.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Slug or label; the first document type when absent.
    pub document_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectDocumentTypeRequest {
    pub document_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub value: String,
}
