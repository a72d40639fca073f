//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::DocumentType;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub configured_document_types: Vec<DocumentType>,
    pub active_sessions: usize,
}

/// `GET /api/health`: liveness plus configuration summary.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model: ctx.generator.settings().model.clone(),
        configured_document_types: ctx.generator.templates().configured(),
        active_sessions: ctx.sessions.len(),
    })
}
