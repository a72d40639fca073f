//! Report generation endpoint.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_session_id, ApiContext};
use crate::models::GeneratedReport;
use crate::session::GenerationOutcome;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateStatus {
    /// Every field was blank; the completion service was not called.
    Skipped,
    Generated,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub status: GenerateStatus,
    pub report: Option<GeneratedReport>,
    pub disclaimer: &'static str,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let (status, report) = match outcome {
            GenerationOutcome::Skipped => (GenerateStatus::Skipped, None),
            GenerationOutcome::Generated(report) => (GenerateStatus::Generated, Some(report)),
        };
        Self {
            status,
            report,
            disclaimer: crate::config::DISCLAIMER,
        }
    }
}

/// `POST /api/sessions/:id/generate`
///
/// The session lock is released during the completion call, so the same
/// session stays readable while a report is being written. On failure the
/// previous report is kept. A session deleted or evicted during the call
/// still gets its report in the response; it is only not stored.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let id = parse_session_id(&id)?;

    let sessions = ctx.sessions.clone();
    let generator = ctx.generator.clone();
    let outcome = tokio::task::spawn_blocking(move || sessions.generate(id, &generator))
        .await
        .map_err(|e| ApiError::Internal(format!("Generation task failed: {e}")))??;

    Ok(Json(outcome.into()))
}
