//! Feedback endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::effects::validate_feedback;

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
}

/// `POST /api/feedback`: forward a free-text message to the feedback sink.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(request): Json<FeedbackRequest>,
) -> Result<StatusCode, ApiError> {
    let message = validate_feedback(&request.message)?.to_string();
    let sink = ctx.feedback.clone();
    tokio::task::spawn_blocking(move || sink.send_feedback(&message))
        .await
        .map_err(|e| ApiError::Internal(format!("Feedback task failed: {e}")))??;
    Ok(StatusCode::ACCEPTED)
}
