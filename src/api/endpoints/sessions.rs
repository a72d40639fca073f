//! Session endpoints.
//!
//! - `POST /api/sessions`: open a session
//! - `GET /api/sessions/:id`: current form and report
//! - `DELETE /api/sessions/:id`: discard a session
//! - `PUT /api/sessions/:id/document-type`: switch type (clears all fields)
//! - `PUT /api/sessions/:id/fields/:name`: set one field
//! - `GET /api/sessions/:id/narrative`: preview the assembled narrative

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{
    parse_session_id, ApiContext, CreateSessionRequest, SelectDocumentTypeRequest, SessionView,
    SetFieldRequest,
};
use crate::form::CaseNarrative;
use crate::models::DocumentType;

/// `POST /api/sessions`: body is optional.
///
/// An empty body opens a session on the first document type. A non-empty
/// body must be `application/json` and parse, otherwise the request is
/// rejected rather than falling back to the default type.
pub async fn create(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let request = parse_create_body(&headers, &body)?;
    let document_type = match request.document_type.as_deref() {
        Some(selector) => selector.parse::<DocumentType>()?,
        None => DocumentType::default(),
    };

    let id = ctx.sessions.create(document_type)?;
    let view = ctx.sessions.with_session(id, |s| SessionView::from(&*s))?;
    Ok((StatusCode::CREATED, Json(view)))
}

fn parse_create_body(headers: &HeaderMap, body: &[u8]) -> Result<CreateSessionRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateSessionRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(ApiError::BadRequest(
            "Expected Content-Type: application/json".into(),
        ));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
}

/// `GET /api/sessions/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let view = ctx.sessions.with_session(id, |s| SessionView::from(&*s))?;
    Ok(Json(view))
}

/// `DELETE /api/sessions/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    ctx.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/sessions/:id/document-type`
///
/// Re-selecting the current type also clears the form.
pub async fn select_document_type(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(request): Json<SelectDocumentTypeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let view = ctx.sessions.with_session(id, |s| {
        s.form_mut().select_document_type(&request.document_type)?;
        Ok::<_, ApiError>(SessionView::from(&*s))
    })??;
    Ok(Json(view))
}

/// `PUT /api/sessions/:id/fields/:name`
pub async fn set_field(
    State(ctx): State<ApiContext>,
    Path((id, name)): Path<(String, String)>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&id)?;
    let view = ctx.sessions.with_session(id, |s| {
        s.form_mut().set_field(&name, request.value)?;
        Ok::<_, ApiError>(SessionView::from(&*s))
    })??;
    Ok(Json(view))
}

#[derive(Serialize)]
pub struct NarrativeResponse {
    pub document_type: DocumentType,
    pub narrative: CaseNarrative,
    pub blank: bool,
}

/// `GET /api/sessions/:id/narrative`
pub async fn narrative(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<NarrativeResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let (document_type, narrative) = ctx.sessions.narrative(id)?;
    Ok(Json(NarrativeResponse {
        document_type,
        blank: narrative.is_blank(),
        narrative,
    }))
}
