//! Document type catalogue.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::form::{schema_for, FieldSpec};
use crate::models::DocumentType;

#[derive(Serialize)]
pub struct DocumentTypeView {
    pub id: DocumentType,
    pub label: &'static str,
    /// `false` when generation would fail with TEMPLATE_NOT_CONFIGURED.
    pub template_configured: bool,
    pub fields: &'static [FieldSpec],
}

#[derive(Serialize)]
pub struct DocumentTypesResponse {
    pub document_types: Vec<DocumentTypeView>,
    pub disclaimer: &'static str,
}

/// `GET /api/document-types`: all types in selector order with their forms.
pub async fn list(State(ctx): State<ApiContext>) -> Json<DocumentTypesResponse> {
    let templates = ctx.generator.templates();
    let document_types = DocumentType::all()
        .iter()
        .map(|&document_type| DocumentTypeView {
            id: document_type,
            label: document_type.label(),
            template_configured: templates.is_configured(document_type),
            fields: schema_for(document_type),
        })
        .collect();

    Json(DocumentTypesResponse {
        document_types,
        disclaimer: crate::config::DISCLAIMER,
    })
}
