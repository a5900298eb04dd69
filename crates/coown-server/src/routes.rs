//! HTTP routes for the template store, signature tracking and the export gate.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use coown_agreements::ExportReadiness;
use coown_core::error::CoownError;
use coown_core::integrity::IntegrityReport;
use coown_core::models::signature::{
    CreateSignatureRequirement, PropertySignatureStatus, SignatureRequirement,
};
use coown_core::models::template::{AgreementTemplate, EditTemplateContent, Language, TemplateType};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn create_router<C: Connection>(state: AppState<C>) -> Router {
    Router::new()
        // Templates
        .route("/api/templates", get(list_templates::<C>).put(edit_template::<C>))
        .route("/api/templates/active", get(active_templates::<C>))
        .route("/api/templates/integrity", get(integrity_report::<C>))
        .route("/api/templates/:id", get(get_template::<C>))
        .route("/api/templates/:id/activate", post(activate_template::<C>))
        // Signatures
        .route(
            "/api/properties/:id/signatures",
            get(signature_status::<C>).post(record_signature::<C>),
        )
        .route(
            "/api/properties/:id/signatures/requirements",
            post(register_requirement::<C>),
        )
        .route(
            "/api/properties/:id/export-readiness",
            get(export_readiness::<C>),
        )
        // Health check
        .route("/api/health", get(health))
        .with_state(state)
}

/// Path ids are parsed here so that a malformed id gets the JSON error shape.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| CoownError::validation(format!("invalid id: {raw}")).into())
}

pub async fn health() -> impl IntoResponse {
    "OK"
}

// === Templates ===

/// GET /api/templates
pub async fn list_templates<C: Connection>(
    State(state): State<AppState<C>>,
) -> ApiResult<Vec<AgreementTemplate>> {
    Ok(Json(state.templates.list_all().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveQuery {
    #[serde(rename = "type")]
    pub template_type: Option<String>,
}

/// GET /api/templates/active?type=<template_type>
pub async fn active_templates<C: Connection>(
    State(state): State<AppState<C>>,
    Query(query): Query<ActiveQuery>,
) -> ApiResult<Vec<AgreementTemplate>> {
    let template_type = query
        .template_type
        .as_deref()
        .map(str::parse::<TemplateType>)
        .transpose()?;
    Ok(Json(state.templates.list_active(template_type).await?))
}

/// GET /api/templates/:id
pub async fn get_template<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<AgreementTemplate> {
    let id = parse_id(&id)?;
    Ok(Json(state.templates.get(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct EditTemplateRequest {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub language: Language,
}

/// PUT /api/templates
pub async fn edit_template<C: Connection>(
    State(state): State<AppState<C>>,
    payload: Result<Json<EditTemplateRequest>, JsonRejection>,
) -> ApiResult<AgreementTemplate> {
    let Json(req) = payload?;
    let template = state
        .templates
        .edit_content(
            req.id,
            EditTemplateContent {
                language: req.language,
                content: req.content,
            },
        )
        .await?;
    Ok(Json(template))
}

/// POST /api/templates/:id/activate
pub async fn activate_template<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<AgreementTemplate> {
    let id = parse_id(&id)?;
    Ok(Json(state.templates.activate(id).await?))
}

/// GET /api/templates/integrity
pub async fn integrity_report<C: Connection>(
    State(state): State<AppState<C>>,
) -> ApiResult<IntegrityReport> {
    Ok(Json(state.templates.integrity_report().await?))
}

// === Signatures ===

#[derive(Debug, Deserialize)]
pub struct RegisterRequirementRequest {
    pub template_id: Uuid,
    pub total_required: u32,
}

/// POST /api/properties/:id/signatures/requirements
pub async fn register_requirement<C: Connection>(
    State(state): State<AppState<C>>,
    Path(property_id): Path<String>,
    payload: Result<Json<RegisterRequirementRequest>, JsonRejection>,
) -> ApiResult<SignatureRequirement> {
    let property_id = parse_id(&property_id)?;
    let Json(req) = payload?;
    let requirement = state
        .signatures
        .register_requirement(CreateSignatureRequirement {
            property_id,
            template_id: req.template_id,
            total_required: req.total_required,
        })
        .await?;
    Ok(Json(requirement))
}

#[derive(Debug, Deserialize)]
pub struct RecordSignatureRequest {
    pub template_id: Uuid,
}

/// POST /api/properties/:id/signatures
pub async fn record_signature<C: Connection>(
    State(state): State<AppState<C>>,
    Path(property_id): Path<String>,
    payload: Result<Json<RecordSignatureRequest>, JsonRejection>,
) -> ApiResult<SignatureRequirement> {
    let property_id = parse_id(&property_id)?;
    let Json(req) = payload?;
    Ok(Json(
        state
            .signatures
            .record_signature(property_id, req.template_id)
            .await?,
    ))
}

/// GET /api/properties/:id/signatures
pub async fn signature_status<C: Connection>(
    State(state): State<AppState<C>>,
    Path(property_id): Path<String>,
) -> ApiResult<PropertySignatureStatus> {
    let property_id = parse_id(&property_id)?;
    Ok(Json(state.signatures.property_status(property_id).await?))
}

/// GET /api/properties/:id/export-readiness
pub async fn export_readiness<C: Connection>(
    State(state): State<AppState<C>>,
    Path(property_id): Path<String>,
) -> ApiResult<ExportReadiness> {
    let property_id = parse_id(&property_id)?;
    Ok(Json(state.signatures.export_readiness(property_id).await?))
}
