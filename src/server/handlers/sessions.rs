//! Editing session handlers.
//!
//! A session keeps the preview slots warm between edits (the logo and QR are
//! only regenerated when their inputs change) and guards exports with render
//! tickets, so an export overtaken by a newer one answers 409 instead of
//! returning outdated assets.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    design::{self, PackageInsertAssets},
    preview::PreviewContainer,
    render::session::RenderOutcome,
};

use super::super::state::{AppState, EditSession};
use super::ApiError;
use super::inserts::InsertRequest;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
}

/// POST /api/sessions - Start an editing session.
pub async fn create(State(state): State<Arc<AppState>>) -> (StatusCode, Json<CreateSessionResponse>) {
    let id = Uuid::new_v4().to_string();
    state.create_session(id.clone()).await;
    tracing::debug!(session = %id, "created editing session");
    (StatusCode::CREATED, Json(CreateSessionResponse { id }))
}

async fn find(state: &AppState, id: &str) -> Result<Arc<EditSession>, ApiError> {
    state.session(id).await.ok_or_else(|| {
        ApiError::new(StatusCode::NOT_FOUND, format!("Session not found: {}", id))
    })
}

/// POST /api/sessions/:id/preview - Update the session's preview.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<PreviewContainer>, ApiError> {
    let session = find(&state, &id).await?;
    let Json(req) = payload?;
    let container = session
        .preview
        .update(&state.render, &req.design, req.survey_url.as_deref())
        .await
        .with_guides(req.guides);
    Ok(Json(container))
}

/// POST /api/sessions/:id/export - Export, unless a newer export overtakes it.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<PackageInsertAssets>, ApiError> {
    let session = find(&state, &id).await?;
    let Json(req) = payload?;
    design::validate(&req.design)?;

    match session
        .render
        .export(&state.render, &req.design, req.survey_url.as_deref())
        .await?
    {
        RenderOutcome::Current(assets) => Ok(Json(assets)),
        RenderOutcome::Superseded { ticket, latest } => Err(ApiError::new(
            StatusCode::CONFLICT,
            format!(
                "Export {} was superseded by export {}",
                ticket.value(),
                latest.value()
            ),
        )),
    }
}

/// GET /api/sessions/:id/export - The last published export.
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PackageInsertAssets>, ApiError> {
    let session = find(&state, &id).await?;
    session
        .render
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "No export yet".to_string()))
}
