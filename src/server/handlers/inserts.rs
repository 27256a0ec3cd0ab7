//! Stateless package insert API handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    design::{self, PackageInsertAssets, PackageInsertDesign, StyleSize},
    dimensions::{self, Dimensions},
    error::ValidationErrors,
    preview::{LayoutVariant, PreviewContainer, PreviewSession},
    render::{
        canvas::{CanvasRenderer, export_assets},
        config::DrawConfig,
    },
};

use super::super::state::AppState;
use super::ApiError;

/// A design plus the survey URL resolved for it.
#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub design: PackageInsertDesign,
    #[serde(default, alias = "surveyUrl")]
    pub survey_url: Option<String>,
    /// Include print guides in preview responses.
    #[serde(default)]
    pub guides: bool,
}

/// Style information returned by the API.
#[derive(Debug, Serialize)]
pub struct StyleInfo {
    pub label: &'static str,
    pub variant: LayoutVariant,
    /// Preview size in screen pixels.
    pub dimensions: Dimensions,
    /// Export size in pixels.
    pub print_width: u32,
    pub print_height: u32,
}

/// Validation outcome.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

/// GET /api/styles - List the supported insert styles.
pub async fn styles(State(state): State<Arc<AppState>>) -> Json<Vec<StyleInfo>> {
    let infos = StyleSize::ALL
        .iter()
        .map(|&style| {
            let (print_width, print_height) =
                DrawConfig::with_scale(Some(style), state.render.scale).pixel_size();
            StyleInfo {
                label: style.label(),
                variant: LayoutVariant::from(style),
                dimensions: dimensions::for_style(style),
                print_width,
                print_height,
            }
        })
        .collect();
    Json(infos)
}

/// POST /api/inserts/validate - Field-level validation.
pub async fn validate(
    payload: Result<Json<PackageInsertDesign>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(design) = payload?;
    Ok(match design::validate(&design) {
        Ok(()) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                errors: ValidationErrors::default(),
            }),
        ),
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidateResponse {
                valid: false,
                errors,
            }),
        ),
    })
}

/// POST /api/inserts/preview - Render the preview tree. Never fails on
/// content: broken logos and QR codes become placeholders.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<PreviewContainer>, ApiError> {
    let Json(req) = payload?;
    let session = PreviewSession::new().with_guides(req.guides);
    let container = session
        .update(&state.render, &req.design, req.survey_url.as_deref())
        .await;
    Ok(Json(container))
}

/// POST /api/inserts/print.png - Render the print image as PNG bytes.
pub async fn print_png(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    design::validate(&req.design)?;

    let output = CanvasRenderer::new(&state.render)
        .render(&req.design, req.survey_url.as_deref())
        .await?;
    let png = output.surface.to_png()?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        design::print_filename(&req.design)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}

/// POST /api/inserts/export - Render both assets as data URIs.
pub async fn export(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<PackageInsertAssets>, ApiError> {
    let Json(req) = payload?;
    design::validate(&req.design)?;
    let assets = export_assets(&state.render, &req.design, req.survey_url.as_deref()).await?;
    Ok(Json(assets))
}
