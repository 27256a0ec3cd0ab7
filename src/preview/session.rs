//! Drives the preview state for one editing session.

use tokio::sync::Mutex;

use super::container::PreviewContainer;
use super::layouts::render_content;
use super::state::PreviewState;
use crate::design::PackageInsertDesign;
use crate::render::context::RenderContext;
use crate::render::image_loader::describe_source;

/// Preview state for one design being edited.
///
/// Each [`update`](Self::update) syncs the logo and QR slots with the design,
/// runs whatever loads that requires (concurrently, outside the lock), lands
/// the results and returns the rendered container. Overlapping updates are
/// safe: results for a source or URL that has since changed are dropped.
#[derive(Debug, Default)]
pub struct PreviewSession {
    state: Mutex<PreviewState>,
    guides: bool,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show print guides on every rendered container.
    pub fn with_guides(mut self, guides: bool) -> Self {
        self.guides = guides;
        self
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> PreviewState {
        self.state.lock().await.clone()
    }

    pub async fn update(
        &self,
        ctx: &RenderContext,
        design: &PackageInsertDesign,
        survey_url: Option<&str>,
    ) -> PreviewContainer {
        let (logo_request, qr_request) = {
            let mut state = self.state.lock().await;
            (
                state.logo.sync(design.logo_source()),
                state.qr.begin(survey_url),
            )
        };

        let logo = async {
            let source = logo_request?;
            let result = ctx.images.load(&source).await;
            Some((source, result))
        };
        let qr = async {
            let request = qr_request?;
            let result = ctx.qr.generate_async(&request.url).await;
            Some((request.version, result))
        };
        let (logo, qr) = tokio::join!(logo, qr);

        let mut state = self.state.lock().await;

        if let Some((source, result)) = logo {
            let size = match result {
                Ok(img) if img.width() > 0 && img.height() > 0 => Some((img.width(), img.height())),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(source = describe_source(&source), error = %e, "preview logo failed to load");
                    None
                }
            };
            state.complete_logo(&source, size);
        }

        if let Some((version, result)) = qr {
            if let Err(e) = &result {
                tracing::warn!(error = %e, "preview QR generation failed");
            }
            state
                .qr
                .complete(version, result.as_ref().map_err(|e| e.to_string()));
        }

        let content = render_content(design, &state);
        PreviewContainer::new(design, content, state.content_key).with_guides(self.guides)
    }
}
