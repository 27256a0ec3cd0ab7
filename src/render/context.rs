//! Render context: shared resources handed to every render.
//!
//! Image loading, QR encoding and fonts live here instead of in module
//! globals, so the CLI, the server and tests each build exactly the context
//! they need (tests typically inject an in-memory image source and no fonts).

use std::sync::Arc;
use std::time::Duration;

use super::config::SCALE_FACTOR;
use super::image_loader::{DEFAULT_IMAGE_TIMEOUT, ImageLoader, ImageSource};
use super::qr::QrGenerator;
use super::text::{FontBook, FontConfig};
use crate::error::InsertError;

/// Tunables for the render pipeline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Export upscaling over the base dimensions.
    pub scale_factor: f32,
    /// Upper bound for each logo load.
    pub image_timeout: Duration,
    pub fonts: FontConfig,
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale_factor: SCALE_FACTOR,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            fonts: FontConfig::default(),
            user_agent: concat!("insertprint/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Shared resources available to the renderer.
#[derive(Clone)]
pub struct RenderContext {
    /// Loader for logo bitmaps.
    pub images: Arc<dyn ImageSource>,
    pub qr: QrGenerator,
    pub fonts: Arc<FontBook>,
    /// Export scale factor (normally [`SCALE_FACTOR`]).
    pub scale: f32,
}

impl RenderContext {
    pub fn new(images: Arc<dyn ImageSource>, fonts: Arc<FontBook>, scale: f32) -> Self {
        Self {
            images,
            qr: QrGenerator::new(),
            fonts,
            scale,
        }
    }

    /// Build a context from configuration. Scans fonts, so do it once.
    pub fn from_config(config: &RenderConfig) -> Result<Self, InsertError> {
        if !(config.scale_factor.is_finite() && config.scale_factor > 0.0) {
            return Err(InsertError::Image(format!(
                "scale factor must be positive, got {}",
                config.scale_factor
            )));
        }
        let loader = ImageLoader::new(&config.user_agent, config.image_timeout)?;
        let fonts = FontBook::load(&config.fonts);
        Ok(Self::new(
            Arc::new(loader),
            Arc::new(fonts),
            config.scale_factor,
        ))
    }

    /// A minimal context for tests and tooling: default loader, no fonts,
    /// standard scale.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(ImageLoader::default()),
            Arc::new(FontBook::empty()),
            SCALE_FACTOR,
        )
    }

    /// Same context with a different image source.
    pub fn with_images(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = images;
        self
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("fonts", &self.fonts)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}
