//! The box the preview content sits in.

use serde::Serialize;

use super::tree::Node;
use crate::design::PackageInsertDesign;
use crate::dimensions::{self, Dimensions};

/// Opacity applied while no style is selected.
pub const DIMMED_OPACITY: f32 = 0.5;

/// Distance of the dashed safe-zone outline from the edges.
pub const SAFE_ZONE_INSET: f32 = 32.0;

/// Print guides: edge and center lines on both axes plus a safe zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guides {
    /// Positions as fractions of the width.
    pub vertical: Vec<f32>,
    /// Positions as fractions of the height.
    pub horizontal: Vec<f32>,
    pub safe_zone_inset: f32,
    pub color: &'static str,
}

impl Default for Guides {
    fn default() -> Self {
        Self {
            vertical: vec![0.0, 0.5, 1.0],
            horizontal: vec![0.0, 0.5, 1.0],
            safe_zone_inset: SAFE_ZONE_INSET,
            color: "rgba(59, 130, 246, 0.2)",
        }
    }
}

/// A preview: content sized to the unscaled insert dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewContainer {
    pub dimensions: Dimensions,
    pub background: String,
    pub opacity: f32,
    /// True while no style is selected.
    pub dimmed: bool,
    /// `W × H` label shown above the preview.
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guides: Option<Guides>,
    /// Changes when the content must be re-rendered from scratch.
    pub content_key: u64,
    pub content: Option<Node>,
}

impl PreviewContainer {
    pub fn new(design: &PackageInsertDesign, content: Option<Node>, content_key: u64) -> Self {
        let dimensions = dimensions::lookup(design.style_size);
        let dimmed = design.style_size.is_none();
        Self {
            dimensions,
            background: design.background_color.clone(),
            opacity: if dimmed { DIMMED_OPACITY } else { 1.0 },
            dimmed,
            caption: format!("{} × {}", dimensions.width, dimensions.height),
            guides: None,
            content_key,
            content,
        }
    }

    pub fn with_guides(mut self, show: bool) -> Self {
        self.guides = show.then(Guides::default);
        self
    }
}
