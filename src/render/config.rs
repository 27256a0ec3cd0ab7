//! Draw configuration: scaled export geometry derived from a design's style.
//!
//! The export surface is the base dimensions multiplied by [`SCALE_FACTOR`] so
//! printed inserts stay crisp while the live preview keeps screen pixels.
//! Every offset and font size downstream is a multiple of `scale`, which keeps
//! preview and export proportions identical.

use serde::Serialize;

use crate::design::{PackageInsertDesign, StyleSize};
use crate::dimensions;

/// Export upscaling applied to the base dimensions.
pub const SCALE_FACTOR: f32 = 1.5;

/// Base padding on both axes, before scaling.
pub const BASE_PADDING: f32 = 24.0;

/// Fraction of the shorter side occupied by the QR code.
pub const QR_FRACTION: f32 = 0.35;

/// Horizontal and vertical padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub x: f32,
    pub y: f32,
}

/// Scaled layout for one render. Recomputed on every render, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawConfig {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub padding: Padding,
    /// Width available to the text block (a second padding buffer separates
    /// it from the QR block).
    pub content_width: f32,
    pub qr_size: f32,
}

impl DrawConfig {
    /// Configuration for a design at the standard export scale.
    pub fn for_design(design: &PackageInsertDesign) -> Self {
        Self::with_scale(design.style_size, SCALE_FACTOR)
    }

    /// Configuration for a style at an arbitrary scale.
    ///
    /// An unselected style resolves to the default dimensions; this never
    /// fails.
    pub fn with_scale(style: Option<StyleSize>, scale: f32) -> Self {
        let base = dimensions::lookup(style);
        let width = base.width as f32 * scale;
        let height = base.height as f32 * scale;
        let padding = BASE_PADDING * scale;

        let qr_size = width.min(height) * QR_FRACTION;
        let content_width = width - padding * 2.0 - qr_size - padding * 2.0;

        Self {
            width,
            height,
            scale,
            padding: Padding {
                x: padding,
                y: padding,
            },
            content_width,
            qr_size,
        }
    }

    /// Scale a base-pixel length.
    #[inline]
    pub fn px(&self, base: f32) -> f32 {
        base * self.scale
    }

    /// Raster size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_dimensions_scale_exactly() {
        for style in StyleSize::ALL {
            let base = dimensions::for_style(style);
            let config = DrawConfig::with_scale(Some(style), SCALE_FACTOR);
            assert_eq!(config.width, base.width as f32 * SCALE_FACTOR);
            assert_eq!(config.height, base.height as f32 * SCALE_FACTOR);
        }
    }

    #[test]
    fn test_qr_size_fraction_any_scale() {
        for style in StyleSize::ALL {
            for scale in [0.5, 1.0, 1.5, 2.0, 3.25] {
                let c = DrawConfig::with_scale(Some(style), scale);
                assert!(approx(c.qr_size, 0.35 * c.width.min(c.height)));
            }
        }
    }

    #[test]
    fn test_basic_4x6_geometry() {
        let c = DrawConfig::with_scale(Some(StyleSize::Basic4x6), 1.5);
        assert_eq!(c.width, 540.0);
        assert_eq!(c.height, 360.0);
        assert_eq!(c.padding, Padding { x: 36.0, y: 36.0 });
        assert!(approx(c.qr_size, 126.0));
        assert!(approx(c.content_width, 540.0 - 72.0 - 126.0 - 72.0));
        assert_eq!(c.pixel_size(), (540, 360));
    }

    #[test]
    fn test_unselected_style_uses_default_box() {
        let c = DrawConfig::with_scale(None, SCALE_FACTOR);
        assert_eq!(c.width, 540.0);
        assert_eq!(c.height, 360.0);
    }

    #[test]
    fn test_for_design_uses_scale_factor() {
        let design = PackageInsertDesign {
            style_size: Some(StyleSize::Standard3_5x8_5),
            ..Default::default()
        };
        let c = DrawConfig::for_design(&design);
        assert_eq!(c.scale, SCALE_FACTOR);
        assert_eq!(c.width, 720.0);
        assert_eq!(c.height, 300.0);
        assert!(approx(c.px(56.0), 84.0));
    }
}
