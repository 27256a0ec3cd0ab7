//! # End-to-End Render Tests
//!
//! Exercise the export and preview paths together through the public API.
//!
//! ## Test Coverage
//!
//! - **Draw configuration**: sizes for every style and the no-style fallback
//! - **Export scenarios**: no logo, a logo that fails to load, a missing
//!   survey URL
//! - **Preview scenarios**: placeholders, dimming, consistency with export
//!
//! Logos come from an in-memory [`ImageSource`], so nothing touches the
//! network. No fonts are loaded; text ops are checked in the paint plan.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use pretty_assertions::assert_eq;

use insertprint::InsertError;
use insertprint::design::{PackageInsertDesign, StyleSize};
use insertprint::dimensions;
use insertprint::preview::{
    PreviewSession, layouts, plan_fields, tree::TextRole as PreviewRole, tree_fields,
};
use insertprint::render::canvas::{CanvasRenderer, export_assets};
use insertprint::render::config::{DrawConfig, SCALE_FACTOR};
use insertprint::render::context::RenderContext;
use insertprint::render::image_loader::{ImageSource, decode_data_uri};
use insertprint::render::plan::{self, PaintOp, TextRole};
use insertprint::render::qr::QrGenerator;

const SURVEY_URL: &str = "https://reviews.example.com/s/8f2c";
const GOOD_LOGO: &str = "mem://logo.png";
const BROKEN_LOGO: &str = "mem://broken.png";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Image source backed by a map. Unknown sources fail like a 404.
struct MemoryImages {
    images: HashMap<&'static str, DynamicImage>,
}

#[async_trait]
impl ImageSource for MemoryImages {
    async fn load(&self, source: &str) -> Result<DynamicImage, InsertError> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| InsertError::ImageLoad(format!("not found: {}", source)))
    }
}

fn context() -> RenderContext {
    let logo = RgbaImage::from_pixel(200, 100, Rgba([200, 30, 30, 255]));
    let images = MemoryImages {
        images: HashMap::from([(GOOD_LOGO, DynamicImage::ImageRgba8(logo))]),
    };
    RenderContext::offline().with_images(Arc::new(images))
}

/// The design from the first end-to-end scenario.
fn scenario_design() -> PackageInsertDesign {
    PackageInsertDesign {
        name: "Scenario".into(),
        style_size: Some(StyleSize::Basic4x6),
        survey_id: "survey-1".into(),
        headline: "Thanks!".into(),
        subtitle: "Enjoy".into(),
        brand_url: String::new(),
        include_logo: false,
        ..Default::default()
    }
}

/// Decode the single QR code in a grayscale image.
fn decode_qr(image: &GrayImage) -> String {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    grids[0].decode().unwrap().1
}

fn load_data_uri(uri: &str) -> DynamicImage {
    image::load_from_memory(&decode_data_uri(uri).unwrap()).unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ============================================================================
// DRAW CONFIGURATION
// ============================================================================

#[test]
fn test_every_style_scales_exactly() {
    for style in StyleSize::ALL {
        let dims = dimensions::for_style(style);
        let config = DrawConfig::with_scale(Some(style), SCALE_FACTOR);
        assert_eq!(config.width, dims.width as f32 * SCALE_FACTOR);
        assert_eq!(config.height, dims.height as f32 * SCALE_FACTOR);
        for scale in [1.0, SCALE_FACTOR, 3.0] {
            let config = DrawConfig::with_scale(Some(style), scale);
            assert!(approx(config.qr_size, 0.35 * config.width.min(config.height)));
        }
    }
}

#[test]
fn test_unknown_style_falls_back() {
    let dims = dimensions::lookup_label("Deluxe (5\" X 7\")");
    assert_eq!((dims.width, dims.height), (360, 240));

    let design: PackageInsertDesign =
        serde_json::from_str(r#"{"name": "x", "style_size": "Deluxe"}"#).unwrap();
    assert_eq!(design.style_size, None);
    let config = DrawConfig::for_design(&design);
    assert_eq!((config.width, config.height), (540.0, 360.0));
}

// ============================================================================
// EXPORT SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_scenario_basic_without_logo() {
    let ctx = context();
    let design = scenario_design();
    let out = CanvasRenderer::new(&ctx)
        .render(&design, Some(SURVEY_URL))
        .await
        .unwrap();

    assert_eq!((out.surface.width(), out.surface.height()), (540, 360));
    assert!(approx(out.config.padding.x, 36.0));
    assert!(approx(out.config.padding.y, 36.0));
    // 0.35 * min(540, 360)
    assert!(approx(out.config.qr_size, 126.0));
    assert!(!out.logo_drawn);
    assert!(!out.plan.iter().any(|op| matches!(op, PaintOp::Logo { .. })));

    let headline = plan::text_op(&out.plan, TextRole::Headline).unwrap();
    assert!(approx(headline.y, 84.0));
    assert!(approx(headline.x, 36.0));
}

#[tokio::test]
async fn test_scenario_logo_offsets_text() {
    let ctx = context();
    let mut design = scenario_design();
    design.include_logo = true;
    design.logo_path = Some(GOOD_LOGO.into());

    let out = CanvasRenderer::new(&ctx)
        .render(&design, Some(SURVEY_URL))
        .await
        .unwrap();
    assert!(out.logo_drawn);

    let headline = plan::text_op(&out.plan, TextRole::Headline).unwrap();
    assert!(approx(headline.y, 84.0 + 80.0 * SCALE_FACTOR));

    // 200x100 logo fits a 84px longer side
    let logo = out
        .plan
        .iter()
        .find_map(|op| match op {
            PaintOp::Logo { rect } => Some(*rect),
            _ => None,
        })
        .unwrap();
    assert!(approx(logo.width, 84.0) && approx(logo.height, 42.0));
    let center = out.surface.pixel((36.0 + 42.0) as u32, (36.0 + 21.0) as u32);
    assert!(center[0] > 180 && center[1] < 60, "got {:?}", center);
}

#[tokio::test]
async fn test_scenario_logo_failure_collapses_offset() {
    let ctx = context();
    let mut design = scenario_design();
    design.include_logo = true;
    design.logo_path = Some(BROKEN_LOGO.into());

    let out = CanvasRenderer::new(&ctx)
        .render(&design, Some(SURVEY_URL))
        .await
        .unwrap();
    assert!(!out.logo_drawn);

    let baseline = CanvasRenderer::new(&ctx)
        .render(&scenario_design(), Some(SURVEY_URL))
        .await
        .unwrap();
    let failed = plan::text_op(&out.plan, TextRole::Headline).unwrap();
    let expected = plan::text_op(&baseline.plan, TextRole::Headline).unwrap();
    assert_eq!(failed.y, expected.y);

    // Logo region keeps the background color
    let bg = out.surface.pixel(40, 40);
    assert_eq!(bg, Rgba([0xf0, 0xf9, 0xff, 255]));
}

#[tokio::test]
async fn test_scenario_missing_survey_url() {
    let ctx = context();
    let design = scenario_design();

    let err = export_assets(&ctx, &design, None).await.unwrap_err();
    assert!(matches!(err, InsertError::QrGeneration(_)));
    assert!(err.to_string().contains("survey URL is missing"));

    let container = PreviewSession::new().update(&ctx, &design, None).await;
    let content = container.content.unwrap();
    let placeholder = content.find_text(PreviewRole::Placeholder).unwrap();
    assert_eq!(placeholder.content, layouts::QR_LABEL);
}

#[tokio::test]
async fn test_exported_qr_encodes_survey_url() {
    let ctx = context();
    let assets = export_assets(&ctx, &scenario_design(), Some(SURVEY_URL))
        .await
        .unwrap();

    let exported = load_data_uri(&assets.qr_code).to_luma8();
    assert_eq!(decode_qr(&exported), SURVEY_URL);
    let reference = QrGenerator::new().generate(SURVEY_URL).unwrap();
    assert!(exported == reference.image);
}

#[tokio::test]
async fn test_print_image_qr_encodes_survey_url() {
    let ctx = context();
    let design = scenario_design();
    let assets = export_assets(&ctx, &design, Some(SURVEY_URL)).await.unwrap();

    let print = load_data_uri(&assets.print_image).to_luma8();
    let region = plan::qr_rect(&DrawConfig::for_design(&design)).inflate(8.0);
    let crop = image::imageops::crop_imm(
        &print,
        region.x as u32,
        region.y as u32,
        region.width as u32,
        region.height as u32,
    )
    .to_image();
    assert_eq!(decode_qr(&crop), SURVEY_URL);
}

// ============================================================================
// PREVIEW SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_preview_dimmed_without_style() {
    let ctx = context();
    let mut design = scenario_design();
    design.style_size = None;
    let container = PreviewSession::new()
        .update(&ctx, &design, Some(SURVEY_URL))
        .await;
    assert!(container.dimmed);
    assert_eq!(container.opacity, 0.5);
    assert_eq!(container.caption, "360 × 240");
    assert!(container.content.is_none());
}

#[tokio::test]
async fn test_preview_matches_export_content() {
    let ctx = context();
    for style in StyleSize::ALL {
        let design = PackageInsertDesign {
            style_size: Some(style),
            include_logo: true,
            logo_path: Some(GOOD_LOGO.into()),
            brand_url: "shop.example.com".into(),
            ..scenario_design()
        };

        let container = PreviewSession::new()
            .update(&ctx, &design, Some(SURVEY_URL))
            .await;
        let out = CanvasRenderer::new(&ctx)
            .render(&design, Some(SURVEY_URL))
            .await
            .unwrap();

        assert_eq!(container.content_key, 1);
        assert_eq!(tree_fields(&container.content.unwrap()), plan_fields(&out.plan));
    }
}

#[tokio::test]
async fn test_preview_broken_logo_keeps_layout() {
    let ctx = context();
    let design = PackageInsertDesign {
        style_size: Some(StyleSize::Standard3_5x8_5),
        include_logo: true,
        logo_path: Some(BROKEN_LOGO.into()),
        ..scenario_design()
    };
    let container = PreviewSession::new()
        .update(&ctx, &design, Some(SURVEY_URL))
        .await;
    let content = container.content.unwrap();
    assert!(content.find_placeholder(layouts::LOGO_LABEL).is_some());
    assert!(content.find_image(layouts::QR_LABEL).is_some());
    assert_eq!(content.find_text(PreviewRole::Headline).unwrap().content, "Thanks!");
}
