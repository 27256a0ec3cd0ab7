//! # Canvas Renderer
//!
//! Produces the flattened, print-resolution image for a design.
//!
//! ```text
//! design ─► DrawConfig ─► ┬─ load logo ─► paint plan ─► paint content ─┬─► paint QR ─► PNG
//!                         └─ generate QR (blocking pool) ─────────────┘
//! ```
//!
//! The logo must finish loading before the text is placed (its presence
//! moves the headline down), but QR generation runs alongside and is only
//! awaited for the final compositing step.
//!
//! Failure policy:
//! - a logo that fails to load is logged and treated as absent, including for
//!   the headline offset;
//! - a missing survey URL or a QR failure aborts the export, since an insert
//!   without a scannable code is not worth printing.

use image::DynamicImage;

use super::config::DrawConfig;
use super::context::RenderContext;
use super::image_loader::describe_source;
use super::plan::{self, PaintOp};
use super::qr::QrBitmap;
use super::surface::{Surface, WHITE, parse_hex_color};
use crate::design::{PackageInsertAssets, PackageInsertDesign};
use crate::error::InsertError;

/// Everything produced by one render.
pub struct RenderOutput {
    pub config: DrawConfig,
    pub plan: Vec<PaintOp>,
    pub surface: Surface,
    pub qr: QrBitmap,
    /// Whether a logo was actually drawn.
    pub logo_drawn: bool,
}

impl RenderOutput {
    pub fn to_assets(&self) -> Result<PackageInsertAssets, InsertError> {
        Ok(PackageInsertAssets {
            qr_code: self.qr.data_uri.clone(),
            print_image: self.surface.to_data_uri()?,
        })
    }
}

/// Renders designs against a [`RenderContext`].
pub struct CanvasRenderer<'a> {
    ctx: &'a RenderContext,
}

impl<'a> CanvasRenderer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    /// Render the print image for `design`, encoding `survey_url` as the QR.
    pub async fn render(
        &self,
        design: &PackageInsertDesign,
        survey_url: Option<&str>,
    ) -> Result<RenderOutput, InsertError> {
        let survey_url = survey_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                InsertError::QrGeneration(
                    "survey URL is missing; cannot generate the QR code for this insert"
                        .to_string(),
                )
            })?;

        let config = DrawConfig::with_scale(design.style_size, self.ctx.scale);

        let content = async {
            let logo = self.load_logo(design).await;
            let logo_size = logo.as_ref().map(|img| (img.width(), img.height()));
            let plan = plan::build_plan(design, &config, logo_size);

            let (width, height) = config.pixel_size();
            let mut surface = Surface::new(width, height);
            self.paint(&mut surface, &plan, logo.as_ref(), None);
            (surface, plan, logo.is_some())
        };
        let qr = self.ctx.qr.generate_async(survey_url);

        let ((mut surface, plan, logo_drawn), qr) = tokio::join!(content, qr);
        let qr = qr.inspect_err(|e| tracing::warn!(error = %e, "QR generation failed"))?;

        self.paint(&mut surface, &plan, None, Some(&qr));

        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            logo_drawn,
            "rendered package insert"
        );

        Ok(RenderOutput {
            config,
            plan,
            surface,
            qr,
            logo_drawn,
        })
    }

    /// Load the design's logo. Failures are logged and yield `None`.
    pub async fn load_logo(&self, design: &PackageInsertDesign) -> Option<DynamicImage> {
        let source = design.logo_source()?;
        match self.ctx.images.load(source).await {
            Ok(img) if img.width() > 0 && img.height() > 0 => Some(img),
            Ok(_) => {
                tracing::warn!(source = describe_source(source), "logo has no pixels; rendering without it");
                None
            }
            Err(e) => {
                tracing::warn!(source = describe_source(source), error = %e, "logo failed to load; rendering without it");
                None
            }
        }
    }

    /// Execute plan ops. QR ops run only when `qr` is given; every other op
    /// runs only when it is not, so content and QR can be painted in two
    /// passes.
    pub fn paint(
        &self,
        surface: &mut Surface,
        ops: &[PaintOp],
        logo: Option<&DynamicImage>,
        qr: Option<&QrBitmap>,
    ) {
        let mut missing_fonts = false;

        for op in ops {
            match (op, qr) {
                (PaintOp::Background { color }, None) => {
                    let fill = parse_hex_color(color).unwrap_or_else(|| {
                        tracing::warn!(color = %color, "invalid background color; using white");
                        WHITE
                    });
                    surface.fill(fill);
                }
                (PaintOp::Logo { rect }, None) => {
                    if let Some(logo) = logo {
                        surface.draw_image(logo, *rect);
                    }
                }
                (PaintOp::Text(text), None) => {
                    let color = parse_hex_color(text.color).unwrap_or(WHITE);
                    if !surface.fill_text(&self.ctx.fonts, text, color) {
                        missing_fonts = true;
                    }
                }
                (PaintOp::QrBacking { rect, radius }, Some(_)) => {
                    let color = parse_hex_color(plan::QR_BACKING_COLOR).unwrap_or(WHITE);
                    surface.fill_rounded_rect(*rect, *radius, color);
                }
                (PaintOp::QrCode { rect }, Some(qr)) => {
                    surface.draw_image(&DynamicImage::ImageLuma8(qr.image.clone()), *rect);
                }
                _ => {}
            }
        }

        if missing_fonts {
            tracing::warn!("no fonts available; text was skipped");
        }
    }
}

/// Render a design and return its export assets.
pub async fn export_assets(
    ctx: &RenderContext,
    design: &PackageInsertDesign,
    survey_url: Option<&str>,
) -> Result<PackageInsertAssets, InsertError> {
    let output = CanvasRenderer::new(ctx).render(design, survey_url).await?;
    let assets = output.to_assets()?;
    tracing::info!(
        name = %design.name,
        style = design.style_size.map(|s| s.label()).unwrap_or("none"),
        logo_drawn = output.logo_drawn,
        "exported package insert"
    );
    Ok(assets)
}
