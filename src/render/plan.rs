//! # Paint Plan
//!
//! The export renderer works in two steps: first it decides *what* goes
//! *where* as an ordered list of [`PaintOp`]s, then a [`Surface`] executes the
//! list. Keeping the geometry in plain data makes every position in the print
//! image checkable without rasterizing anything.
//!
//! ## Paint order
//!
//! ```text
//! Background → Logo → Headline → Subtitle → BrandUrl → QrBacking → QrCode
//! ```
//!
//! Later ops occlude earlier ones where they overlap.
//!
//! [`Surface`]: super::surface::Surface

use serde::Serialize;

use super::config::DrawConfig;
use super::text::Weight;
use crate::design::PackageInsertDesign;

/// Longest logo side, before scaling.
pub const LOGO_MAX_SIZE: f32 = 56.0;
/// Vertical space reserved for a drawn logo, before scaling.
pub const LOGO_OFFSET: f32 = 80.0;
pub const HEADLINE_SIZE: f32 = 32.0;
pub const SUBTITLE_SIZE: f32 = 20.0;
pub const BRAND_URL_SIZE: f32 = 14.0;
/// Gap between the headline and subtitle anchors, before scaling.
pub const SUBTITLE_GAP: f32 = 40.0;
/// Total white border around the QR code (half on each side), before scaling.
pub const QR_BACKING_PADDING: f32 = 16.0;
pub const QR_BACKING_RADIUS: f32 = 8.0;

pub const HEADLINE_COLOR: &str = "#000000";
pub const SUBTITLE_COLOR: &str = "#374151";
pub const BRAND_URL_COLOR: &str = "#6B7280";
pub const QR_BACKING_COLOR: &str = "#FFFFFF";

/// Axis-aligned rectangle in export pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow by `amount` on every side.
    pub fn inflate(self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Horizontal anchor of a text op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

/// What a text op is, independent of where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Headline,
    Subtitle,
    BrandUrl,
}

/// One line of text. `y` is the vertical middle of the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOp {
    pub role: TextRole,
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: Weight,
    pub color: &'static str,
    pub align: TextAlign,
    pub max_width: Option<f32>,
}

/// A single drawing step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    Background { color: String },
    Logo { rect: Rect },
    Text(TextOp),
    QrBacking { rect: Rect, radius: f32 },
    QrCode { rect: Rect },
}

/// Fit `(width, height)` so the longer side equals `max_size`, keeping the
/// aspect ratio. Square images take the height branch.
pub fn scaled_dimensions(width: f32, height: f32, max_size: f32) -> (f32, f32) {
    if width > height {
        (max_size, height * max_size / width)
    } else {
        (width * max_size / height, max_size)
    }
}

/// Build the paint plan for a design.
///
/// `logo_size` is the natural size of a logo that actually loaded. Passing
/// `None` (no logo requested, or the load failed) omits the logo op and the
/// text starts at the top padding instead of below the logo.
pub fn build_plan(
    design: &PackageInsertDesign,
    config: &DrawConfig,
    logo_size: Option<(u32, u32)>,
) -> Vec<PaintOp> {
    let mut ops = vec![PaintOp::Background {
        color: design.background_color.clone(),
    }];

    if let Some((w, h)) = logo_size {
        let (width, height) = scaled_dimensions(w as f32, h as f32, config.px(LOGO_MAX_SIZE));
        ops.push(PaintOp::Logo {
            rect: Rect::new(config.padding.x, config.padding.y, width, height),
        });
    }

    let logo_offset = if logo_size.is_some() {
        config.px(LOGO_OFFSET)
    } else {
        0.0
    };
    let content_y = config.padding.y + logo_offset;
    let headline_y = content_y + config.px(HEADLINE_SIZE);
    let subtitle_y = headline_y + config.px(SUBTITLE_GAP);

    ops.push(PaintOp::Text(TextOp {
        role: TextRole::Headline,
        content: design.headline.clone(),
        x: config.padding.x,
        y: headline_y,
        size: config.px(HEADLINE_SIZE),
        weight: Weight::Bold,
        color: HEADLINE_COLOR,
        align: TextAlign::Left,
        max_width: Some(config.content_width),
    }));

    ops.push(PaintOp::Text(TextOp {
        role: TextRole::Subtitle,
        content: design.subtitle.clone(),
        x: config.padding.x,
        y: subtitle_y,
        size: config.px(SUBTITLE_SIZE),
        weight: Weight::Regular,
        color: SUBTITLE_COLOR,
        align: TextAlign::Left,
        max_width: Some(config.content_width),
    }));

    if let Some(url) = design.brand_url() {
        ops.push(PaintOp::Text(TextOp {
            role: TextRole::BrandUrl,
            content: url.to_string(),
            x: config.width - config.qr_size / 2.0 - config.padding.x,
            y: config.height - config.padding.y,
            size: config.px(BRAND_URL_SIZE),
            weight: Weight::Regular,
            color: BRAND_URL_COLOR,
            align: TextAlign::Center,
            max_width: None,
        }));
    }

    let qr = qr_rect(config);
    ops.push(PaintOp::QrBacking {
        rect: qr.inflate(config.px(QR_BACKING_PADDING) / 2.0),
        radius: config.px(QR_BACKING_RADIUS),
    });
    ops.push(PaintOp::QrCode { rect: qr });

    ops
}

/// Where the QR code lands: right-aligned inside the padding, vertically
/// centered.
pub fn qr_rect(config: &DrawConfig) -> Rect {
    Rect::new(
        config.width - config.qr_size - config.padding.x,
        (config.height - config.qr_size) / 2.0,
        config.qr_size,
        config.qr_size,
    )
}

/// Find the text op with the given role.
pub fn text_op(ops: &[PaintOp], role: TextRole) -> Option<&TextOp> {
    ops.iter().find_map(|op| match op {
        PaintOp::Text(t) if t.role == role => Some(t),
        _ => None,
    })
}
