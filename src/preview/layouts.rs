//! # Layout Variants
//!
//! One arrangement per [`StyleSize`]. All variants show the same fields (logo,
//! headline, subtitle, QR panel with optional brand URL) in two columns and
//! differ only in geometry, which each variant owns as a [`VariantSpec`].
//!
//! | Variant                 | Content padding | QR column      | QR box |
//! |-------------------------|-----------------|----------------|--------|
//! | `Basic (3.5" X 8.5")`   | 16              | half width     | 128    |
//! | `Basic (4" X 6")`       | 16              | half width     | 120    |
//! | `Standard (3.5" X 8.5")`| 24              | 128 px         | 160    |
//! | `Standard (4" X 6")`    | 24 (right 8)    | one third      | 120    |
//!
//! Sizes are screen pixels; the preview is never scaled.

use serde::Serialize;

use super::state::{LogoState, PreviewState, QrStatus};
use super::tree::{
    Align, Frame, ImageNode, Insets, Length, Node, PlaceholderNode, SpinnerNode, TextNode,
    TextRole,
};
use crate::design::{PackageInsertDesign, StyleSize};
use crate::render::plan::{BRAND_URL_COLOR, QR_BACKING_COLOR};
use crate::render::text::Weight;

pub const HEADLINE_COLOR: &str = "#111827";
pub const SUBTITLE_COLOR: &str = "#4B5563";
pub const PLACEHOLDER_COLOR: &str = "#9CA3AF";
pub const ERROR_COLOR: &str = "#EF4444";

pub const LOGO_LABEL: &str = "Logo";
pub const QR_LABEL: &str = "QR Code";
pub const QR_ERROR_LABEL: &str = "Error";

/// The four layouts, one per style size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    Basic3_5x8_5,
    Basic4x6,
    Standard3_5x8_5,
    Standard4x6,
}

impl From<StyleSize> for LayoutVariant {
    fn from(style: StyleSize) -> Self {
        match style {
            StyleSize::Basic3_5x8_5 => LayoutVariant::Basic3_5x8_5,
            StyleSize::Basic4x6 => LayoutVariant::Basic4x6,
            StyleSize::Standard3_5x8_5 => LayoutVariant::Standard3_5x8_5,
            StyleSize::Standard4x6 => LayoutVariant::Standard4x6,
        }
    }
}

/// Geometry of one layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantSpec {
    pub content_padding: Insets,
    /// Cross-axis alignment of the text column.
    pub content_align: Align,
    /// Vertical alignment of both columns inside the insert.
    pub row_align: Align,
    pub logo_size: f32,
    pub logo_gap: f32,
    pub text_gap: f32,
    pub headline_size: f32,
    pub subtitle_size: f32,
    pub qr_column_width: Length,
    pub qr_column_padding: Insets,
    pub qr_box_width: f32,
    pub qr_box_padding: f32,
    pub qr_box_radius: f32,
    pub brand_url_size: f32,
    pub brand_url_gap: f32,
}

const BASIC: VariantSpec = VariantSpec {
    content_padding: Insets::all(16.0),
    content_align: Align::Start,
    row_align: Align::Center,
    logo_size: 48.0,
    logo_gap: 16.0,
    text_gap: 4.0,
    headline_size: 20.0,
    subtitle_size: 14.0,
    qr_column_width: Length::Fraction(0.5),
    qr_column_padding: Insets::new(0.0, 16.0, 0.0, 0.0),
    qr_box_width: 120.0,
    qr_box_padding: 12.0,
    qr_box_radius: 8.0,
    brand_url_size: 12.0,
    brand_url_gap: 8.0,
};

const STANDARD: VariantSpec = VariantSpec {
    content_padding: Insets::all(24.0),
    content_align: Align::Center,
    row_align: Align::Stretch,
    logo_size: 56.0,
    logo_gap: 24.0,
    text_gap: 6.0,
    headline_size: 24.0,
    subtitle_size: 14.0,
    qr_column_width: Length::Px(128.0),
    qr_column_padding: Insets::new(0.0, 16.0, 0.0, 0.0),
    qr_box_width: 160.0,
    qr_box_padding: 16.0,
    qr_box_radius: 8.0,
    brand_url_size: 12.0,
    brand_url_gap: 8.0,
};

impl LayoutVariant {
    pub fn spec(self) -> VariantSpec {
        match self {
            LayoutVariant::Basic3_5x8_5 => VariantSpec {
                qr_box_width: 128.0,
                ..BASIC
            },
            LayoutVariant::Basic4x6 => BASIC,
            LayoutVariant::Standard3_5x8_5 => STANDARD,
            LayoutVariant::Standard4x6 => VariantSpec {
                content_padding: Insets::new(24.0, 8.0, 24.0, 24.0),
                content_align: Align::Start,
                row_align: Align::Center,
                logo_gap: 20.0,
                qr_column_width: Length::Fraction(1.0 / 3.0),
                qr_box_width: 120.0,
                ..STANDARD
            },
        }
    }

    /// Arrange `design` with this variant.
    pub fn render(self, design: &PackageInsertDesign, state: &PreviewState) -> Node {
        let spec = self.spec();

        let text = Frame::column()
            .gap(spec.text_gap)
            .child(TextNode::new(
                TextRole::Headline,
                design.headline.as_str(),
                spec.headline_size,
                Weight::Bold,
                HEADLINE_COLOR,
            ))
            .child(TextNode::new(
                TextRole::Subtitle,
                design.subtitle.as_str(),
                spec.subtitle_size,
                Weight::Regular,
                SUBTITLE_COLOR,
            ));

        let logo = design.include_logo.then(|| {
            Frame::column()
                .padding(Insets::new(0.0, 0.0, spec.logo_gap, 0.0))
                .child(logo_slot(&state.logo, spec.logo_size))
        });

        let content = Frame::column()
            .size(Length::Fill, Length::Fill)
            .padding(spec.content_padding)
            .align(spec.content_align)
            .child_opt(logo)
            .child(text);

        let qr_column = Frame::row()
            .size(spec.qr_column_width, Length::Fill)
            .padding(spec.qr_column_padding)
            .centered()
            .child(qr_box(design, state, &spec));

        Frame::row()
            .size(Length::Fill, Length::Fill)
            .align(spec.row_align)
            .child(content)
            .child(qr_column)
            .into()
    }
}

/// Arrange the design content for its style, or `None` when no style is
/// selected.
pub fn render_content(design: &PackageInsertDesign, state: &PreviewState) -> Option<Node> {
    design
        .style_size
        .map(|style| LayoutVariant::from(style).render(design, state))
}

fn logo_slot(logo: &LogoState, size: f32) -> Node {
    let side = Length::Px(size);
    match logo {
        LogoState::Loaded { source, .. } => ImageNode {
            src: source.clone(),
            alt: LOGO_LABEL,
            width: side,
            height: side,
        }
        .into(),
        LogoState::Loading { .. } => Frame::row()
            .size(side, side)
            .background("#F3F4F6")
            .centered()
            .child(SpinnerNode { size: 20.0 })
            .into(),
        LogoState::NoLogo | LogoState::Errored { .. } => PlaceholderNode {
            label: LOGO_LABEL,
            width: side,
            height: side,
        }
        .into(),
    }
}

fn qr_box(design: &PackageInsertDesign, state: &PreviewState, spec: &VariantSpec) -> Frame {
    let inner = Length::Px(spec.qr_box_width - spec.qr_box_padding * 2.0);
    let square = Frame::row().size(inner, inner).centered();
    let square = match state.qr.status() {
        QrStatus::Idle => square.child(TextNode::new(
            TextRole::Placeholder,
            QR_LABEL,
            14.0,
            Weight::Regular,
            PLACEHOLDER_COLOR,
        )),
        QrStatus::Loading => square.child(SpinnerNode { size: 24.0 }),
        QrStatus::Ready { data_uri } => square.child(ImageNode {
            src: data_uri.clone(),
            alt: QR_LABEL,
            width: Length::Fill,
            height: Length::Fill,
        }),
        QrStatus::Failed { .. } => square.child(TextNode::new(
            TextRole::QrError,
            QR_ERROR_LABEL,
            14.0,
            Weight::Regular,
            ERROR_COLOR,
        )),
    };

    let brand_url = design.brand_url().map(|url| {
        TextNode::new(
            TextRole::BrandUrl,
            url,
            spec.brand_url_size,
            Weight::Regular,
            BRAND_URL_COLOR,
        )
    });

    Frame::column()
        .size(Length::Px(spec.qr_box_width), Length::Auto)
        .padding(Insets::all(spec.qr_box_padding))
        .gap(spec.brand_url_gap)
        .align(Align::Center)
        .background(QR_BACKING_COLOR)
        .radius(spec.qr_box_radius)
        .child(square)
        .child_opt(brand_url)
}
