//! # Dimension Table
//!
//! Base (screen) pixel sizes for each supported insert style.
//!
//! | Style | Width | Height |
//! |-------|-------|--------|
//! | Basic / Standard (3.5" X 8.5") | 480 | 200 |
//! | Basic / Standard (4" X 6") | 360 | 240 |
//! | none / unknown | 360 | 240 |
//!
//! Lookups never fail: an unselected style falls back to the default box and
//! the preview renders dimmed instead of erroring.

use serde::Serialize;

use crate::design::StyleSize;

/// Width and height in base pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Dimensions used when no style is selected.
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions::new(360, 240);

/// Dimensions for a known style.
pub const fn for_style(style: StyleSize) -> Dimensions {
    match style {
        StyleSize::Basic3_5x8_5 | StyleSize::Standard3_5x8_5 => Dimensions::new(480, 200),
        StyleSize::Basic4x6 | StyleSize::Standard4x6 => Dimensions::new(360, 240),
    }
}

/// Dimensions for an optional style, falling back to the default box.
pub fn lookup(style: Option<StyleSize>) -> Dimensions {
    style.map(for_style).unwrap_or(DEFAULT_DIMENSIONS)
}

/// Dimensions for a raw wire literal, falling back to the default box.
pub fn lookup_label(label: &str) -> Dimensions {
    lookup(StyleSize::from_label(label))
}
