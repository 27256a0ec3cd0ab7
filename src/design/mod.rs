//! # Package Insert Design
//!
//! The record a merchant edits in the designer form and hands to the render
//! pipeline. Field names match the persistence layer's wire format, so the
//! same struct deserializes straight from a stored row.
//!
//! ## Example
//!
//! ```
//! use insertprint::design::{PackageInsertDesign, StyleSize};
//!
//! let json = r##"{
//!     "name": "Spring promo",
//!     "style_size": "Basic (4\" X 6\")",
//!     "survey_id": "srv_1",
//!     "include_logo": false,
//!     "background_color": "#fff",
//!     "headline": "Thanks!",
//!     "subtitle": "Enjoy",
//!     "brand_url": ""
//! }"##;
//!
//! let design: PackageInsertDesign = serde_json::from_str(json).unwrap();
//! assert_eq!(design.style_size, Some(StyleSize::Basic4x6));
//! ```

mod validate;

pub use validate::{is_valid_hex_color, validate};

use serde::{Deserialize, Deserializer, Serialize};

/// Default background for a fresh design (a light pastel blue).
pub const DEFAULT_BACKGROUND: &str = "#f0f9ff";
pub const DEFAULT_HEADLINE: &str = "Thanks for your purchase.";
pub const DEFAULT_SUBTITLE: &str = "Scan and Claim your assured gift";

/// Physical paper size and density variant of an insert.
///
/// The serialized form is the exact string literal stored by the
/// persistence layer, so these values double as a wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleSize {
    #[serde(rename = "Basic (3.5\" X 8.5\")")]
    Basic3_5x8_5,
    #[serde(rename = "Basic (4\" X 6\")")]
    Basic4x6,
    #[serde(rename = "Standard (3.5\" X 8.5\")")]
    Standard3_5x8_5,
    #[serde(rename = "Standard (4\" X 6\")")]
    Standard4x6,
}

impl StyleSize {
    /// Every supported style, in the order the designer lists them.
    pub const ALL: [StyleSize; 4] = [
        StyleSize::Basic3_5x8_5,
        StyleSize::Basic4x6,
        StyleSize::Standard3_5x8_5,
        StyleSize::Standard4x6,
    ];

    /// The wire literal for this style.
    pub fn label(self) -> &'static str {
        match self {
            StyleSize::Basic3_5x8_5 => "Basic (3.5\" X 8.5\")",
            StyleSize::Basic4x6 => "Basic (4\" X 6\")",
            StyleSize::Standard3_5x8_5 => "Standard (3.5\" X 8.5\")",
            StyleSize::Standard4x6 => "Standard (4\" X 6\")",
        }
    }

    /// Parse a wire literal. Returns `None` for empty or unknown values.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for StyleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient deserializer for `style_size`: empty or unrecognized literals
/// become `None` (no style selected) instead of rejecting the record.
fn deserialize_style_size<'de, D>(deserializer: D) -> Result<Option<StyleSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|label| {
        let style = StyleSize::from_label(label);
        if style.is_none() && !label.is_empty() {
            tracing::debug!(style_size = label, "unrecognized style size, treating as unselected");
        }
        style
    }))
}

fn default_true() -> bool {
    true
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

/// A package insert design record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInsertDesign {
    /// Display label (1–50 chars).
    #[serde(default)]
    pub name: String,
    /// `None` means no style has been selected yet; the preview is dimmed.
    #[serde(default, deserialize_with = "deserialize_style_size")]
    pub style_size: Option<StyleSize>,
    /// Opaque survey reference, resolved elsewhere to the QR target URL.
    #[serde(default)]
    pub survey_id: String,
    #[serde(default = "default_true")]
    pub include_logo: bool,
    /// Logo URL or data URI. Only used when `include_logo` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    /// `#RGB` or `#RRGGBB`.
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subtitle: String,
    /// Omitted from the render when empty.
    #[serde(default)]
    pub brand_url: String,
}

impl Default for PackageInsertDesign {
    fn default() -> Self {
        Self {
            name: String::new(),
            style_size: Some(StyleSize::Basic4x6),
            survey_id: String::new(),
            include_logo: true,
            logo_path: None,
            background_color: DEFAULT_BACKGROUND.to_string(),
            headline: DEFAULT_HEADLINE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            brand_url: String::new(),
        }
    }
}

impl PackageInsertDesign {
    /// The logo source to render, if the design asks for one and has one.
    pub fn logo_source(&self) -> Option<&str> {
        if !self.include_logo {
            return None;
        }
        self.logo_path.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// The brand URL, if non-empty.
    pub fn brand_url(&self) -> Option<&str> {
        Some(self.brand_url.as_str()).filter(|u| !u.is_empty())
    }
}

/// Output of an export: the QR code and the flattened print image, both as
/// PNG data URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInsertAssets {
    pub qr_code: String,
    pub print_image: String,
}

/// Download filename for the print image.
pub fn print_filename(design: &PackageInsertDesign) -> String {
    format!("{}-print.png", file_stem(&design.name))
}

/// Download filename for the standalone QR code.
pub fn qr_filename(design: &PackageInsertDesign) -> String {
    format!("{}-qr.png", file_stem(&design.name))
}

/// The design name as a single path component that is also safe inside a
/// quoted `Content-Disposition` value.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '"' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
