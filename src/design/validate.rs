//! Field-level validation for designs.
//!
//! Validation blocks saving and exporting but never the live preview, so it
//! is a separate pass rather than something enforced at deserialization.

use std::sync::LazyLock;

use regex::Regex;

use super::PackageInsertDesign;
use crate::error::ValidationErrors;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex color pattern is valid")
});

const NAME_MAX: usize = 50;
const HEADLINE_MAX: usize = 50;
const SUBTITLE_MAX: usize = 100;
const BRAND_URL_MAX: usize = 100;

/// True for `#RGB` and `#RRGGBB` colors.
pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Check every field and report all failures at once.
pub fn validate(design: &PackageInsertDesign) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name_len = design.name.chars().count();
    if name_len == 0 {
        errors.push("name", "Nickname is required");
    } else if name_len > NAME_MAX {
        errors.push("name", format!("Nickname must be at most {NAME_MAX} characters"));
    }

    if design.style_size.is_none() {
        errors.push("style_size", "Style is required");
    }

    if design.survey_id.trim().is_empty() {
        errors.push("survey_id", "Survey is required");
    }

    if !is_valid_hex_color(&design.background_color) {
        errors.push("background_color", "Invalid color format");
    }

    if design.headline.chars().count() > HEADLINE_MAX {
        errors.push("headline", "Headline must be less than 50 characters");
    }
    if design.subtitle.chars().count() > SUBTITLE_MAX {
        errors.push("subtitle", "Subtitle must be less than 100 characters");
    }
    if design.brand_url.chars().count() > BRAND_URL_MAX {
        errors.push("brand_url", "URL must be less than 100 characters");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
