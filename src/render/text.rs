//! TTF text rendering for the export canvas.
//!
//! Faces are resolved through `fontdb` (system fonts, extra directories and
//! individual files) and rasterized with ab_glyph into an anti-aliased
//! coverage buffer, which the surface then blends in the requested color.

use std::path::PathBuf;

use ab_glyph::{Font, FontArc, FontVec, PxScale, ScaleFont};
use serde::Deserialize;

/// Where to find fonts.
#[derive(Debug, Clone, Deserialize)]
pub struct FontConfig {
    /// Scan the platform's font directories.
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,
    /// Extra directories to scan.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
    /// Extra font files to register.
    #[serde(default)]
    pub font_files: Vec<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            font_dirs: Vec::new(),
            font_files: Vec::new(),
        }
    }
}

impl FontConfig {
    /// No fonts at all. Text ops are skipped; geometry is unchanged.
    pub fn none() -> Self {
        Self {
            load_system_fonts: false,
            font_dirs: Vec::new(),
            font_files: Vec::new(),
        }
    }
}

/// Font weight used by a text op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Regular,
    Bold,
}

/// Resolved sans-serif faces.
#[derive(Clone, Default)]
pub struct FontBook {
    regular: Option<FontArc>,
    bold: Option<FontArc>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl FontBook {
    /// A book with no faces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve the configured sources into regular and bold sans-serif faces.
    pub fn load(config: &FontConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        for file in &config.font_files {
            if let Err(e) = db.load_font_file(file) {
                tracing::warn!(path = %file.display(), error = %e, "failed to load font file");
            }
        }

        let regular = query_face(&db, fontdb::Weight::NORMAL);
        let bold = query_face(&db, fontdb::Weight::BOLD).or_else(|| regular.clone());

        if regular.is_none() {
            tracing::warn!(faces = db.len(), "no usable sans-serif font found; text will be skipped");
        }

        Self { regular, bold }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }

    pub fn face(&self, weight: Weight) -> Option<&FontArc> {
        match weight {
            Weight::Regular => self.regular.as_ref(),
            Weight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
        }
    }
}

/// Find a sans-serif face of the given weight, falling back to whatever face
/// the database has first.
fn query_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<FontArc> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|face| face.id))?;

    db.with_face_data(id, |data, index| {
        FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
    })
    .flatten()
    .map(FontArc::new)
}

/// Rendered text as a coverage buffer (0.0 = transparent, 1.0 = full ink).
pub struct TextRaster {
    pub width: usize,
    pub height: usize,
    /// Distance from the raster's top edge to the alphabetic baseline.
    pub baseline: f32,
    /// Distance from the raster's top edge to the middle of the em box.
    pub middle: f32,
    pub data: Vec<f32>,
}

/// Advance width of `text` at `pixel_height`, without any max-width squeeze.
pub fn measure_text(font: &FontArc, text: &str, pixel_height: f32) -> f32 {
    let scaled = font.as_scaled(pixel_height);
    text.chars()
        .map(|ch| scaled.h_advance(font.glyph_id(ch)))
        .sum()
}

/// Rasterize a single line of text.
///
/// When the natural width exceeds `max_width`, glyphs are compressed
/// horizontally to fit (the canvas `fillText` maxWidth behavior).
pub fn render_text(
    font: &FontArc,
    text: &str,
    pixel_height: f32,
    max_width: Option<f32>,
) -> TextRaster {
    let natural = measure_text(font, text, pixel_height);
    let squeeze = match max_width {
        Some(limit) if limit > 0.0 && natural > limit => limit / natural,
        _ => 1.0,
    };
    let scale = PxScale {
        x: pixel_height * squeeze,
        y: pixel_height,
    };
    let scaled = font.as_scaled(scale);

    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id);
    }

    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let width = (caret_x.ceil() as usize).max(1);
    let height = ((ascent - descent).ceil() as usize).max(1);

    let mut data = vec![0.0f32; width * height];

    for &(glyph_id, glyph_x) in &glyphs {
        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(glyph_x, ascent));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    let idx = y as usize * width + x as usize;
                    data[idx] = (data[idx] + coverage).min(1.0);
                }
            });
        }
    }

    TextRaster {
        width,
        height,
        baseline: ascent,
        // Halfway between the ascender and descender lines.
        middle: (ascent - descent) / 2.0,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_has_no_faces() {
        let book = FontBook::empty();
        assert!(book.is_empty());
        assert!(book.face(Weight::Regular).is_none());
        assert!(book.face(Weight::Bold).is_none());
    }

    #[test]
    fn test_no_sources_yields_empty_book() {
        let book = FontBook::load(&FontConfig::none());
        assert!(book.is_empty());
    }

    #[test]
    fn test_font_config_defaults_from_json() {
        let config: FontConfig = serde_json::from_str("{}").unwrap();
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
    }

    // The remaining tests need a real face; they skip on hosts without one.
    fn system_book() -> Option<FontBook> {
        let book = FontBook::load(&FontConfig::default());
        (!book.is_empty()).then_some(book)
    }

    #[test]
    fn test_render_has_ink() {
        let Some(book) = system_book() else { return };
        let font = book.face(Weight::Regular).unwrap();
        let raster = render_text(font, "Hello", 24.0, None);
        assert!(raster.width > 0 && raster.height > 0);
        assert_eq!(raster.data.len(), raster.width * raster.height);
        assert!(raster.data.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_max_width_compresses() {
        let Some(book) = system_book() else { return };
        let font = book.face(Weight::Bold).unwrap();
        let text = "Thanks for your purchase, we hope you love it";
        let natural = render_text(font, text, 48.0, None);
        let squeezed = render_text(font, text, 48.0, Some(200.0));
        assert!(natural.width > 200);
        assert!(squeezed.width <= 201);
        assert_eq!(natural.height, squeezed.height);
    }
}
