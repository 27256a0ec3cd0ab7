//! Raster surface for the export image.
//!
//! An opaque RGBA buffer with the handful of primitives the paint plan needs:
//! solid fills, rounded rectangles, scaled image blits and text. Coordinates
//! are float export pixels and are rounded to the pixel grid at draw time.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::image_loader::png_data_uri;
use super::plan::{Rect, TextAlign, TextOp};
use super::text::{FontBook, render_text};
use crate::error::InsertError;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse `#RGB` or `#RRGGBB` into an opaque color.
pub fn parse_hex_color(color: &str) -> Option<Rgba<u8>> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                let v = channel(&hex[i..i + 1])?;
                *slot = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => None,
    }
}

/// Snap a float rect to whole pixels, clipped to `(0, 0, w, h)`.
fn pixel_bounds(rect: Rect, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x.round().max(0.0) as u32;
    let y0 = rect.y.round().max(0.0) as u32;
    let x1 = ((rect.x + rect.width).round().max(0.0) as u32).min(w);
    let y1 = ((rect.y + rect.height).round().max(0.0) as u32).min(h);
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

/// Blend `color` over `dst` with the given coverage.
#[inline]
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0) * (color[3] as f32 / 255.0);
    for c in 0..3 {
        let mixed = dst[c] as f32 * (1.0 - a) + color[c] as f32 * a;
        dst[c] = mixed.round() as u8;
    }
    dst[3] = 255;
}

/// The drawing surface.
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// An opaque surface filled with white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Fill the whole surface.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for px in self.image.pixels_mut() {
            *px = color;
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = pixel_bounds(rect, self.width(), self.height()) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                blend(self.image.get_pixel_mut(x, y), color, 1.0);
            }
        }
    }

    /// Fill a rectangle with circular corners of `radius`.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = pixel_bounds(rect, self.width(), self.height()) else {
            return;
        };
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let (left, top) = (rect.x + r, rect.y + r);
        let (right, bottom) = (rect.x + rect.width - r, rect.y + rect.height - r);

        for y in y0..y1 {
            for x in x0..x1 {
                // Distance from the pixel center to the nearest inner corner.
                let cx = x as f32 + 0.5;
                let cy = y as f32 + 0.5;
                let dx = if cx < left { left - cx } else if cx > right { cx - right } else { 0.0 };
                let dy = if cy < top { top - cy } else if cy > bottom { cy - bottom } else { 0.0 };
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend(self.image.get_pixel_mut(x, y), color, coverage);
                }
            }
        }
    }

    /// Draw `source` scaled into `rect`, alpha-composited over the surface.
    pub fn draw_image(&mut self, source: &DynamicImage, rect: Rect) {
        let width = rect.width.round() as u32;
        let height = rect.height.round() as u32;
        if width == 0 || height == 0 {
            return;
        }
        let scaled = source.resize_exact(width, height, FilterType::CatmullRom).to_rgba8();
        imageops::overlay(
            &mut self.image,
            &scaled,
            rect.x.round() as i64,
            rect.y.round() as i64,
        );
    }

    /// Draw one line of text. Returns `false` when no face is available.
    pub fn fill_text(&mut self, fonts: &FontBook, op: &TextOp, color: Rgba<u8>) -> bool {
        let Some(font) = fonts.face(op.weight) else {
            return false;
        };
        if op.content.is_empty() {
            return true;
        }

        let raster = render_text(font, &op.content, op.size, op.max_width);
        let left = match op.align {
            TextAlign::Left => op.x,
            TextAlign::Center => op.x - raster.width as f32 / 2.0,
        };
        let top = op.y - raster.middle;

        let ox = left.round() as i64;
        let oy = top.round() as i64;
        for ry in 0..raster.height {
            for rx in 0..raster.width {
                let coverage = raster.data[ry * raster.width + rx];
                if coverage <= 0.0 {
                    continue;
                }
                let x = ox + rx as i64;
                let y = oy + ry as i64;
                if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
                    continue;
                }
                blend(self.image.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        }
        true
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, InsertError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| InsertError::Image(format!("Failed to encode PNG: {}", e)))?;
        Ok(buf.into_inner())
    }

    /// Encode as a PNG data URI.
    pub fn to_data_uri(&self) -> Result<String, InsertError> {
        Ok(png_data_uri(&self.to_png()?))
    }
}
