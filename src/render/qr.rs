//! QR code generation.
//!
//! Encodes a survey URL at high error correction (level H, ~30% recovery)
//! with a one-module quiet margin, pure black on white, sized to roughly
//! [`QR_TARGET_SIZE`] pixels square.

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

use super::image_loader::png_data_uri;
use crate::error::InsertError;

/// Target edge length of the generated bitmap.
pub const QR_TARGET_SIZE: u32 = 1000;

/// Quiet zone around the code, in modules.
pub const QR_MARGIN_MODULES: u32 = 1;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A generated QR code: the bitmap plus its PNG data URI.
#[derive(Debug, Clone)]
pub struct QrBitmap {
    pub image: GrayImage,
    pub data_uri: String,
    /// Modules per side, excluding the quiet margin.
    pub modules: u32,
    /// Pixels per module.
    pub module_size: u32,
}

/// Stateless, deterministic QR encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrGenerator;

impl QrGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Encode `target_url` byte for byte. Blank input is rejected.
    pub fn generate(&self, target_url: &str) -> Result<QrBitmap, InsertError> {
        if target_url.trim().is_empty() {
            return Err(InsertError::QrGeneration(
                "no survey URL to encode".to_string(),
            ));
        }

        let code = QrCode::with_error_correction_level(target_url.as_bytes(), EcLevel::H)
            .map_err(|e| InsertError::QrGeneration(format!("QR encoding failed: {}", e)))?;

        let image = rasterize(&code);
        let modules = code.width() as u32;
        let module_size = image.width() / (modules + QR_MARGIN_MODULES * 2);

        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| InsertError::QrGeneration(format!("PNG encoding failed: {}", e)))?;

        Ok(QrBitmap {
            data_uri: png_data_uri(&buf.into_inner()),
            image,
            modules,
            module_size,
        })
    }

    /// Encode on the blocking pool so a large code never stalls the runtime.
    pub async fn generate_async(&self, target_url: &str) -> Result<QrBitmap, InsertError> {
        let generator = *self;
        let target = target_url.to_string();
        tokio::task::spawn_blocking(move || generator.generate(&target))
            .await
            .map_err(|e| InsertError::QrGeneration(format!("QR task failed: {}", e)))?
    }
}

/// Paint modules onto a white square, integer pixels per module.
fn rasterize(code: &QrCode) -> GrayImage {
    let modules = code.width() as u32;
    let total = modules + QR_MARGIN_MODULES * 2;
    let module_size = (QR_TARGET_SIZE / total).max(1);
    let size = total * module_size;

    let mut img = GrayImage::from_pixel(size, size, LIGHT);
    let colors = code.to_colors();

    for (idx, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = idx as u32 % modules + QR_MARGIN_MODULES;
        let my = idx as u32 / modules + QR_MARGIN_MODULES;
        for dy in 0..module_size {
            for dx in 0..module_size {
                img.put_pixel(mx * module_size + dx, my * module_size + dy, DARK);
            }
        }
    }

    img
}

/// Read the module grid back out of a rendered bitmap by sampling module
/// centers. Returns row-major `true` for dark modules.
pub fn sample_modules(bitmap: &QrBitmap) -> Vec<bool> {
    let mut grid = Vec::with_capacity((bitmap.modules * bitmap.modules) as usize);
    let half = bitmap.module_size / 2;
    for my in 0..bitmap.modules {
        for mx in 0..bitmap.modules {
            let px = (mx + QR_MARGIN_MODULES) * bitmap.module_size + half;
            let py = (my + QR_MARGIN_MODULES) * bitmap.module_size + half;
            grid.push(bitmap.image.get_pixel(px, py)[0] < 128);
        }
    }
    grid
}
