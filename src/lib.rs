//! # insertprint - Package Insert Rendering Library
//!
//! insertprint turns a package insert design (logo, headline, subtitle,
//! brand URL, background color and a survey QR code) into two renderings:
//!
//! - **Live preview**: a serializable layout tree in screen pixels, one layout
//!   per paper style, that degrades gracefully while assets load or fail
//! - **Print export**: a flattened, upscaled PNG with the QR code composited
//!   on a white backing, plus the QR code on its own
//!
//! ## Quick Start
//!
//! ```no_run
//! use insertprint::{
//!     design::{PackageInsertDesign, StyleSize, validate},
//!     render::{canvas::export_assets, context::RenderContext},
//! };
//!
//! # async fn example() -> Result<(), insertprint::InsertError> {
//! let design = PackageInsertDesign {
//!     name: "Spring box".into(),
//!     style_size: Some(StyleSize::Standard4x6),
//!     survey_id: "survey-42".into(),
//!     include_logo: false,
//!     ..Default::default()
//! };
//! validate(&design)?;
//!
//! let ctx = RenderContext::offline();
//! let assets = export_assets(&ctx, &design, Some("https://example.com/s/42")).await?;
//! println!("{} bytes of data URI", assets.print_image.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`design`] | Design record, style sizes and validation |
//! | [`dimensions`] | Base pixel sizes per style |
//! | [`render`] | Export pipeline: draw config, logo, QR, paint plan, PNG |
//! | [`preview`] | Live preview layouts and async slot state |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod design;
pub mod dimensions;
pub mod error;
pub mod preview;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use design::{PackageInsertAssets, PackageInsertDesign, StyleSize};
pub use error::InsertError;
