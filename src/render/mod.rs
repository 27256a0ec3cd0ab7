//! # Rendering Module
//!
//! Turns a [`PackageInsertDesign`](crate::design::PackageInsertDesign) into a
//! print-resolution PNG.
//!
//! ## Modules
//!
//! - [`config`]: draw configuration (scaled size, padding, QR size)
//! - [`image_loader`]: logo loading from data URIs, URLs and files
//! - [`qr`]: QR code generation
//! - [`text`]: font discovery and text rasterization
//! - [`plan`]: the ordered paint plan for a design
//! - [`surface`]: the RGBA surface the plan is painted on
//! - [`canvas`]: the export pipeline tying it all together
//! - [`context`]: shared resources (image source, fonts, QR encoder)
//! - [`session`]: render tickets that discard superseded exports
//!
//! ## Usage Example
//!
//! ```no_run
//! use insertprint::design::PackageInsertDesign;
//! use insertprint::render::{canvas::export_assets, context::RenderContext};
//!
//! # async fn example() -> Result<(), insertprint::InsertError> {
//! let ctx = RenderContext::offline();
//! let design = PackageInsertDesign {
//!     name: "Spring box".into(),
//!     ..Default::default()
//! };
//!
//! let assets = export_assets(&ctx, &design, Some("https://example.com/s/42")).await?;
//! assert!(assets.print_image.starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod config;
pub mod context;
pub mod image_loader;
pub mod plan;
pub mod qr;
pub mod session;
pub mod surface;
pub mod text;
