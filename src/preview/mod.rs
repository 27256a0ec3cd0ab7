//! # Live Preview
//!
//! The on-screen preview of a package insert, re-rendered on every edit.
//!
//! ## Architecture
//!
//! ```text
//! design + survey URL
//!        │
//!        ▼
//! PreviewSession ── sync ──► PreviewState { LogoState, QrPanel, content_key }
//!        │                          │
//!        │    loads / QR encode ────┘ (results for stale inputs dropped)
//!        ▼
//! LayoutVariant::render ──► Node tree ──► PreviewContainer (unscaled, dimmed
//!                                                           when no style)
//! ```
//!
//! Unlike the export path, the preview never fails: a broken logo becomes a
//! placeholder and a failed QR becomes an "Error" label inside its panel.
//!
//! ## Example
//!
//! ```
//! use insertprint::design::PackageInsertDesign;
//! use insertprint::preview::{render_content, state::PreviewState, tree::TextRole};
//!
//! let design = PackageInsertDesign::default();
//! let tree = render_content(&design, &PreviewState::default()).unwrap();
//! assert_eq!(
//!     tree.find_text(TextRole::Headline).unwrap().content,
//!     design.headline
//! );
//! ```

pub mod container;
pub mod layouts;
pub mod session;
pub mod state;
pub mod tree;

pub use container::PreviewContainer;
pub use layouts::{LayoutVariant, VariantSpec, render_content};
pub use session::PreviewSession;
pub use state::{LogoState, PreviewState, QrPanel, QrStatus};
pub use tree::Node;

use serde::Serialize;

use crate::render::plan::{self, PaintOp};

/// The content a rendering shows, independent of geometry.
///
/// Extracted from both a preview tree and an export paint plan so the two
/// paths can be compared. A logo or QR counts only when an actual bitmap is
/// shown, not a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SemanticFields {
    pub logo: bool,
    pub headline: Option<String>,
    pub subtitle: Option<String>,
    pub brand_url: Option<String>,
    pub qr: bool,
}

/// Semantic content of a preview tree.
pub fn tree_fields(node: &Node) -> SemanticFields {
    let text = |role| node.find_text(role).map(|t| t.content.clone());
    SemanticFields {
        logo: node.find_image(layouts::LOGO_LABEL).is_some(),
        headline: text(tree::TextRole::Headline),
        subtitle: text(tree::TextRole::Subtitle),
        brand_url: text(tree::TextRole::BrandUrl),
        qr: node.find_image(layouts::QR_LABEL).is_some(),
    }
}

/// Semantic content of an export paint plan.
pub fn plan_fields(ops: &[PaintOp]) -> SemanticFields {
    let text = |role| plan::text_op(ops, role).map(|t| t.content.clone());
    SemanticFields {
        logo: ops.iter().any(|op| matches!(op, PaintOp::Logo { .. })),
        headline: text(plan::TextRole::Headline),
        subtitle: text(plan::TextRole::Subtitle),
        brand_url: text(plan::TextRole::BrandUrl),
        qr: ops.iter().any(|op| matches!(op, PaintOp::QrCode { .. })),
    }
}
