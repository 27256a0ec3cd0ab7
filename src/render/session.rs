//! Render sessions: discard exports that were overtaken by a newer one.
//!
//! Every export request takes a [`RenderTicket`] before it starts. When the
//! render finishes, its result is published only if no later ticket has been
//! issued in the meantime; otherwise it is reported as superseded and
//! dropped, so a slow early render can never overwrite the assets of a later
//! edit.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use super::canvas::export_assets;
use super::context::RenderContext;
use crate::design::{PackageInsertAssets, PackageInsertDesign};
use crate::error::InsertError;

/// Monotonic render token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues render tickets and tells whether one is still the latest.
#[derive(Debug, Default)]
pub struct RenderTokens {
    latest: AtomicU64,
}

impl RenderTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a new ticket. It becomes the latest one.
    pub fn issue(&self) -> RenderTicket {
        RenderTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> RenderTicket {
        RenderTicket(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.latest() == ticket
    }
}

/// Result of a ticketed render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome<T> {
    /// The render was the latest request; its result has been published.
    Current(T),
    /// A newer request was issued while this one ran; the result was dropped.
    Superseded {
        ticket: RenderTicket,
        latest: RenderTicket,
    },
}

impl<T> RenderOutcome<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            RenderOutcome::Current(value) => Some(value),
            RenderOutcome::Superseded { .. } => None,
        }
    }
}

/// Latest-wins export slot for one editing session.
#[derive(Debug, Default)]
pub struct RenderSession {
    tokens: RenderTokens,
    latest: RwLock<Option<(RenderTicket, PackageInsertAssets)>>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &RenderTokens {
        &self.tokens
    }

    /// Export `design`, publishing the assets only if no newer export was
    /// requested meanwhile. A stale render reports `Superseded` even if it
    /// failed.
    pub async fn export(
        &self,
        ctx: &RenderContext,
        design: &PackageInsertDesign,
        survey_url: Option<&str>,
    ) -> Result<RenderOutcome<PackageInsertAssets>, InsertError> {
        let ticket = self.tokens.issue();
        let result = export_assets(ctx, design, survey_url).await;
        self.publish(ticket, result).await
    }

    /// Publish the result of the render that held `ticket`.
    pub async fn publish(
        &self,
        ticket: RenderTicket,
        result: Result<PackageInsertAssets, InsertError>,
    ) -> Result<RenderOutcome<PackageInsertAssets>, InsertError> {
        // Hold the slot while checking so a newer publish cannot interleave.
        let mut slot = self.latest.write().await;
        let latest = self.tokens.latest();
        if ticket != latest {
            tracing::debug!(ticket = ticket.value(), latest = latest.value(), "discarding stale render");
            return Ok(RenderOutcome::Superseded { ticket, latest });
        }

        let assets = result?;
        *slot = Some((ticket, assets.clone()));
        Ok(RenderOutcome::Current(assets))
    }

    /// The most recently published assets.
    pub async fn latest(&self) -> Option<PackageInsertAssets> {
        self.latest
            .read()
            .await
            .as_ref()
            .map(|(_, assets)| assets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(tag: &str) -> PackageInsertAssets {
        PackageInsertAssets {
            qr_code: format!("qr-{tag}"),
            print_image: format!("print-{tag}"),
        }
    }

    #[test]
    fn test_tokens_are_monotonic() {
        let tokens = RenderTokens::new();
        let a = tokens.issue();
        let b = tokens.issue();
        assert!(b > a);
        assert!(!tokens.is_current(a));
        assert!(tokens.is_current(b));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let session = RenderSession::new();
        let first = session.tokens().issue();
        let second = session.tokens().issue();

        // The later render finishes first
        let outcome = session.publish(second, Ok(assets("b"))).await.unwrap();
        assert_eq!(outcome, RenderOutcome::Current(assets("b")));

        let outcome = session.publish(first, Ok(assets("a"))).await.unwrap();
        assert_eq!(
            outcome,
            RenderOutcome::Superseded {
                ticket: first,
                latest: second
            }
        );
        assert_eq!(session.latest().await, Some(assets("b")));
    }

    #[tokio::test]
    async fn test_stale_error_is_discarded() {
        let session = RenderSession::new();
        let first = session.tokens().issue();
        let _second = session.tokens().issue();
        let outcome = session
            .publish(first, Err(InsertError::QrGeneration("boom".into())))
            .await
            .unwrap();
        assert!(outcome.into_current().is_none());
    }

    #[tokio::test]
    async fn test_current_error_propagates() {
        let session = RenderSession::new();
        let ticket = session.tokens().issue();
        let result = session
            .publish(ticket, Err(InsertError::QrGeneration("boom".into())))
            .await;
        assert!(matches!(result, Err(InsertError::QrGeneration(_))));
        assert_eq!(session.latest().await, None);
    }

    #[tokio::test]
    async fn test_export_publishes() {
        let ctx = RenderContext::offline();
        let design = PackageInsertDesign {
            name: "Box".into(),
            include_logo: false,
            ..Default::default()
        };
        let outcome = session_export(&ctx, &design).await;
        assert!(outcome.print_image.starts_with("data:image/png;base64,"));
    }

    async fn session_export(ctx: &RenderContext, design: &PackageInsertDesign) -> PackageInsertAssets {
        let session = RenderSession::new();
        session
            .export(ctx, design, Some("https://example.com/s/1"))
            .await
            .unwrap()
            .into_current()
            .unwrap()
    }
}
