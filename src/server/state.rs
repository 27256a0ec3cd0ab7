//! Server state and configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::preview::PreviewSession;
use crate::render::context::{RenderConfig, RenderContext};
use crate::render::session::RenderSession;

/// Sessions not touched for this long are dropped by the cleanup task.
pub const SESSION_EXPIRATION_SECS: u64 = 30 * 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    pub render: RenderConfig,
}

/// Per-editor state: the live preview slots and the latest-wins export slot.
#[derive(Debug, Default)]
pub struct EditSession {
    pub preview: PreviewSession,
    pub render: RenderSession,
}

pub struct SessionEntry {
    pub session: Arc<EditSession>,
    pub last_accessed: Instant,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub render: RenderContext,
    pub sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl AppState {
    pub fn new(config: ServerConfig, render: RenderContext) -> Self {
        Self {
            config,
            render,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new, empty session.
    pub async fn create_session(&self, id: String) -> Arc<EditSession> {
        let session = Arc::new(EditSession::default());
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_accessed: Instant::now(),
            },
        );
        session
    }

    /// Look up a session and mark it as used.
    pub async fn session(&self, id: &str) -> Option<Arc<EditSession>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_accessed = Instant::now();
        Some(entry.session.clone())
    }

    /// Drop sessions idle for longer than `expiration`. Returns how many were
    /// removed.
    pub async fn cleanup_expired(&self, now: Instant, expiration: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_accessed) < expiration);
        before - sessions.len()
    }
}
