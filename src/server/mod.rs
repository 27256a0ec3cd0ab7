//! # HTTP Server for Package Insert Design
//!
//! JSON API behind the insert designer: style listing, validation, live
//! previews and print exports.
//!
//! ## Usage
//!
//! ```bash
//! insertprint serve --listen 0.0.0.0:8080
//! ```
//!
//! ## Routes
//!
//! | Method | Path                         | Response                         |
//! |--------|------------------------------|----------------------------------|
//! | GET    | `/api/styles`                | supported styles and sizes       |
//! | POST   | `/api/inserts/validate`      | field errors (422 when invalid)  |
//! | POST   | `/api/inserts/preview`       | preview tree                     |
//! | POST   | `/api/inserts/print.png`     | PNG bytes                        |
//! | POST   | `/api/inserts/export`        | `{ qrCode, printImage }`         |
//! | POST   | `/api/sessions`              | `{ id }`                         |
//! | POST   | `/api/sessions/:id/preview`  | preview tree, slots kept warm    |
//! | POST   | `/api/sessions/:id/export`   | assets, 409 when superseded      |
//! | GET    | `/api/sessions/:id/export`   | last published assets            |

mod handlers;
pub mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;

use crate::error::InsertError;
use crate::render::context::RenderContext;
use state::{AppState, SESSION_EXPIRATION_SECS};

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/styles", get(handlers::inserts::styles))
        .route("/api/inserts/validate", post(handlers::inserts::validate))
        .route("/api/inserts/preview", post(handlers::inserts::preview))
        .route("/api/inserts/print.png", post(handlers::inserts::print_png))
        .route("/api/inserts/export", post(handlers::inserts::export))
        .route("/api/sessions", post(handlers::sessions::create))
        .route(
            "/api/sessions/:id/preview",
            post(handlers::sessions::preview),
        )
        .route(
            "/api/sessions/:id/export",
            post(handlers::sessions::export).get(handlers::sessions::latest),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use insertprint::render::context::RenderConfig;
/// use insertprint::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), insertprint::InsertError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     render: RenderConfig::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), InsertError> {
    let render = RenderContext::from_config(&config.render)?;
    tracing::info!(fonts = ?render.fonts, scale = render.scale, "render context ready");

    let app_state = Arc::new(AppState::new(config.clone(), render));

    // Spawn background session cleanup task
    tokio::spawn(cleanup_sessions(app_state.clone()));

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            InsertError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(addr = %config.listen_addr, "insertprint HTTP server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| InsertError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop idle editing sessions.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(SESSION_EXPIRATION_SECS);

    loop {
        interval.tick().await;
        let removed = state.cleanup_expired(Instant::now(), expiration).await;
        if removed > 0 {
            let remaining = state.sessions.read().await.len();
            tracing::info!(removed, remaining, "cleaned up expired editing sessions");
        }
    }
}
