//! # HTTP Server for Code Allocation and Label Sheets
//!
//! Thin boundary over the allocator and renderers. Each core error kind maps
//! to one status:
//!
//! | Kind | Status |
//! |------|--------|
//! | validation | 400 |
//! | exhaustion | 409 |
//! | persistence, render | 500 |
//!
//! ## Usage
//!
//! ```bash
//! labelsheet serve --listen 0.0.0.0:8080 --db data/labels.db
//! ```

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::LabelError;

/// Build the API router around `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Allocation API
        .route("/api/labels/allocate", post(handlers::labels::allocate))
        .route("/api/labels", get(handlers::labels::recent))
        .route("/api/labels/stats", get(handlers::labels::stats))
        // Rendering API
        .route("/api/sheets", post(handlers::sheets::render))
        .route(
            "/api/sheets/calibration",
            get(handlers::sheets::calibration),
        )
        .route("/api/layouts", get(handlers::layouts::list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labelsheet::allocator::AllocatorConfig;
/// use labelsheet::layout::SheetLayout;
/// use labelsheet::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), labelsheet::error::LabelError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ledger_path: "labels.db".into(),
///     allocator: AllocatorConfig::default(),
///     default_layout: SheetLayout::letter_7x9(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let listen_addr = config.listen_addr.clone();
    let app_state = Arc::new(AppState::open(config)?);

    tracing::info!(
        listen = %listen_addr,
        ledger = %app_state.config.ledger_path.display(),
        layout = %app_state.config.default_layout.name,
        code_width = app_state.config.allocator.width.digits(),
        "labelsheet HTTP server starting"
    );

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, router(app_state)).await?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
