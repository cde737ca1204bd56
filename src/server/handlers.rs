//! HTTP handlers for the preview server.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use super::viewer::generate_viewer_html;

/// Shared state of the preview router.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Pyramid name, i.e. the descriptor file stem
    pub name: Arc<str>,
}

impl ViewerState {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /`
pub async fn viewer_handler(State(state): State<ViewerState>) -> Html<String> {
    Html(generate_viewer_html(&state.name))
}
