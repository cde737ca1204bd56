//! Router configuration for the preview server.
//!
//! # Example
//!
//! ```ignore
//! use dzi_tiler::server::{create_router, ViewerConfig};
//!
//! let config = ViewerConfig::from_descriptor("scans/My_Photo_1.dzi".as_ref())?;
//! let router = create_router(config);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, viewer_handler, ViewerState};

// =============================================================================
// Viewer Configuration
// =============================================================================

/// Configuration for the preview router.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Directory holding the descriptor and the `<name>_files` tile root
    pub root: PathBuf,

    /// Pyramid name (descriptor file stem)
    pub name: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl ViewerConfig {
    /// Create a configuration serving `root` for the pyramid `name`.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Derive root and name from the path of a `.dzi` file.
    pub fn from_descriptor(path: &Path) -> Result<Self, String> {
        let is_dzi = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("dzi"));
        if !is_dzi {
            return Err(format!("{} is not a .dzi descriptor", path.display()));
        }
        if !path.is_file() {
            return Err(format!("Descriptor {} does not exist", path.display()));
        }

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("Descriptor {} has no usable name", path.display()))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self::new(root, name))
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the preview router.
///
/// Everything that is not `/` or `/health` is served from `config.root`.
pub fn create_router(config: ViewerConfig) -> Router {
    let state = ViewerState::new(&config.name);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(viewer_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .fallback_service(ServeDir::new(&config.root))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &ViewerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}
