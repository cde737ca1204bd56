//! Preview server for generated pyramids.
//!
//! Serves the directory holding a `.dzi` descriptor over HTTP so the pyramid
//! can be checked in a browser:
//!
//! ```text
//! /                               - OpenSeadragon viewer page
//! /health                         - Health check
//! /<name>.dzi                     - Descriptor (static)
//! /<name>_files/<level>/<c>_<r>.* - Tiles (static)
//! ```

pub mod handlers;
pub mod routes;
pub mod viewer;

pub use handlers::{health_handler, viewer_handler, HealthResponse, ViewerState};
pub use routes::{create_router, ViewerConfig};
pub use viewer::generate_viewer_html;
