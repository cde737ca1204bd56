//! # dzi-tiler
//!
//! Converts a single raster image into a Deep Zoom (DZI) tile pyramid that
//! OpenSeadragon and other deep-zoom viewers can load on demand.
//!
//! For `scans/My Photo #1.jpg` a run produces:
//!
//! ```text
//! scans/My_Photo_1_files/<level>/<col>_<row>.jpg
//! scans/My_Photo_1.dzi
//! scans/My_Photo_1.js
//! ```
//!
//! ## Architecture
//!
//! - [`pyramid`] - Level planning, tile grids, naming and output layout
//! - [`codec`] - Raster decode/resize/crop/encode behind [`RasterCodec`]
//! - [`store`] - Directory reset and file writes behind [`TileStore`]
//! - [`generator`] - Tiles for a single level
//! - [`orchestrator`] - The full run, from source image to descriptors
//! - [`descriptor`] - `.dzi` XML and `.js` callback manifests
//! - [`server`] - Preview server with an OpenSeadragon page
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use dzi_tiler::{PyramidConfig, PyramidGenerator};
//!
//! let config = PyramidConfig::new(256, 0).unwrap();
//! let output = PyramidGenerator::new(config).run("scans/My Photo #1.jpg").unwrap();
//!
//! assert_eq!(output.name, "My_Photo_1");
//! ```

pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod pyramid;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use codec::{ImageCodec, RasterCodec, TileFormat};
pub use config::{Cli, Command, GenerateConfig, PlanConfig, ViewConfig};
pub use descriptor::{build_manifest_callback, build_manifest_xml, Descriptor, DEEPZOOM_NAMESPACE};
pub use error::{CodecError, PyramidError, StoreError, TileFailure};
pub use generator::{LevelReport, TileContext};
pub use orchestrator::{DescriptorPaths, PyramidGenerator, PyramidOutput};
pub use pyramid::{
    is_valid_identifier, level_count, plan_levels, sanitize_name, Level, OutputLayout,
    PyramidConfig, TileGrid, TileRect,
};
pub use server::{create_router, ViewerConfig};
pub use store::{FsStore, OutputClaim, TileStore};
