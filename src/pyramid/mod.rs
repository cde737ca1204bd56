//! Pyramid geometry.
//!
//! Everything in this module is pure computation: no pixels are touched and
//! nothing is written to disk. The tile generator and the orchestrator feed
//! these values to the codec and the store.
//!
//! # Level numbering
//!
//! Deep Zoom numbers levels from the coarsest to the finest:
//!
//! ```text
//! level 0           1x1 (or close to it)
//! level 1           2x2
//! ...
//! level levels-1    full resolution
//! ```
//!
//! Each level doubles the resolution of the previous one, and every level is
//! cut into `tile_size` squares whose offsets advance by `tile_size - overlap`.

mod config;
mod grid;
mod layout;
mod naming;
mod planner;

pub use config::{PyramidConfig, DEFAULT_OVERLAP, DEFAULT_TILE_SIZE};
pub use grid::{TileGrid, TileRect};
pub use layout::{OutputLayout, FILES_SUFFIX};
pub use naming::{is_valid_identifier, sanitize_name, FORBIDDEN_IDENTIFIER_CHARS};
pub use planner::{level_count, level_dimensions, plan_levels, Level};
