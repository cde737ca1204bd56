//! Tile grid for a single level.

use serde::Serialize;

use super::config::PyramidConfig;
use super::planner::Level;

/// Pixel rectangle of one tile within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileRect {
    /// Column index (0-indexed from left)
    pub col: u32,

    /// Row index (0-indexed from top)
    pub row: u32,

    /// Left edge in level pixels
    pub x: u32,

    /// Top edge in level pixels
    pub y: u32,

    /// Width in pixels, at most the tile size
    pub width: u32,

    /// Height in pixels, at most the tile size
    pub height: u32,
}

impl TileRect {
    /// File name of this tile for the given extension, e.g. `3_5.jpg`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.col, self.row, extension)
    }
}

/// Row/column layout of the tiles covering one level.
///
/// Tile `(col, row)` starts at `(col * step, row * step)` where
/// `step = tile_size - overlap`, and is clipped at the right and bottom edges
/// of the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    /// Number of tile columns
    pub cols: u32,

    /// Number of tile rows
    pub rows: u32,

    /// Offset between adjacent tiles
    pub step: u32,

    /// Nominal tile edge length
    pub tile_size: u32,

    /// Level width in pixels
    pub width: u32,

    /// Level height in pixels
    pub height: u32,
}

impl TileGrid {
    /// Lay out tiles over a `width x height` level.
    pub fn new(width: u32, height: u32, config: &PyramidConfig) -> Self {
        let step = config.step();
        Self {
            cols: width.div_ceil(step),
            rows: height.div_ceil(step),
            step,
            tile_size: config.tile_size(),
            width,
            height,
        }
    }

    /// Lay out tiles over a planned level.
    pub fn for_level(level: &Level, config: &PyramidConfig) -> Self {
        Self::new(level.width, level.height, config)
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Rectangle of tile `(col, row)`, or `None` if outside the grid.
    pub fn rect(&self, col: u32, row: u32) -> Option<TileRect> {
        if col >= self.cols || row >= self.rows {
            return None;
        }

        let x = col * self.step;
        let y = row * self.step;

        Some(TileRect {
            col,
            row,
            x,
            y,
            width: self.tile_size.min(self.width - x),
            height: self.tile_size.min(self.height - y),
        })
    }

    /// All tile rectangles in row-major order.
    pub fn rects(&self) -> impl Iterator<Item = TileRect> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).filter_map(move |col| self.rect(col, row)))
    }
}
