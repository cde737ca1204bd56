//! Per-level tile generation.
//!
//! For one planned level:
//!
//! 1. resize the decoded source straight to the level dimensions
//! 2. lay out the tile grid
//! 3. crop, encode and write every tile to `<level>/<col>_<row>.<ext>`
//!
//! Tiles within a level share nothing but the read-only resized raster, so
//! with parallelism enabled they are produced on the rayon pool.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::codec::{RasterCodec, TileFormat};
use crate::error::{PyramidError, TileFailure};
use crate::pyramid::{Level, OutputLayout, PyramidConfig, TileGrid, TileRect};
use crate::store::TileStore;

/// Summary of one generated level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    /// Level that was generated
    pub level: Level,

    /// Tile grid used for the level
    pub grid: TileGrid,

    /// Number of tile files written
    pub tiles: u64,
}

/// Shared inputs of a level generation.
pub struct TileContext<'a, C: RasterCodec, S: TileStore> {
    pub codec: &'a C,
    pub store: &'a S,
    pub config: &'a PyramidConfig,
    pub format: &'a TileFormat,
    pub layout: &'a OutputLayout,
}

impl<'a, C: RasterCodec, S: TileStore> TileContext<'a, C, S> {
    /// Generate every tile of `level` from the full-resolution `source`.
    ///
    /// # Errors
    ///
    /// - [`PyramidError::DirectoryResetFailed`] if the level directory cannot be created
    /// - [`PyramidError::ResizeFailed`] if resampling the source fails
    /// - [`PyramidError::TileWriteFailed`] for the first tile that fails
    pub fn generate_level(
        &self,
        source: &C::Raster,
        level: &Level,
    ) -> Result<LevelReport, PyramidError> {
        let level_dir = self.layout.level_dir(level.index);
        self.store
            .create_dir(&level_dir)
            .map_err(|cause| PyramidError::DirectoryResetFailed {
                path: level_dir.clone(),
                cause,
            })?;

        let resized = self
            .codec
            .resize(source, level.width, level.height)
            .map_err(|cause| PyramidError::ResizeFailed {
                level: level.index,
                cause,
            })?;

        let grid = TileGrid::for_level(level, self.config);
        let rects: Vec<TileRect> = grid.rects().collect();

        if self.config.parallel() {
            rects
                .par_iter()
                .try_for_each(|rect| self.write_tile(&resized, level.index, rect))?;
        } else {
            rects
                .iter()
                .try_for_each(|rect| self.write_tile(&resized, level.index, rect))?;
        }

        debug!(
            "Level {}: {}x{} in {}x{} tiles",
            level.index, level.width, level.height, grid.cols, grid.rows
        );

        Ok(LevelReport {
            level: *level,
            grid,
            tiles: grid.tile_count(),
        })
    }

    fn write_tile(
        &self,
        resized: &C::Raster,
        level: u32,
        rect: &TileRect,
    ) -> Result<(), PyramidError> {
        let tile_failed = |cause: TileFailure| PyramidError::TileWriteFailed {
            level,
            col: rect.col,
            row: rect.row,
            cause,
        };

        let tile = self
            .codec
            .crop(resized, rect.x, rect.y, rect.width, rect.height)
            .map_err(|e| tile_failed(e.into()))?;
        let bytes = self
            .codec
            .encode(&tile, self.format)
            .map_err(|e| tile_failed(e.into()))?;

        let path = self.layout.tile_path(level, rect);
        self.store
            .write_file(&path, &bytes)
            .map_err(|e| tile_failed(e.into()))
    }
}
