//! Immutable tiling configuration shared by every stage of a run.

use std::path::{Path, PathBuf};

use crate::codec::{DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY};
use crate::error::PyramidError;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default overlap between adjacent tiles in pixels.
pub const DEFAULT_OVERLAP: u32 = 0;

/// Tiling parameters for one pyramid run.
///
/// Values are validated on construction and cannot be changed afterwards, so
/// every level and tile sees the same settings.
///
/// # Example
///
/// ```
/// use dzi_tiler::pyramid::PyramidConfig;
///
/// let config = PyramidConfig::new(256, 1).unwrap().with_parallel(false);
/// assert_eq!(config.step(), 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidConfig {
    tile_size: u32,
    overlap: u32,
    jpeg_quality: u8,
    parallel: bool,
    output_dir: Option<PathBuf>,
}

impl PyramidConfig {
    /// Create a configuration with the given tile size and overlap.
    ///
    /// # Errors
    ///
    /// Returns [`PyramidError::InvalidConfig`] if `tile_size` is zero or
    /// `overlap >= tile_size`.
    pub fn new(tile_size: u32, overlap: u32) -> Result<Self, PyramidError> {
        if tile_size == 0 {
            return Err(PyramidError::InvalidConfig(
                "tile_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= tile_size {
            return Err(PyramidError::InvalidConfig(format!(
                "overlap ({overlap}) must be smaller than tile_size ({tile_size})"
            )));
        }

        Ok(Self {
            tile_size,
            overlap,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            parallel: true,
            output_dir: None,
        })
    }

    /// Set the JPEG quality used when the source format is JPEG.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Result<Self, PyramidError> {
        if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality) {
            return Err(PyramidError::InvalidConfig(format!(
                "jpeg_quality must be between {MIN_JPEG_QUALITY} and {MAX_JPEG_QUALITY}, got {quality}"
            )));
        }
        self.jpeg_quality = quality;
        Ok(self)
    }

    /// Enable or disable concurrent tile writes within a level.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Write the pyramid into `dir` instead of next to the source image.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Distance between the top-left corners of adjacent tiles.
    pub fn step(&self) -> u32 {
        self.tile_size - self.overlap
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            overlap: DEFAULT_OVERLAP,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            parallel: true,
            output_dir: None,
        }
    }
}
