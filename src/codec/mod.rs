//! Raster codec layer.
//!
//! The pyramid code never touches pixels directly. It goes through the
//! [`RasterCodec`] trait, which covers the four image operations a run needs:
//!
//! ```text
//! decode(path) ──► Raster ──► resize(w, h) ──► crop(x, y, w, h) ──► encode(format)
//!                    │                                                   │
//!                    └── decoded once per run          one per tile ─────┘
//! ```
//!
//! [`ImageCodec`] implements the trait on top of the `image` crate. Tests
//! substitute lightweight codecs to inject failures or observe call order.

mod format;
mod image_codec;

use std::path::Path;

use bytes::Bytes;

use crate::error::CodecError;

pub use format::TileFormat;
pub use image_codec::{
    clamp_quality, ImageCodec, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};

/// Image operations used to build a pyramid.
///
/// Rasters are shared read-only across worker threads while a level is being
/// tiled, hence the `Send + Sync` bounds.
pub trait RasterCodec: Send + Sync {
    /// Decoded in-memory image.
    type Raster: Send + Sync;

    /// Read and decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<Self::Raster, CodecError>;

    /// `(width, height)` of a raster in pixels.
    fn dimensions(&self, raster: &Self::Raster) -> (u32, u32);

    /// Resample `raster` to exactly `width x height`.
    fn resize(
        &self,
        raster: &Self::Raster,
        width: u32,
        height: u32,
    ) -> Result<Self::Raster, CodecError>;

    /// Copy out the `width x height` region at `(x, y)`.
    fn crop(
        &self,
        raster: &Self::Raster,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self::Raster, CodecError>;

    /// Encode a raster into the bytes of a tile file.
    fn encode(&self, raster: &Self::Raster, format: &TileFormat) -> Result<Bytes, CodecError>;
}
