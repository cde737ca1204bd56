//! `image`-crate backed codec.
//!
//! # Design Decisions
//!
//! - **Mirror the source format**: tiles are written in the same format as the
//!   source file. JPEG tiles are encoded at a configurable quality; other
//!   formats use the encoder defaults.
//!
//! - **Lanczos resampling**: every level is resampled straight from the
//!   decoded source with a Lanczos3 filter. The full-resolution level is a
//!   plain copy.
//!
//! - **No decode limits**: the whole source is held in memory for the run, so
//!   the allocation limits of the `image` decoders are lifted.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::CodecError;

use super::{RasterCodec, TileFormat};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Clamp quality to valid range.
///
/// Values below 1 become 1, values above 100 become 100.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

/// Codec built on the `image` crate.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use dzi_tiler::codec::{ImageCodec, RasterCodec, TileFormat};
///
/// let codec = ImageCodec::with_quality(90);
/// let source = codec.decode(Path::new("photo.jpg")).unwrap();
/// let half = codec.resize(&source, 512, 384).unwrap();
/// let tile = codec.crop(&half, 0, 0, 256, 256).unwrap();
/// let bytes = codec.encode(&tile, &TileFormat::from_extension("jpg").unwrap()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ImageCodec {
    quality: u8,
    filter: FilterType,
}

impl ImageCodec {
    /// Create a codec with the default JPEG quality.
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_JPEG_QUALITY)
    }

    /// Create a codec encoding JPEG tiles at `quality` (clamped to 1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: clamp_quality(quality),
            filter: FilterType::Lanczos3,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Read image dimensions from the header without decoding pixels.
    pub fn probe_dimensions(&self, path: &Path) -> Result<(u32, u32), CodecError> {
        image::image_dimensions(path).map_err(decode_error)
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterCodec for ImageCodec {
    type Raster = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        let mut reader = ImageReader::open(path)
            .map_err(decode_error)?
            .with_guessed_format()
            .map_err(decode_error)?;
        reader.no_limits();

        reader.decode().map_err(decode_error)
    }

    fn dimensions(&self, raster: &DynamicImage) -> (u32, u32) {
        raster.dimensions()
    }

    fn resize(
        &self,
        raster: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::Resize {
                message: format!("target size {width}x{height} is empty"),
            });
        }

        if raster.dimensions() == (width, height) {
            return Ok(raster.clone());
        }

        Ok(raster.resize_exact(width, height, self.filter))
    }

    fn crop(
        &self,
        raster: &DynamicImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, CodecError> {
        let (raster_width, raster_height) = raster.dimensions();
        let fits = width > 0
            && height > 0
            && u64::from(x) + u64::from(width) <= u64::from(raster_width)
            && u64::from(y) + u64::from(height) <= u64::from(raster_height);

        if !fits {
            return Err(CodecError::CropOutOfBounds {
                x,
                y,
                width,
                height,
                raster_width,
                raster_height,
            });
        }

        Ok(raster.crop_imm(x, y, width, height))
    }

    fn encode(&self, raster: &DynamicImage, format: &TileFormat) -> Result<Bytes, CodecError> {
        let mut output = Vec::new();

        if format.is_jpeg() {
            // JPEG has no alpha channel
            let rgb = raster.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut output, self.quality);
            encoder.encode_image(&rgb).map_err(encode_error)?;
        } else {
            raster
                .write_to(&mut Cursor::new(&mut output), format.image_format())
                .map_err(encode_error)?;
        }

        Ok(Bytes::from(output))
    }
}

fn decode_error(err: impl std::fmt::Display) -> CodecError {
    CodecError::Decode {
        message: err.to_string(),
    }
}

fn encode_error(err: impl std::fmt::Display) -> CodecError {
    CodecError::Encode {
        message: err.to_string(),
    }
}
