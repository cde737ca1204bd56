use std::path::Path;

use image::ImageFormat;

use crate::error::PyramidError;

/// Output format of the tiles, mirrored from the source file.
///
/// The extension is kept exactly as it appears in the source file name so
/// tile names and the descriptor's `Format` attribute agree with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFormat {
    extension: String,
    format: ImageFormat,
}

impl TileFormat {
    /// Look up the format for a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Result<Self, PyramidError> {
        let format = ImageFormat::from_extension(extension).ok_or_else(|| {
            PyramidError::UnsupportedFormat {
                extension: extension.to_string(),
            }
        })?;

        Ok(Self {
            extension: extension.to_string(),
            format,
        })
    }

    /// Format of the file at `path`, taken from its extension.
    pub fn from_path(path: &Path) -> Result<Self, PyramidError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Extension used for tile files, e.g. `jpg`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn image_format(&self) -> ImageFormat {
        self.format
    }

    /// Whether the encoder needs the alpha channel dropped first.
    pub fn is_jpeg(&self) -> bool {
        self.format == ImageFormat::Jpeg
    }
}
