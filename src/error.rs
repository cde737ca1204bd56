use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the raster codec (decode, resize, crop, encode).
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// The source could not be opened or decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Resampling to the requested size failed
    #[error("Resize error: {message}")]
    Resize { message: String },

    /// Requested crop rectangle is empty or leaves the raster bounds
    #[error(
        "Crop out of bounds: {width}x{height} at ({x}, {y}) in a {raster_width}x{raster_height} raster"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        raster_width: u32,
        raster_height: u32,
    },

    /// Encoding a tile to the output format failed
    #[error("Encode error: {message}")]
    Encode { message: String },
}

/// Errors raised by the tile store (directory and file operations).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying filesystem error
    #[error("I/O error at {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// The reset target is not a tile root this store is allowed to clear
    #[error("Refusing to reset {}: {reason}", .path.display())]
    UnsafeResetTarget { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Cause of a single tile failure.
#[derive(Debug, Clone, Error)]
pub enum TileFailure {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that abort a pyramid run.
#[derive(Debug, Clone, Error)]
pub enum PyramidError {
    /// Width or height is zero
    #[error("Invalid image dimensions: {width}x{height} (both must be positive)")]
    InvalidImageDimensions { width: u32, height: u32 },

    /// Tile size, overlap or quality out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source file name sanitizes to nothing usable
    #[error("Source file name {} yields an empty output name", .path.display())]
    InvalidSourceName { path: PathBuf },

    /// The source extension does not map to a known raster format
    #[error("Unsupported tile format: {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to decode source {}: {cause}", .path.display())]
    SourceDecodeFailed {
        path: PathBuf,
        #[source]
        cause: CodecError,
    },

    /// Clearing or creating an output directory failed
    #[error("Failed to prepare output directory {}: {cause}", .path.display())]
    DirectoryResetFailed {
        path: PathBuf,
        #[source]
        cause: StoreError,
    },

    /// Another run in this process is writing the same tile root
    #[error("Output directory {} is already being written by another run", .path.display())]
    OutputDirectoryBusy { path: PathBuf },

    #[error("Failed to resize source for level {level}: {cause}")]
    ResizeFailed {
        level: u32,
        #[source]
        cause: CodecError,
    },

    #[error("Failed to write tile {col}_{row} at level {level}: {cause}")]
    TileWriteFailed {
        level: u32,
        col: u32,
        row: u32,
        #[source]
        cause: TileFailure,
    },

    #[error("Failed to write descriptor {}: {cause}", .path.display())]
    DescriptorWriteFailed {
        path: PathBuf,
        #[source]
        cause: StoreError,
    },
}
