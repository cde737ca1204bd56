//! Command-line configuration for dzi-tiler.
//!
//! This module provides the CLI surface:
//! - `generate` - build a pyramid and its descriptors from a source image
//! - `plan` - print the level and tile layout without writing anything
//! - `view` - serve a generated pyramid with an OpenSeadragon page
//!
//! # Environment Variables
//!
//! Tiling options can also be set via environment variables with the `DZI_` prefix:
//!
//! - `DZI_TILE_SIZE` - Tile edge length in pixels (default: 256)
//! - `DZI_OVERLAP` - Overlap between adjacent tiles (default: 0)
//! - `DZI_JPEG_QUALITY` - JPEG quality for JPEG sources (default: 80)
//! - `DZI_OUTPUT_DIR` - Directory for the pyramid (default: next to the source)
//! - `DZI_HOST` / `DZI_PORT` - Preview server address (default: 127.0.0.1:8080)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::codec::{DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY};
use crate::error::PyramidError;
use crate::pyramid::{PyramidConfig, DEFAULT_OVERLAP, DEFAULT_TILE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default preview server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default preview server port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CLI Arguments
// =============================================================================

/// dzi-tiler - Deep Zoom tile pyramids from a single image.
#[derive(Parser, Debug, Clone)]
#[command(name = "dzi-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate tiles and descriptors for a source image.
    Generate(GenerateConfig),

    /// Print the pyramid layout for an image or a size.
    Plan(PlanConfig),

    /// Serve a generated pyramid with an OpenSeadragon viewer.
    View(ViewConfig),
}

// =============================================================================
// Generate Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct GenerateConfig {
    /// Source raster image. Tiles use the same format as this file.
    pub source: PathBuf,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "DZI_TILE_SIZE")]
    pub tile_size: u32,

    /// Overlap between adjacent tiles in pixels.
    #[arg(long, default_value_t = DEFAULT_OVERLAP, env = "DZI_OVERLAP")]
    pub overlap: u32,

    /// JPEG quality (1-100), used when the source is a JPEG.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "DZI_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Write the pyramid here instead of next to the source.
    #[arg(short, long, env = "DZI_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write tiles one at a time instead of in parallel.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Print the run summary as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl GenerateConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_tiling(self.tile_size, self.overlap)?;

        if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if !self.source.is_file() {
            return Err(format!(
                "Source image {} does not exist",
                self.source.display()
            ));
        }

        Ok(())
    }

    /// Build the tiling configuration for this command.
    pub fn pyramid_config(&self) -> Result<PyramidConfig, PyramidError> {
        let config = PyramidConfig::new(self.tile_size, self.overlap)?
            .with_jpeg_quality(self.jpeg_quality)?
            .with_parallel(!self.sequential);

        Ok(match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        })
    }
}

// =============================================================================
// Plan Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct PlanConfig {
    /// Image to read dimensions from.
    #[arg(conflicts_with_all = ["width", "height"])]
    pub source: Option<PathBuf>,

    /// Image width in pixels (instead of a source image).
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Image height in pixels (instead of a source image).
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "DZI_TILE_SIZE")]
    pub tile_size: u32,

    /// Overlap between adjacent tiles in pixels.
    #[arg(long, default_value_t = DEFAULT_OVERLAP, env = "DZI_OVERLAP")]
    pub overlap: u32,

    /// Print the plan as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl PlanConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_tiling(self.tile_size, self.overlap)?;

        match (&self.source, self.width, self.height) {
            (Some(_), None, None) => Ok(()),
            (None, Some(w), Some(h)) if w > 0 && h > 0 => Ok(()),
            (None, Some(_), Some(_)) => Err("width and height must be positive".to_string()),
            _ => Err("Provide a source image or both --width and --height".to_string()),
        }
    }

    pub fn pyramid_config(&self) -> Result<PyramidConfig, PyramidError> {
        PyramidConfig::new(self.tile_size, self.overlap)
    }
}

// =============================================================================
// View Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ViewConfig {
    /// The `.dzi` descriptor of a generated pyramid.
    pub descriptor: PathBuf,

    /// Host address to bind the preview server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "DZI_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "DZI_PORT")]
    pub port: u16,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "DZI_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ViewConfig {
    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_tiling(tile_size: u32, overlap: u32) -> Result<(), String> {
    if tile_size == 0 {
        return Err("tile_size must be greater than 0".to_string());
    }
    if overlap >= tile_size {
        return Err(format!(
            "overlap ({overlap}) must be smaller than tile_size ({tile_size})"
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
