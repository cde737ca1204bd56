//! Pyramid generation entry point.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        PyramidGenerator::run                     │
//! │  1. Resolve format      4. Claim + reset <name>_files            │
//! │  2. Decode source       5. Levels, finest to coarsest            │
//! │  3. Plan levels         6. Descriptors (valid names only)        │
//! └──────────────────────────────────────────────────────────────────┘
//!            │                      │                      │
//!            ▼                      ▼                      ▼
//!     ┌─────────────┐       ┌──────────────┐       ┌──────────────┐
//!     │ RasterCodec │       │  TileStore   │       │  descriptor  │
//!     └─────────────┘       └──────────────┘       └──────────────┘
//! ```
//!
//! A failure at any step aborts the run and is returned as a single
//! [`PyramidError`]. Tiles already written by an aborted run stay on disk;
//! the next run on the same source clears them before writing.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::{ImageCodec, RasterCodec, TileFormat};
use crate::descriptor::{build_manifest_callback, build_manifest_xml, Descriptor};
use crate::error::PyramidError;
use crate::generator::{LevelReport, TileContext};
use crate::pyramid::{is_valid_identifier, plan_levels, OutputLayout, PyramidConfig};
use crate::store::{FsStore, OutputClaim, TileStore};

// =============================================================================
// Pyramid Output
// =============================================================================

/// Paths of the two descriptor files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorPaths {
    /// `<name>.dzi`
    pub dzi: PathBuf,

    /// `<name>.js`
    pub js: PathBuf,
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidOutput {
    /// Sanitized name used for every output path
    pub name: String,

    /// The `<name>_files` directory holding all levels
    pub tiles_dir: PathBuf,

    /// Descriptor files, `None` when the name is not a valid callback name
    pub descriptors: Option<DescriptorPaths>,

    /// Metadata written (or that would have been written) to the descriptors
    pub descriptor: Descriptor,

    /// Per-level summaries, coarsest first
    pub levels: Vec<LevelReport>,

    /// Total number of tiles written
    pub tile_count: u64,
}

// =============================================================================
// Pyramid Generator
// =============================================================================

/// Builds a Deep Zoom pyramid for a source image.
///
/// # Type Parameters
///
/// * `C` - Raster codec, [`ImageCodec`] by default
/// * `S` - Tile store, [`FsStore`] by default
///
/// # Example
///
/// ```no_run
/// use dzi_tiler::{PyramidConfig, PyramidGenerator};
///
/// let config = PyramidConfig::new(256, 1).unwrap();
/// let generator = PyramidGenerator::new(config);
///
/// match generator.run("scans/My Photo #1.jpg") {
///     Ok(output) => println!("{} tiles in {}", output.tile_count, output.tiles_dir.display()),
///     Err(e) => eprintln!("tiling failed: {e}"),
/// }
/// ```
pub struct PyramidGenerator<C = ImageCodec, S = FsStore> {
    codec: C,
    store: S,
    config: PyramidConfig,
}

impl PyramidGenerator {
    /// Create a generator using the `image` codec and the local filesystem.
    pub fn new(config: PyramidConfig) -> Self {
        Self {
            codec: ImageCodec::with_quality(config.jpeg_quality()),
            store: FsStore::new(),
            config,
        }
    }
}

impl<C: RasterCodec, S: TileStore> PyramidGenerator<C, S> {
    /// Create a generator with custom collaborators.
    pub fn with_collaborators(codec: C, store: S, config: PyramidConfig) -> Self {
        Self {
            codec,
            store,
            config,
        }
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate the full pyramid and its descriptors for `source`.
    pub fn run(&self, source: impl AsRef<Path>) -> Result<PyramidOutput, PyramidError> {
        let source = source.as_ref();
        let started = Instant::now();

        let format = TileFormat::from_path(source)?;

        let raster = self
            .codec
            .decode(source)
            .map_err(|cause| PyramidError::SourceDecodeFailed {
                path: source.to_path_buf(),
                cause,
            })?;
        let (width, height) = self.codec.dimensions(&raster);

        let layout = OutputLayout::for_source(source, format.extension(), self.config.output_dir())?;
        let levels = plan_levels(width, height)?;

        info!(
            "Tiling {} ({}x{}) into {} levels of {}px tiles, overlap {}",
            source.display(),
            width,
            height,
            levels.len(),
            self.config.tile_size(),
            self.config.overlap()
        );

        let tiles_dir = layout.tiles_dir();
        let _claim = OutputClaim::acquire(&tiles_dir)?;

        self.store
            .reset_dir(&tiles_dir)
            .map_err(|cause| PyramidError::DirectoryResetFailed {
                path: tiles_dir.clone(),
                cause,
            })?;

        let context = TileContext {
            codec: &self.codec,
            store: &self.store,
            config: &self.config,
            format: &format,
            layout: &layout,
        };

        let mut reports = Vec::with_capacity(levels.len());
        for level in levels.iter().rev() {
            reports.push(context.generate_level(&raster, level)?);
        }
        reports.reverse();

        let tile_count: u64 = reports.iter().map(|r| r.tiles).sum();
        let descriptor = Descriptor::new(format.extension(), &self.config, width, height);

        let descriptors = if is_valid_identifier(layout.clean_name()) {
            Some(self.write_descriptors(&layout, &descriptor)?)
        } else {
            warn!(
                "Name {:?} is not a valid callback name, skipping descriptors",
                layout.clean_name()
            );
            None
        };

        info!(
            "Wrote {} tiles to {} in {:.2?}",
            tile_count,
            tiles_dir.display(),
            started.elapsed()
        );

        Ok(PyramidOutput {
            name: layout.clean_name().to_string(),
            tiles_dir,
            descriptors,
            descriptor,
            levels: reports,
            tile_count,
        })
    }

    fn write_descriptors(
        &self,
        layout: &OutputLayout,
        descriptor: &Descriptor,
    ) -> Result<DescriptorPaths, PyramidError> {
        let paths = DescriptorPaths {
            dzi: layout.dzi_path(),
            js: layout.js_path(),
        };

        let files = [
            (&paths.js, build_manifest_callback(layout.clean_name(), descriptor)),
            (&paths.dzi, build_manifest_xml(descriptor)),
        ];

        for (path, contents) in files {
            self.store
                .write_file(path, contents.as_bytes())
                .map_err(|cause| PyramidError::DescriptorWriteFailed {
                    path: path.clone(),
                    cause,
                })?;
            debug!("Wrote descriptor {}", path.display());
        }

        Ok(paths)
    }
}
