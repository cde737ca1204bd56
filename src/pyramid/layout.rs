//! On-disk layout of a generated pyramid.
//!
//! ```text
//! <base>/<name>.dzi
//! <base>/<name>.js
//! <base>/<name>_files/<level>/<col>_<row>.<ext>
//! ```

use std::path::{Path, PathBuf};

use crate::error::PyramidError;

use super::grid::TileRect;
use super::naming::sanitize_name;

/// Suffix appended to the clean name to form the tile root directory.
pub const FILES_SUFFIX: &str = "_files";

/// Paths produced by one pyramid run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base_dir: PathBuf,
    clean_name: String,
    extension: String,
}

impl OutputLayout {
    /// Build a layout rooted at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PyramidError::InvalidSourceName`] if `clean_name` is empty,
    /// since the tile root would otherwise be the bare `_files` directory.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        clean_name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self, PyramidError> {
        let base_dir = base_dir.into();
        let clean_name = clean_name.into();
        if clean_name.is_empty() {
            return Err(PyramidError::InvalidSourceName { path: base_dir });
        }

        Ok(Self {
            base_dir,
            clean_name,
            extension: extension.into(),
        })
    }

    /// Derive the layout for a source image.
    ///
    /// The name is the sanitized file stem; the base directory is
    /// `output_dir` when given, otherwise the directory holding the source.
    pub fn for_source(
        source: &Path,
        extension: &str,
        output_dir: Option<&Path>,
    ) -> Result<Self, PyramidError> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let clean_name = sanitize_name(&stem);
        if clean_name.is_empty() {
            return Err(PyramidError::InvalidSourceName {
                path: source.to_path_buf(),
            });
        }

        let base_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => match source.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };

        Self::new(base_dir, clean_name, extension)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn clean_name(&self) -> &str {
        &self.clean_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `<base>/<name>_files`
    pub fn tiles_dir(&self) -> PathBuf {
        self.base_dir
            .join(format!("{}{}", self.clean_name, FILES_SUFFIX))
    }

    /// `<base>/<name>_files/<level>`
    pub fn level_dir(&self, level: u32) -> PathBuf {
        self.tiles_dir().join(level.to_string())
    }

    /// `<base>/<name>_files/<level>/<col>_<row>.<ext>`
    pub fn tile_path(&self, level: u32, rect: &TileRect) -> PathBuf {
        self.level_dir(level).join(rect.file_name(&self.extension))
    }

    /// `<base>/<name>.dzi`
    pub fn dzi_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.dzi", self.clean_name))
    }

    /// `<base>/<name>.js`
    pub fn js_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.js", self.clean_name))
    }
}
