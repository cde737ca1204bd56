//! Tile store: directory lifecycle and file writes.
//!
//! The store is the only component that modifies the filesystem. Its reset
//! operation is destructive, so it only accepts tile roots, i.e. directories
//! named `<name>_files` with a non-empty `<name>`. Anything else is refused.
//!
//! [`OutputClaim`] keeps two runs in the same process from writing the same
//! tile root at once.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::debug;

use crate::error::{PyramidError, StoreError};
use crate::pyramid::FILES_SUFFIX;

/// Filesystem operations used by a pyramid run.
pub trait TileStore: Send + Sync {
    /// Make `path` an empty directory, creating it if needed.
    fn reset_dir(&self, path: &Path) -> Result<(), StoreError>;

    /// Create `path` and any missing parents.
    fn create_dir(&self, path: &Path) -> Result<(), StoreError>;

    /// Write `contents` to `path`, replacing any existing file.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError>;
}

/// [`TileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl TileStore for FsStore {
    fn reset_dir(&self, path: &Path) -> Result<(), StoreError> {
        check_reset_target(path)?;

        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Creating tile root {}", path.display());
                return fs::create_dir_all(path).map_err(|e| StoreError::io(path, e));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if !metadata.is_dir() {
            return Err(StoreError::UnsafeResetTarget {
                path: path.to_path_buf(),
                reason: "exists and is not a directory".to_string(),
            });
        }

        // Enumerate first, then delete
        let entries = fs::read_dir(path)
            .map_err(|e| StoreError::io(path, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::io(path, e))?;

        debug!(
            "Clearing {} entries from {}",
            entries.len(),
            path.display()
        );

        for entry in entries {
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| StoreError::io(&entry_path, e))?;

            // Symlinks are removed, never followed
            if file_type.is_dir() {
                fs::remove_dir_all(&entry_path).map_err(|e| StoreError::io(&entry_path, e))?;
            } else {
                fs::remove_file(&entry_path).map_err(|e| StoreError::io(&entry_path, e))?;
            }
        }

        Ok(())
    }

    fn create_dir(&self, path: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(path).map_err(|e| StoreError::io(path, e))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        fs::write(path, contents).map_err(|e| StoreError::io(path, e))
    }
}

/// Only `<name>_files` directories with a non-empty name may be reset.
fn check_reset_target(path: &Path) -> Result<(), StoreError> {
    let unsafe_target = |reason: &str| StoreError::UnsafeResetTarget {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| unsafe_target("path has no final component"))?;

    match file_name.strip_suffix(FILES_SUFFIX) {
        Some(name) if !name.is_empty() => Ok(()),
        Some(_) => Err(unsafe_target("tile root name is empty")),
        None => Err(unsafe_target("not a tile root directory")),
    }
}

// =============================================================================
// Output Claim
// =============================================================================

fn active_roots() -> &'static Mutex<HashSet<PathBuf>> {
    static ROOTS: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    ROOTS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Exclusive claim on a tile root for the lifetime of a run.
///
/// Released when dropped.
#[derive(Debug)]
pub struct OutputClaim {
    path: PathBuf,
}

impl OutputClaim {
    /// Claim `path`, failing if another run in this process holds it.
    pub fn acquire(path: &Path) -> Result<Self, PyramidError> {
        let key = claim_key(path);
        let mut roots = active_roots()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !roots.insert(key.clone()) {
            return Err(PyramidError::OutputDirectoryBusy {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { path: key })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OutputClaim {
    fn drop(&mut self) {
        let mut roots = active_roots()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        roots.remove(&self.path);
    }
}

fn claim_key(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
