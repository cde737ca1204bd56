//! Level planning.
//!
//! For an image of `width x height` the pyramid has
//! `ceil(log2(max(width, height))) + 1` levels. Level `i` is scaled by
//! `0.5 ^ (levels - 1 - i)` and its dimensions are rounded up, so no level
//! collapses to zero and the last level is exactly the source size.

use serde::Serialize;

use crate::error::PyramidError;

/// One resolution layer of the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Level {
    /// Level index, 0 is the coarsest
    pub index: u32,

    /// Scale relative to the source image, in (0, 1]
    pub scale: f64,

    /// Width of this level in pixels
    pub width: u32,

    /// Height of this level in pixels
    pub height: u32,
}

/// Number of levels needed for an image of the given size.
///
/// # Errors
///
/// Returns [`PyramidError::InvalidImageDimensions`] if either dimension is zero.
pub fn level_count(width: u32, height: u32) -> Result<u32, PyramidError> {
    check_dimensions(width, height)?;
    Ok(ceil_log2(width.max(height)) + 1)
}

/// Dimensions of `index` within a pyramid of `levels` levels.
///
/// Returns `None` if `index` is not below `levels`.
pub fn level_dimensions(width: u32, height: u32, index: u32, levels: u32) -> Option<(u32, u32)> {
    if index >= levels {
        return None;
    }

    // scale is an exact power of two, so ceil(w * scale) == ceil(w / 2^shift)
    let divisor = 1u64 << (levels - 1 - index);
    let level_width = u64::from(width).div_ceil(divisor);
    let level_height = u64::from(height).div_ceil(divisor);

    Some((level_width as u32, level_height as u32))
}

/// Compute every level of the pyramid, ordered from coarsest to finest.
///
/// ```
/// use dzi_tiler::pyramid::plan_levels;
///
/// let levels = plan_levels(1024, 768).unwrap();
/// assert_eq!(levels.len(), 11);
/// assert_eq!((levels[10].width, levels[10].height), (1024, 768));
/// assert_eq!((levels[0].width, levels[0].height), (1, 1));
/// ```
pub fn plan_levels(width: u32, height: u32) -> Result<Vec<Level>, PyramidError> {
    let levels = level_count(width, height)?;

    let plan = (0..levels)
        .filter_map(|index| {
            let (level_width, level_height) = level_dimensions(width, height, index, levels)?;
            Some(Level {
                index,
                scale: 0.5f64.powi((levels - 1 - index) as i32),
                width: level_width,
                height: level_height,
            })
        })
        .collect();

    Ok(plan)
}

fn check_dimensions(width: u32, height: u32) -> Result<(), PyramidError> {
    if width == 0 || height == 0 {
        return Err(PyramidError::InvalidImageDimensions { width, height });
    }
    Ok(())
}

/// `ceil(log2(n))` for `n >= 1`.
fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        u32::BITS - (n - 1).leading_zeros()
    }
}
