//! Error type for the heat map pipeline.
//!
//! Everything numeric is clamped, so the only failures are running out of
//! memory for a raster, building a gradient without stops, and handing in a
//! caller-made stamp whose samples do not fill its square.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeatMapError {
    /// A raster of the requested size could not be allocated.
    #[error("cannot allocate a {width}x{height} raster")]
    Allocation { width: u32, height: u32 },

    /// A gradient table needs at least one color stop.
    #[error("gradient table '{0}' has no color stops")]
    EmptyGradient(String),

    /// A caller-supplied stamp needs `size * size` alpha samples, `size > 0`.
    #[error("stamp of side {size} cannot be built from {len} alpha samples")]
    StampShape { size: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, HeatMapError>;

/// Allocate `len` copies of `value`, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Clone>(len: usize, value: T, width: u32, height: u32) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| HeatMapError::Allocation { width, height })?;
    v.resize(len, value);
    Ok(v)
}

/// Number of pixels in a `width` x `height` raster, or an allocation error
/// if the count does not fit in memory addressing.
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(HeatMapError::Allocation { width, height })
}
