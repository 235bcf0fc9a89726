//! Radial event stamps and their cache.
//!
//! A stamp is the square raster one event deposits into the accumulation
//! buffer: white, with alpha following an [`OpacityProfile`] from the center
//! outwards. Stamps are synthesized on first use and memoized per
//! (profile, radius); synthesis is deterministic, so a cache hit and a cache
//! miss always yield the same pixels.
//!
//! Callers that weight events differently can also build a stamp from their
//! own alpha raster with [`Stamp::from_alpha`]; such stamps bypass the cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::basics::{clamp_unit, uround};
use crate::color::Rgba;
use crate::error::{pixel_count, try_alloc, HeatMapError, Result};
use crate::opacity_profile::{OpacityProfile, PROFILE_SAMPLES};

/// Smallest accepted stamp radius; anything below is raised to this.
pub const MIN_RADIUS: f64 = 1.0;

/// Clamp a requested radius to [`MIN_RADIUS`]. NaN becomes the minimum.
#[inline]
pub fn clamp_radius(radius: f64) -> f64 {
    if radius >= MIN_RADIUS {
        radius
    } else {
        MIN_RADIUS
    }
}

// ============================================================================
// Stamp
// ============================================================================

/// Square raster of side `2 * round(radius)`, white with radial alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    size: u32,
    radius: f64,
    pixels: Vec<Rgba>,
}

impl Stamp {
    /// Synthesize a stamp without going through a cache.
    pub fn synthesize(radius: f64, profile: &OpacityProfile) -> Result<Self> {
        let radius = clamp_radius(radius);
        let half = uround(radius);
        let size = half.saturating_mul(2);
        let mut pixels = try_alloc(pixel_count(size, size)?, Rgba::no_color(), size, size)?;

        let center = half as f64;
        let inv_radius = 1.0 / radius;
        for y in 0..size {
            let dy = center - y as f64;
            let row = &mut pixels[(y as usize * size as usize)..((y as usize + 1) * size as usize)];
            for (x, px) in row.iter_mut().enumerate() {
                let dx = center - x as f64;
                let distance = (dx * dx + dy * dy).sqrt() * inv_radius;
                *px = Rgba::with_opacity(&Rgba::WHITE, profile.opacity_at(distance));
            }
        }

        Ok(Self {
            size,
            radius,
            pixels,
        })
    }

    /// Build a white stamp of side `size` from row-major alpha samples,
    /// each clamped to `[0, 1]`. Its radius is reported as `size / 2`.
    pub fn from_alpha(size: u32, alpha: Vec<f64>) -> Result<Self> {
        let expected = pixel_count(size, size)?;
        if size == 0 || alpha.len() != expected {
            return Err(HeatMapError::StampShape {
                size,
                len: alpha.len(),
            });
        }
        let mut pixels = try_alloc(expected, Rgba::no_color(), size, size)?;
        for (px, a) in pixels.iter_mut().zip(alpha) {
            *px = Rgba::with_opacity(&Rgba::WHITE, clamp_unit(a));
        }
        Ok(Self {
            size,
            radius: size as f64 / 2.0,
            pixels,
        })
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Radius the stamp was built for (after clamping).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Offset of the stamp's center from its top-left corner.
    pub fn half_size(&self) -> u32 {
        self.size / 2
    }

    /// Pixel at `(x, y)`; both must be below `size()`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y * self.size + x) as usize]
    }

    /// Row `y` of the stamp.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgba] {
        let start = (y * self.size) as usize;
        &self.pixels[start..start + self.size as usize]
    }
}

// ============================================================================
// StampCache
// ============================================================================

type StampKey = ([u64; PROFILE_SAMPLES], u64);

/// Memoizes stamps per (profile samples, radius).
#[derive(Debug, Default)]
pub struct StampCache {
    stamps: HashMap<StampKey, Arc<Stamp>>,
}

impl StampCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stamp for `radius` (clamped to at least 1) and `profile`,
    /// synthesizing it on first request.
    pub fn get(&mut self, radius: f64, profile: &OpacityProfile) -> Result<Arc<Stamp>> {
        let radius = clamp_radius(radius);
        let key = (profile.cache_key(), radius.to_bits());
        if let Some(stamp) = self.stamps.get(&key) {
            return Ok(Arc::clone(stamp));
        }

        let stamp = Arc::new(Stamp::synthesize(radius, profile)?);
        log::debug!(
            "synthesized {}x{} stamp (radius {}, profile {})",
            stamp.size(),
            stamp.size(),
            radius,
            profile.name()
        );
        self.stamps.insert(key, Arc::clone(&stamp));
        Ok(stamp)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Drop every cached stamp. Stamps still held elsewhere stay alive.
    pub fn clear(&mut self) {
        self.stamps.clear();
    }
}

// ============================================================================
// SharedStampCache
// ============================================================================

/// A [`StampCache`] that several heat maps can share.
///
/// Lookups and insertions are serialized through a mutex; the returned
/// stamps are immutable and can be used without holding the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStampCache {
    inner: Arc<Mutex<StampCache>>,
}

impl SharedStampCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, radius: f64, profile: &OpacityProfile) -> Result<Arc<Stamp>> {
        self.lock().get(radius, profile)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic mid-insert leaves the map consistent, so poisoning is ignored.
    fn lock(&self) -> std::sync::MutexGuard<'_, StampCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================
