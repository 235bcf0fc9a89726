//! Color types and operations.
//!
//! Two precisions are used by the pipeline:
//! - `Rgba`: f64 components in `[0, 1]`, the working space for gradient
//!   stops, stamps and the accumulation buffer
//! - `Rgba8`: u8 components, the storage format of rendered images

use crate::basics::{clamp_unit, lerp, uround};

// ============================================================================
// Rgba (f64 precision color)
// ============================================================================

/// RGBA color with f64 components in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Rgba = Rgba::new_rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new_rgb(0.0, 0.0, 0.0);

    pub fn with_opacity(c: &Rgba, a: f64) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a,
        }
    }

    pub fn no_color() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Interpolate between `self` and `c` by parameter `k`.
    pub fn gradient(&self, c: &Rgba, k: f64) -> Rgba {
        Rgba {
            r: lerp(self.r, c.r, k),
            g: lerp(self.g, c.g, k),
            b: lerp(self.b, c.b, k),
            a: lerp(self.a, c.a, k),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::no_color()
    }
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert from `Rgba` (f64) to `Rgba8` (u8), clamping each component.
    pub fn from_rgba(c: &Rgba) -> Self {
        Self {
            r: Self::from_double(c.r),
            g: Self::from_double(c.g),
            b: Self::from_double(c.b),
            a: Self::from_double(c.a),
        }
    }

    pub fn from_double(a: f64) -> u8 {
        uround(clamp_unit(a) * Self::BASE_MASK as f64) as u8
    }

    /// Fixed-point multiply, exact over u8.
    /// `(a * b + 128) >> 8`, with rounding correction.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
