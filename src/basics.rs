//! Rounding and clamping helpers shared by the rasterization stages.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round a double to the nearest integer (round half away from zero).
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Round a double to the nearest unsigned integer (round half up).
/// Negative input saturates to zero.
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Floor a double to the nearest integer toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

// ============================================================================
// Clamping
// ============================================================================

/// Clamp `v` into `[0, 1]`. NaN maps to 0.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v > 0.0 {
        v.min(1.0)
    } else {
        0.0
    }
}

/// Linear interpolation `a + (b - a) * t`.
///
/// Returns exactly `a` for `t == 0` and exactly `b` for `t == 1` when
/// `b == 0`, which the opacity profiles rely on at the edge sample.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
