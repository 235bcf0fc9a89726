//! Radial opacity falloff curves.
//!
//! A profile is 11 opacity samples taken at normalized distances
//! 0.0, 0.1, ..., 1.0 from a stamp's center. Between samples the opacity is
//! interpolated linearly. Every built-in curve starts at 0.90 and ends at
//! 0.0, so a single event never saturates and always fades out at its rim.

use std::borrow::Cow;

use crate::basics::{clamp_unit, ifloor, lerp};

/// Number of samples in a profile.
pub const PROFILE_SAMPLES: usize = 11;

/// Opacity falloff from a stamp's center (index 0) to its edge (index 10).
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityProfile {
    name: Cow<'static, str>,
    samples: [f64; PROFILE_SAMPLES],
}

impl OpacityProfile {
    pub const EXPONENTIAL: OpacityProfile = OpacityProfile::from_static(
        "EXPONENTIAL",
        [0.90, 0.37, 0.14, 0.05, 0.02, 0.006, 0.002, 0.001, 0.0003, 0.0001, 0.0],
    );

    pub const TAN_HYP: OpacityProfile = OpacityProfile::from_static(
        "TAN_HYP",
        [0.90, 0.87, 0.83, 0.76, 0.64, 0.48, 0.32, 0.19, 0.11, 0.06, 0.0],
    );

    pub const CUSTOM: OpacityProfile = OpacityProfile::from_static(
        "CUSTOM",
        [0.90, 0.56, 0.42, 0.31, 0.21, 0.14, 0.09, 0.05, 0.02, 0.01, 0.0],
    );

    pub const LINEAR: OpacityProfile = OpacityProfile::from_static(
        "LINEAR",
        [0.90, 0.81, 0.72, 0.63, 0.54, 0.45, 0.36, 0.27, 0.18, 0.09, 0.0],
    );

    /// Registry of the built-in profiles.
    pub const PRESETS: &'static [OpacityProfile] =
        &[Self::EXPONENTIAL, Self::TAN_HYP, Self::CUSTOM, Self::LINEAR];

    const fn from_static(name: &'static str, samples: [f64; PROFILE_SAMPLES]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            samples,
        }
    }

    /// Build a custom profile. Samples are clamped into `[0, 1]`.
    pub fn new(name: impl Into<Cow<'static, str>>, samples: [f64; PROFILE_SAMPLES]) -> Self {
        Self {
            name: name.into(),
            samples: samples.map(clamp_unit),
        }
    }

    /// Look up a built-in profile by name (case-insensitive).
    pub fn preset(name: &str) -> Option<&'static OpacityProfile> {
        let wanted = name.replace('-', "_");
        Self::PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&wanted))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[f64; PROFILE_SAMPLES] {
        &self.samples
    }

    /// Opacity at a normalized distance from the center (clamped to `[0, 1]`).
    pub fn opacity_at(&self, distance: f64) -> f64 {
        let scaled = clamp_unit(distance) * (PROFILE_SAMPLES - 1) as f64;
        let i = ifloor(scaled).clamp(0, PROFILE_SAMPLES as i32 - 2) as usize;
        lerp(self.samples[i], self.samples[i + 1], scaled - i as f64)
    }

    /// Identity used to key cached stamps: the exact sample bit patterns.
    /// Two profiles with equal samples produce identical stamps.
    pub(crate) fn cache_key(&self) -> [u64; PROFILE_SAMPLES] {
        self.samples.map(f64::to_bits)
    }
}

impl Default for OpacityProfile {
    fn default() -> Self {
        Self::CUSTOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_share_boundaries() {
        for p in OpacityProfile::PRESETS {
            assert_eq!(p.opacity_at(0.0), 0.90, "{}", p.name());
            assert_eq!(p.opacity_at(1.0), 0.0, "{}", p.name());
        }
    }

    #[test]
    fn test_presets_non_increasing() {
        for p in OpacityProfile::PRESETS {
            for w in p.samples().windows(2) {
                assert!(w[0] >= w[1], "{} not monotone", p.name());
            }
        }
    }

    #[test]
    fn test_samples_hit_exactly() {
        let p = &OpacityProfile::TAN_HYP;
        assert_eq!(p.opacity_at(0.5), 0.48);
        assert!((p.opacity_at(0.3) - 0.76).abs() < 1e-12);
    }

    #[test]
    fn test_linear_interpolation_between_samples() {
        let p = &OpacityProfile::LINEAR;
        assert!((p.opacity_at(0.05) - 0.855).abs() < 1e-12);
        assert!((p.opacity_at(0.95) - 0.045).abs() < 1e-12);
        let c = &OpacityProfile::CUSTOM;
        assert!((c.opacity_at(0.05) - 0.73).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_distance_clamped() {
        let p = &OpacityProfile::EXPONENTIAL;
        assert_eq!(p.opacity_at(-1.0), 0.90);
        assert_eq!(p.opacity_at(3.0), 0.0);
    }

    #[test]
    fn test_custom_profile_clamps_samples() {
        let p = OpacityProfile::new("hot", [2.0, 1.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, -1.0]);
        assert_eq!(p.samples()[0], 1.0);
        assert_eq!(p.samples()[10], 0.0);
        assert_eq!(p.opacity_at(0.0), 1.0);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(OpacityProfile::preset("linear"), Some(&OpacityProfile::LINEAR));
        assert_eq!(OpacityProfile::preset("tan-hyp"), Some(&OpacityProfile::TAN_HYP));
        assert!(OpacityProfile::preset("gaussian").is_none());
    }

    #[test]
    fn test_cache_key_by_value() {
        let a = OpacityProfile::new("a", *OpacityProfile::LINEAR.samples());
        assert_eq!(a.cache_key(), OpacityProfile::LINEAR.cache_key());
        assert_ne!(
            OpacityProfile::LINEAR.cache_key(),
            OpacityProfile::CUSTOM.cache_key()
        );
    }
}
