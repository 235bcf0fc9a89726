//! Brightness functions used to turn an accumulated pixel into a gradient
//! fraction.
//!
//! The renderer is generic over [`BrightnessFunction`]; the built-in
//! formulas are the variants of [`Brightness`]. Closures of type
//! `Fn(&Rgba) -> f64` implement the trait as well.

use crate::color::Rgba;

/// Maps a color to a scalar brightness in `[0, 1]`.
pub trait BrightnessFunction {
    fn brightness(&self, c: &Rgba) -> f64;
}

/// Built-in brightness formulas. All weights sum to one, so a gray pixel
/// `(v, v, v)` has brightness `v` under every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brightness {
    /// `(2R + 3G + B) / 6`, an integer-weight approximation, the default.
    #[default]
    Fast,
    /// ITU-R BT.709 luma: `0.2126R + 0.7152G + 0.0722B`.
    Rec709,
    /// CCIR 601 luma: `0.299R + 0.587G + 0.114B`.
    Rec601,
    /// `sqrt(0.241R² + 0.691G² + 0.068B²)`.
    Luminance,
}

impl Brightness {
    pub const ALL: [Brightness; 4] = [
        Brightness::Fast,
        Brightness::Rec709,
        Brightness::Rec601,
        Brightness::Luminance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Brightness::Fast => "fast",
            Brightness::Rec709 => "rec709",
            Brightness::Rec601 => "rec601",
            Brightness::Luminance => "luminance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

impl BrightnessFunction for Brightness {
    #[inline]
    fn brightness(&self, c: &Rgba) -> f64 {
        match self {
            Brightness::Fast => (c.r + c.r + c.g + c.g + c.g + c.b) / 6.0,
            Brightness::Rec709 => 0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b,
            Brightness::Rec601 => 0.299 * c.r + 0.587 * c.g + 0.114 * c.b,
            Brightness::Luminance => {
                (0.241 * c.r * c.r + 0.691 * c.g * c.g + 0.068 * c.b * c.b).sqrt()
            }
        }
    }
}

impl<F> BrightnessFunction for F
where
    F: Fn(&Rgba) -> f64,
{
    #[inline]
    fn brightness(&self, c: &Rgba) -> f64 {
        self(c)
    }
}
