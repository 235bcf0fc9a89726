//! Gradient color table.
//!
//! Maps a brightness in `[0, 1]` to a color through an ordered list of
//! color stops. Stops are kept in definition order; lookup scans them in that
//! order and interpolates linearly between the bracketing pair.
//!
//! The six built-in tables are `const` values collected in
//! [`GradientTable::PRESETS`]. A custom table is just another value built
//! with [`GradientTable::new`] and is accepted everywhere a preset is.

use std::borrow::Cow;

use crate::basics::clamp_unit;
use crate::color::Rgba;
use crate::error::{HeatMapError, Result};

// ============================================================================
// Stop
// ============================================================================

/// Color stop: a color pinned at an offset along the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub offset: f64,
    pub color: Rgba,
}

impl Stop {
    pub const fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

const fn rgb(r: f64, g: f64, b: f64) -> Rgba {
    Rgba::new_rgb(r, g, b)
}

const LIME: Rgba = rgb(0.0, 1.0, 0.0);
const YELLOW: Rgba = rgb(1.0, 1.0, 0.0);
const RED: Rgba = rgb(1.0, 0.0, 0.0);
const BLUE: Rgba = rgb(0.0, 0.0, 1.0);
const CYAN: Rgba = rgb(0.0, 1.0, 1.0);

// ============================================================================
// GradientTable
// ============================================================================

/// Ordered set of color stops defining a 1D color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    name: Cow<'static, str>,
    stops: Cow<'static, [Stop]>,
}

impl GradientTable {
    pub const LIME_YELLOW_RED: GradientTable = GradientTable::from_static(
        "LIME_YELLOW_RED",
        &[
            Stop::new(0.0, LIME),
            Stop::new(0.8, YELLOW),
            Stop::new(1.0, RED),
        ],
    );

    pub const BLUE_CYAN_GREEN_YELLOW_RED: GradientTable = GradientTable::from_static(
        "BLUE_CYAN_GREEN_YELLOW_RED",
        &[
            Stop::new(0.0, BLUE),
            Stop::new(0.25, CYAN),
            Stop::new(0.5, LIME),
            Stop::new(0.75, YELLOW),
            Stop::new(1.0, RED),
        ],
    );

    pub const INFRARED_1: GradientTable = GradientTable::from_static(
        "INFRARED_1",
        &[
            Stop::new(0.0, Rgba::BLACK),
            Stop::new(0.1, rgb(25.0 / 255.0, 20.0 / 255.0, 126.0 / 255.0)),
            Stop::new(0.3, rgb(192.0 / 255.0, 40.0 / 255.0, 150.0 / 255.0)),
            Stop::new(0.5, rgb(234.0 / 255.0, 82.0 / 255.0, 10.0 / 255.0)),
            Stop::new(0.85, rgb(1.0, 220.0 / 255.0, 25.0 / 255.0)),
            Stop::new(1.0, Rgba::WHITE),
        ],
    );

    pub const INFRARED_2: GradientTable = GradientTable::from_static(
        "INFRARED_2",
        &[
            Stop::new(0.0, Rgba::BLACK),
            Stop::new(0.1, rgb(1.0 / 255.0, 20.0 / 255.0, 127.0 / 255.0)),
            Stop::new(0.2, rgb(1.0 / 255.0, 13.0 / 255.0, 100.0 / 255.0)),
            Stop::new(0.4, rgb(95.0 / 255.0, 172.0 / 255.0, 68.0 / 255.0)),
            Stop::new(0.5, rgb(210.0 / 255.0, 197.0 / 255.0, 12.0 / 255.0)),
            Stop::new(0.65, rgb(225.0 / 255.0, 53.0 / 255.0, 56.0 / 255.0)),
            Stop::new(1.0, Rgba::WHITE),
        ],
    );

    pub const BLACK_WHITE: GradientTable = GradientTable::from_static(
        "BLACK_WHITE",
        &[Stop::new(0.0, Rgba::BLACK), Stop::new(1.0, Rgba::WHITE)],
    );

    pub const WHITE_BLACK: GradientTable = GradientTable::from_static(
        "WHITE_BLACK",
        &[Stop::new(0.0, Rgba::WHITE), Stop::new(1.0, Rgba::BLACK)],
    );

    /// Registry of the built-in tables, in presentation order.
    pub const PRESETS: &'static [GradientTable] = &[
        Self::LIME_YELLOW_RED,
        Self::BLUE_CYAN_GREEN_YELLOW_RED,
        Self::INFRARED_1,
        Self::INFRARED_2,
        Self::BLACK_WHITE,
        Self::WHITE_BLACK,
    ];

    const fn from_static(name: &'static str, stops: &'static [Stop]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            stops: Cow::Borrowed(stops),
        }
    }

    /// Build a custom table. Stops are used in the given order.
    pub fn new(name: impl Into<Cow<'static, str>>, stops: Vec<Stop>) -> Result<Self> {
        let name = name.into();
        if stops.is_empty() {
            return Err(HeatMapError::EmptyGradient(name.into_owned()));
        }
        Ok(Self {
            name,
            stops: Cow::Owned(stops),
        })
    }

    /// Look up a built-in table by name (case-insensitive, `-` and `_`
    /// are interchangeable).
    pub fn preset(name: &str) -> Option<&'static GradientTable> {
        let wanted = name.replace('-', "_");
        Self::PRESETS
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(&wanted))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Color at `fraction` along the ramp; `fraction` is clamped to `[0, 1]`.
    ///
    /// An exact stop offset returns that stop's color untouched. Fractions
    /// outside the first/last stop return the nearest end color.
    pub fn color_at(&self, fraction: f64) -> Rgba {
        let fraction = clamp_unit(fraction);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Rgba::no_color(),
        };
        if fraction < first.offset {
            return first.color;
        }
        if fraction > last.offset {
            return last.color;
        }

        let mut lower = first;
        let mut upper = last;
        for stop in self.stops.iter() {
            if stop.offset == fraction {
                return stop.color;
            } else if stop.offset < fraction {
                lower = stop;
            } else {
                upper = stop;
                break;
            }
        }

        let span = upper.offset - lower.offset;
        if span <= 0.0 {
            return lower.color;
        }
        lower
            .color
            .gradient(&upper.color, (fraction - lower.offset) / span)
    }
}

impl Default for GradientTable {
    fn default() -> Self {
        Self::LIME_YELLOW_RED
    }
}

// ============================================================================
// Tests
// ============================================================================
