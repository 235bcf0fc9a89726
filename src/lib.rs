//! # heatmap-raster
//!
//! Density heat maps from streams of 2D point events.
//!
//! Each event paints a soft radial stamp into an accumulation buffer; the
//! buffer is then mapped through a color gradient, with optional alpha fade,
//! into an RGBA image.
//!
//! ## Architecture
//!
//! The pipeline has four stages:
//!
//! 1. **Stamp synthesis**: an [`OpacityProfile`](opacity_profile::OpacityProfile)
//!    becomes a radial alpha raster, memoized by the [`stamp_cache`]
//! 2. **Accumulation**: stamps are alpha-composited into the
//!    [`AccumulationBuffer`](accumulation_buffer::AccumulationBuffer)
//! 3. **Color mapping**: per-pixel brightness is looked up in a
//!    [`GradientTable`](gradient_table::GradientTable)
//! 4. **Output**: mapped colors, faded or opaque, land in a
//!    [`RenderedImage`](renderer::RenderedImage)
//!
//! [`HeatMap`](heat_map::HeatMap) ties the stages together and keeps the
//! event log needed to repaint with a different profile.
//!
//! ```
//! use heatmap_raster::{GradientTable, HeatMap, HeatMapConfig};
//!
//! let mut map = HeatMap::new(
//!     HeatMapConfig::new(200, 100).with_color_mapping(GradientTable::INFRARED_1),
//! )
//! .unwrap();
//! map.add_events([(40.0, 50.0), (45.0, 52.0), (150.0, 30.0)]).unwrap();
//! assert_eq!(map.image().width(), 200);
//! ```

// Foundation
pub mod basics;
pub mod color;
pub mod error;

// Kernel and color ramps
pub mod gradient_table;
pub mod opacity_profile;
pub mod stamp_cache;

// Accumulation and rendering
pub mod accumulation_buffer;
pub mod brightness;
pub mod renderer;

// Stateful front end
pub mod event_log;
pub mod heat_map;

#[cfg(feature = "png")]
pub mod png_export;

pub use accumulation_buffer::AccumulationBuffer;
pub use brightness::{Brightness, BrightnessFunction};
pub use color::{Rgba, Rgba8};
pub use error::{HeatMapError, Result};
pub use event_log::{EventLog, HeatMapEvent, StampPlacement};
pub use gradient_table::{GradientTable, Stop};
pub use heat_map::{HeatMap, HeatMapConfig};
pub use opacity_profile::OpacityProfile;
pub use renderer::{FadeMode, HeatMapRenderer, RenderedImage};
pub use stamp_cache::{SharedStampCache, Stamp, StampCache};
