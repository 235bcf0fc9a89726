//! The heat map: stamps, accumulation, event log and rendering behind one
//! stateful type.
//!
//! Every operation that changes what is visible re-renders the whole image
//! before returning, so [`HeatMap::image`] is always current. Operations that
//! only change defaults for later events (`set_event_radius`,
//! `set_opacity_distribution`) leave the image alone.
//!
//! `HeatMap` is single-threaded: mutation needs `&mut self`, and callers that
//! share one across threads wrap it in a mutex. The stamp cache can be shared
//! between heat maps through [`SharedStampCache`].

use std::sync::Arc;

use crate::accumulation_buffer::AccumulationBuffer;
use crate::basics::clamp_unit;
use crate::brightness::Brightness;
use crate::error::Result;
use crate::event_log::{EventLog, HeatMapEvent, StampPlacement};
use crate::gradient_table::GradientTable;
use crate::opacity_profile::OpacityProfile;
use crate::renderer::{FadeMode, HeatMapRenderer, RenderedImage};
use crate::stamp_cache::{clamp_radius, SharedStampCache, Stamp};

/// Default radius of an event stamp, in pixels.
pub const DEFAULT_EVENT_RADIUS: f64 = 15.5;

/// Default overall opacity of the rendered heat map.
pub const DEFAULT_HEAT_MAP_OPACITY: f64 = 0.5;

// ============================================================================
// HeatMapConfig
// ============================================================================

/// Construction parameters for a [`HeatMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapConfig {
    pub width: u32,
    pub height: u32,
    pub color_mapping: GradientTable,
    pub event_radius: f64,
    pub fade_colors: bool,
    pub heat_map_opacity: f64,
    pub opacity_distribution: OpacityProfile,
    /// Keep every event so `reprofile_all` can rebuild the buffer.
    pub track_events: bool,
    pub brightness: Brightness,
    pub fade_mode: FadeMode,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            color_mapping: GradientTable::LIME_YELLOW_RED,
            event_radius: DEFAULT_EVENT_RADIUS,
            fade_colors: true,
            heat_map_opacity: DEFAULT_HEAT_MAP_OPACITY,
            opacity_distribution: OpacityProfile::CUSTOM,
            track_events: true,
            brightness: Brightness::Fast,
            fade_mode: FadeMode::Brightness,
        }
    }
}

impl HeatMapConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_color_mapping(mut self, table: GradientTable) -> Self {
        self.color_mapping = table;
        self
    }

    pub fn with_event_radius(mut self, radius: f64) -> Self {
        self.event_radius = radius;
        self
    }

    pub fn with_fade_colors(mut self, fade: bool) -> Self {
        self.fade_colors = fade;
        self
    }

    pub fn with_heat_map_opacity(mut self, opacity: f64) -> Self {
        self.heat_map_opacity = opacity;
        self
    }

    pub fn with_opacity_distribution(mut self, profile: OpacityProfile) -> Self {
        self.opacity_distribution = profile;
        self
    }

    pub fn with_track_events(mut self, track: bool) -> Self {
        self.track_events = track;
        self
    }

    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_fade_mode(mut self, mode: FadeMode) -> Self {
        self.fade_mode = mode;
        self
    }
}

// ============================================================================
// HeatMap
// ============================================================================

pub struct HeatMap {
    color_mapping: GradientTable,
    event_radius: f64,
    fade_colors: bool,
    opacity_distribution: OpacityProfile,
    track_events: bool,
    stamps: SharedStampCache,
    buffer: AccumulationBuffer,
    events: EventLog,
    renderer: HeatMapRenderer,
    image: RenderedImage,
}

impl HeatMap {
    /// Create a heat map with its own stamp cache.
    pub fn new(config: HeatMapConfig) -> Result<Self> {
        Self::with_stamp_cache(config, SharedStampCache::new())
    }

    /// Create a heat map that draws stamps from `stamps`.
    pub fn with_stamp_cache(config: HeatMapConfig, stamps: SharedStampCache) -> Result<Self> {
        let buffer = AccumulationBuffer::new(config.width, config.height)?;
        let mut image = RenderedImage::new(config.width, config.height)?;
        image.set_opacity(config.heat_map_opacity);
        let mut map = Self {
            color_mapping: config.color_mapping,
            event_radius: clamp_radius(config.event_radius),
            fade_colors: config.fade_colors,
            opacity_distribution: config.opacity_distribution,
            track_events: config.track_events,
            stamps,
            buffer,
            events: EventLog::new(),
            renderer: HeatMapRenderer::new(config.brightness, config.fade_mode),
            image,
        };
        map.repaint();
        Ok(map)
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Add an event at `(x, y)` with the current default radius and profile.
    pub fn add_event(&mut self, x: f64, y: f64) -> Result<()> {
        let profile = self.opacity_distribution.clone();
        self.add_event_with(x, y, self.event_radius, &profile)
    }

    /// Add an event with an explicit radius and profile. The defaults for
    /// later events are not changed.
    pub fn add_event_with(&mut self, x: f64, y: f64, radius: f64, profile: &OpacityProfile) -> Result<()> {
        self.deposit(x, y, radius, profile)?;
        self.repaint();
        Ok(())
    }

    /// Add an event painted with a caller-made stamp, for example a more
    /// opaque one for events that should weigh more. The stamp's top-left
    /// corner goes to `(x - offset_x, y - offset_y)`; pass
    /// `stamp.half_size()` for both offsets to center it on the event.
    ///
    /// [`HeatMap::reprofile_all`] repaints such events with their own stamp.
    pub fn add_event_stamp(&mut self, x: f64, y: f64, stamp: Arc<Stamp>, offset_x: f64, offset_y: f64) {
        if !Self::is_placeable(x, y) {
            return;
        }
        let placement = StampPlacement::new(stamp, offset_x, offset_y);
        self.buffer
            .composite_at(&placement.stamp, x - offset_x, y - offset_y);
        if self.track_events {
            let profile = self.opacity_distribution.clone();
            self.events
                .push(HeatMapEvent::with_placement(x, y, placement, profile));
        }
        self.repaint();
    }

    /// Add several events with the default radius and profile, rendering
    /// once after the last one.
    pub fn add_events<I>(&mut self, points: I) -> Result<()>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let profile = self.opacity_distribution.clone();
        let mut added = 0usize;
        let mut result = Ok(());
        for (x, y) in points {
            if let Err(e) = self.deposit(x, y, self.event_radius, &profile) {
                result = Err(e);
                break;
            }
            added += 1;
        }
        log::debug!("added {} events", added);
        self.repaint();
        result
    }

    /// Remove every event and blank the buffer.
    pub fn clear_heat_map(&mut self) {
        self.events.clear();
        self.buffer.clear();
        self.repaint();
    }

    /// Make `profile` the default and rebuild the buffer by repainting every
    /// retained event, in its original order, with that profile.
    ///
    /// Events added with their own stamp keep it. Every stamp is fetched
    /// before the buffer is touched, so on error the heat map is unchanged.
    /// Without event tracking there is nothing to rebuild from; only the
    /// default changes.
    pub fn reprofile_all(&mut self, profile: &OpacityProfile) -> Result<()> {
        if !self.track_events {
            self.opacity_distribution = profile.clone();
            log::debug!("event tracking is off, only the default profile changed");
            return Ok(());
        }

        let stamps = self
            .events
            .iter()
            .map(|event| match &event.placement {
                Some(p) => Ok(Arc::clone(&p.stamp)),
                None => self.stamps.get(event.radius, profile),
            })
            .collect::<Result<Vec<_>>>()?;

        self.opacity_distribution = profile.clone();
        self.events.set_profile(profile);
        self.buffer.clear();
        for (event, stamp) in self.events.iter().zip(&stamps) {
            event.paint(&mut self.buffer, stamp);
        }
        log::debug!(
            "repainted {} events with profile {}",
            self.events.len(),
            profile.name()
        );
        self.repaint();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    pub fn color_mapping(&self) -> &GradientTable {
        &self.color_mapping
    }

    pub fn set_color_mapping(&mut self, table: GradientTable) {
        self.color_mapping = table;
        self.repaint();
    }

    pub fn is_fade_colors(&self) -> bool {
        self.fade_colors
    }

    pub fn set_fade_colors(&mut self, fade: bool) {
        self.fade_colors = fade;
        self.repaint();
    }

    pub fn fade_mode(&self) -> FadeMode {
        self.renderer.fade_mode()
    }

    pub fn set_fade_mode(&mut self, mode: FadeMode) {
        self.renderer.set_fade_mode(mode);
        self.repaint();
    }

    pub fn event_radius(&self) -> f64 {
        self.event_radius
    }

    /// Radius for later events, raised to at least 1.
    pub fn set_event_radius(&mut self, radius: f64) {
        self.event_radius = clamp_radius(radius);
    }

    pub fn opacity_distribution(&self) -> &OpacityProfile {
        &self.opacity_distribution
    }

    /// Profile for later events. Already painted events keep theirs; see
    /// [`HeatMap::reprofile_all`].
    pub fn set_opacity_distribution(&mut self, profile: OpacityProfile) {
        self.opacity_distribution = profile;
    }

    pub fn heat_map_opacity(&self) -> f64 {
        self.image.opacity()
    }

    /// Overall opacity of the image, clamped to `[0, 1]`.
    pub fn set_heat_map_opacity(&mut self, opacity: f64) {
        self.image.set_opacity(clamp_unit(opacity));
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Resize the canvas. Accumulated density and retained events are
    /// dropped; a non-positive dimension is ignored. If either raster cannot
    /// be allocated the heat map keeps its previous size and contents.
    pub fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            log::debug!("ignoring heat map resize to {}x{}", width, height);
            return Ok(());
        }
        let mut image = RenderedImage::new(width as u32, height as u32)?;
        image.set_opacity(self.image.opacity());
        self.buffer.resize(width, height)?;
        self.events.clear();
        self.image = image;
        self.repaint();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// The current rendering.
    pub fn image(&self) -> &RenderedImage {
        &self.image
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    /// Retained events; empty when event tracking is off.
    pub fn events(&self) -> &[HeatMapEvent] {
        self.events.as_slice()
    }

    pub fn is_tracking_events(&self) -> bool {
        self.track_events
    }

    pub fn stamp_cache(&self) -> &SharedStampCache {
        &self.stamps
    }

    /// Write the current image, overall opacity applied, as a PNG file.
    /// Failures are logged and otherwise ignored.
    #[cfg(feature = "png")]
    pub fn save_as_png<P: AsRef<std::path::Path>>(&self, path: P) {
        crate::png_export::save_png(&self.image, path);
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn deposit(&mut self, x: f64, y: f64, radius: f64, profile: &OpacityProfile) -> Result<()> {
        if !Self::is_placeable(x, y) {
            return Ok(());
        }
        let radius = clamp_radius(radius);
        let stamp = self.stamps.get(radius, profile)?;
        self.buffer.composite(&stamp, x, y);
        if self.track_events {
            self.events
                .push(HeatMapEvent::new(x, y, radius, profile.clone()));
        }
        Ok(())
    }

    fn is_placeable(x: f64, y: f64) -> bool {
        let finite = x.is_finite() && y.is_finite();
        if !finite {
            log::debug!("dropping event at non-finite position ({}, {})", x, y);
        }
        finite
    }

    // The image is always kept at the buffer's size, so this never allocates.
    fn repaint(&mut self) {
        self.renderer.paint(
            &self.buffer,
            &self.color_mapping,
            self.fade_colors,
            &mut self.image,
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
