//! Deposited events, kept so the accumulation buffer can be rebuilt.

use std::sync::Arc;

use crate::accumulation_buffer::AccumulationBuffer;
use crate::opacity_profile::OpacityProfile;
use crate::stamp_cache::Stamp;

/// A caller-supplied stamp and where its anchor sits inside it.
///
/// The stamp's top-left corner is placed at `(x - offset_x, y - offset_y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StampPlacement {
    pub stamp: Arc<Stamp>,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl StampPlacement {
    pub fn new(stamp: Arc<Stamp>, offset_x: f64, offset_y: f64) -> Self {
        Self {
            stamp,
            offset_x,
            offset_y,
        }
    }
}

/// One point event as it was painted.
///
/// Events carrying a `placement` keep that stamp for good: re-profiling
/// repaints them unchanged and leaves their `profile` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMapEvent {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub profile: OpacityProfile,
    pub placement: Option<StampPlacement>,
}

impl HeatMapEvent {
    pub fn new(x: f64, y: f64, radius: f64, profile: OpacityProfile) -> Self {
        Self {
            x,
            y,
            radius,
            profile,
            placement: None,
        }
    }

    /// Event painted with its own stamp. `radius` is taken from the stamp.
    pub fn with_placement(x: f64, y: f64, placement: StampPlacement, profile: OpacityProfile) -> Self {
        Self {
            x,
            y,
            radius: placement.stamp.radius(),
            profile,
            placement: Some(placement),
        }
    }

    /// Composite this event into `buffer` using `stamp`, or the event's own
    /// stamp when it has one.
    pub(crate) fn paint(&self, buffer: &mut AccumulationBuffer, stamp: &Stamp) {
        match &self.placement {
            Some(p) => buffer.composite_at(&p.stamp, self.x - p.offset_x, self.y - p.offset_y),
            None => buffer.composite(stamp, self.x, self.y),
        }
    }
}

/// Events in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<HeatMapEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HeatMapEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeatMapEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[HeatMapEvent] {
        &self.events
    }

    /// Rewrite the profile of every event that uses a synthesized stamp.
    /// Positions, radii and order stay.
    pub fn set_profile(&mut self, profile: &OpacityProfile) {
        for event in self.events.iter_mut().filter(|e| e.placement.is_none()) {
            event.profile = profile.clone();
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a HeatMapEvent;
    type IntoIter = std::slice::Iter<'a, HeatMapEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
