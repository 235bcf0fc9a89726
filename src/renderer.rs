//! Heat map renderer: accumulation buffer to colored image.
//!
//! For every pixel the renderer computes a brightness from the accumulated
//! color, looks the brightness up in a [`GradientTable`], and writes the
//! mapped color. With fade colors on, the output alpha follows the pixel's
//! intensity so sparse regions fade out; with it off, every pixel is opaque
//! and the whole canvas shows the gradient's footprint.
//!
//! Rendering is a pure function of its inputs: the same buffer, gradient and
//! settings always produce byte-identical output.

use crate::accumulation_buffer::AccumulationBuffer;
use crate::basics::clamp_unit;
use crate::brightness::{Brightness, BrightnessFunction};
use crate::color::{Rgba, Rgba8};
use crate::error::{pixel_count, try_alloc, HeatMapError, Result};
use crate::gradient_table::GradientTable;

// ============================================================================
// FadeMode
// ============================================================================

/// Where the output alpha comes from when fade colors is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeMode {
    /// Alpha equals the computed brightness.
    #[default]
    Brightness,
    /// Alpha equals the accumulation buffer's own alpha channel.
    BufferAlpha,
}

// ============================================================================
// RenderedImage
// ============================================================================

/// RGBA8 image (straight alpha, row-major, top-to-bottom) plus an overall
/// opacity that a display surface applies on top of the per-pixel alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    opacity: f64,
}

impl RenderedImage {
    /// Transparent image at full overall opacity.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = pixel_count(width, height)?
            .checked_mul(4)
            .ok_or(HeatMapError::Allocation { width, height })?;
        Ok(Self {
            width,
            height,
            data: try_alloc(len, 0u8, width, height)?,
            opacity: 1.0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Rgba8::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set the overall opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = clamp_unit(opacity);
    }

    /// Copy of the pixels with the overall opacity multiplied into alpha.
    pub fn to_rgba8_with_opacity(&self) -> Vec<u8> {
        let k = Rgba8::from_double(self.opacity);
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            px[3] = Rgba8::multiply(px[3], k);
        }
        out
    }

    /// True when every pixel equals `c`.
    pub fn is_filled_with(&self, c: Rgba8) -> bool {
        let c = c.to_array();
        self.data.chunks_exact(4).all(|px| px == c)
    }
}

// ============================================================================
// HeatMapRenderer
// ============================================================================

/// Stateless mapping from an [`AccumulationBuffer`] to a [`RenderedImage`].
#[derive(Debug, Clone, Default)]
pub struct HeatMapRenderer<B = Brightness> {
    brightness: B,
    fade_mode: FadeMode,
}

impl<B: BrightnessFunction> HeatMapRenderer<B> {
    pub fn new(brightness: B, fade_mode: FadeMode) -> Self {
        Self {
            brightness,
            fade_mode,
        }
    }

    pub fn brightness(&self) -> &B {
        &self.brightness
    }

    pub fn fade_mode(&self) -> FadeMode {
        self.fade_mode
    }

    pub fn set_fade_mode(&mut self, mode: FadeMode) {
        self.fade_mode = mode;
    }

    /// Render into a newly allocated image.
    pub fn render(
        &self,
        buffer: &AccumulationBuffer,
        gradient: &GradientTable,
        fade_colors: bool,
    ) -> Result<RenderedImage> {
        let mut image = RenderedImage::new(buffer.width(), buffer.height())?;
        self.render_into(buffer, gradient, fade_colors, &mut image)?;
        Ok(image)
    }

    /// Render into `out`, reallocating it only if its size differs from the
    /// buffer's. The image's overall opacity is preserved.
    pub fn render_into(
        &self,
        buffer: &AccumulationBuffer,
        gradient: &GradientTable,
        fade_colors: bool,
        out: &mut RenderedImage,
    ) -> Result<()> {
        if out.width != buffer.width() || out.height != buffer.height() {
            let opacity = out.opacity;
            *out = RenderedImage::new(buffer.width(), buffer.height())?;
            out.opacity = opacity;
        }
        self.paint(buffer, gradient, fade_colors, out);
        Ok(())
    }

    /// Render into `out`, which must already have the buffer's size.
    pub fn paint(
        &self,
        buffer: &AccumulationBuffer,
        gradient: &GradientTable,
        fade_colors: bool,
        out: &mut RenderedImage,
    ) {
        debug_assert_eq!((out.width, out.height), (buffer.width(), buffer.height()));
        for (dst, c) in out.data.chunks_exact_mut(4).zip(buffer.pixels()) {
            dst.copy_from_slice(&self.map_pixel(c, gradient, fade_colors).to_array());
        }
        log::trace!(
            "rendered {}x{} heat map with {}",
            buffer.width(),
            buffer.height(),
            gradient.name()
        );
    }

    /// Color for one accumulated (premultiplied) pixel.
    pub fn map_pixel(&self, c: &Rgba, gradient: &GradientTable, fade_colors: bool) -> Rgba8 {
        let brightness = clamp_unit(self.brightness.brightness(c));
        let mapped = gradient.color_at(brightness);
        let alpha = if !fade_colors {
            1.0
        } else {
            match self.fade_mode {
                FadeMode::Brightness => brightness,
                FadeMode::BufferAlpha => c.a,
            }
        };
        Rgba8::from_rgba(&Rgba::with_opacity(&mapped, alpha))
    }
}

// ============================================================================
// Tests
// ============================================================================
