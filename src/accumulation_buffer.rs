//! Accumulation buffer: the surface event stamps are painted into.
//!
//! Pixels are stored premultiplied, starting fully transparent. Stamps are
//! white, so after any number of events every color channel of a pixel
//! equals its alpha: the buffer is effectively a single intensity channel
//! that reads the same whether taken as color-over-black or as coverage.
//!
//! Compositing is plain source-over in paint order. Overlapping events push
//! a pixel toward full coverage but can never exceed it.

use crate::basics::iround;
use crate::color::Rgba;
use crate::error::{pixel_count, try_alloc, Result};
use crate::stamp_cache::Stamp;

/// Premultiplied RGBA surface with f64 channels.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl AccumulationBuffer {
    /// Create a transparent buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixels = try_alloc(
            pixel_count(width, height)?,
            Rgba::no_color(),
            width,
            height,
        )?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Row `y`, premultiplied.
    pub fn row(&self, y: u32) -> &[Rgba] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// True when nothing has been painted since creation or the last clear.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 0.0)
    }

    /// Replace the contents with a fresh transparent buffer of the given
    /// size. A non-positive dimension leaves the buffer untouched and
    /// returns `Ok(false)`.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<bool> {
        if width <= 0 || height <= 0 {
            log::debug!("ignoring resize to {}x{}", width, height);
            return Ok(false);
        }
        *self = Self::new(width as u32, height as u32)?;
        log::debug!("accumulation buffer recreated at {}x{}", width, height);
        Ok(true)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::no_color());
    }

    /// Paint `stamp` so that its center lands on `(center_x, center_y)`.
    /// Parts outside the buffer are clipped.
    pub fn composite(&mut self, stamp: &Stamp, center_x: f64, center_y: f64) {
        let half = stamp.half_size() as f64;
        self.composite_at(stamp, center_x - half, center_y - half);
    }

    /// Paint `stamp` with its top-left corner at `(left, top)`, rounded to
    /// the nearest pixel. Non-finite positions paint nothing.
    pub fn composite_at(&mut self, stamp: &Stamp, left: f64, top: f64) {
        if !left.is_finite() || !top.is_finite() {
            return;
        }
        let ox = iround(left) as i64;
        let oy = iround(top) as i64;
        let size = stamp.size() as i64;
        let (w, h) = (self.width as i64, self.height as i64);

        let x0 = (-ox).max(0);
        let x1 = (w - ox).min(size);
        let y0 = (-oy).max(0);
        let y1 = (h - oy).min(size);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for sy in y0..y1 {
            let src = &stamp.row(sy as u32)[x0 as usize..x1 as usize];
            let start = ((oy + sy) * w + ox + x0) as usize;
            let dst = &mut self.pixels[start..start + src.len()];
            for (d, s) in dst.iter_mut().zip(src) {
                Self::blend_pix(d, s);
            }
        }
    }

    /// Source-over with a straight-alpha source into a premultiplied
    /// destination.
    #[inline]
    fn blend_pix(d: &mut Rgba, s: &Rgba) {
        let sa = s.a;
        if sa <= 0.0 {
            return;
        }
        let k = 1.0 - sa;
        d.r = s.r * sa + d.r * k;
        d.g = s.g * sa + d.g * k;
        d.b = s.b * sa + d.b * k;
        d.a = sa + d.a * k;
    }
}
