//! PNG export of a rendered heat map (feature `png`).
//!
//! Saving is best effort: [`save_png`] overwrites the target, and any I/O or
//! encoding failure is logged and dropped so the caller's rendering state is
//! never affected. [`try_save_png`] exposes the error for callers that want it.

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::renderer::RenderedImage;

/// Write `image` with its overall opacity applied. Errors are logged, not
/// returned.
pub fn save_png<P: AsRef<Path>>(image: &RenderedImage, path: P) {
    let path = path.as_ref();
    match try_save_png(image, path) {
        Ok(()) => log::debug!("saved heat map to {}", path.display()),
        Err(e) => log::warn!("could not save heat map to {}: {}", path.display(), e),
    }
}

/// Write `image` with its overall opacity applied, reporting failures.
pub fn try_save_png<P: AsRef<Path>>(image: &RenderedImage, path: P) -> image::ImageResult<()> {
    let raster = RgbaImage::from_raw(image.width(), image.height(), image.to_rgba8_with_opacity())
        .ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;
    raster.save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat_map::{HeatMap, HeatMapConfig};

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut map = HeatMap::new(HeatMapConfig::new(32, 24).with_heat_map_opacity(1.0)).unwrap();
        map.add_event(16.0, 12.0).unwrap();
        map.save_as_png(&path);

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (32, 24));
        assert_eq!(loaded.as_raw().as_slice(), map.image().as_bytes());
    }

    #[test]
    fn test_overwrites_silently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, b"not a png").unwrap();
        let map = HeatMap::new(HeatMapConfig::new(8, 8)).unwrap();
        map.save_as_png(&path);
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deeper").join("map.png");
        let map = HeatMap::new(HeatMapConfig::new(8, 8)).unwrap();
        map.save_as_png(&path);
        assert!(!path.exists());
        assert!(try_save_png(map.image(), &path).is_err());
    }
}
