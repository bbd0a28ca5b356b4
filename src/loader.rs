//! Frame rasters and the async loading seam.
//!
//! The store never touches the filesystem directly; it goes through a
//! [`FrameLoader`], so tests can swap in stub loaders with scripted
//! failures and the real implementation stays a thin tokio::fs + decode
//! wrapper.

use crate::Result;
use image::RgbaImage;
use std::path::Path;
use tokio::fs;

/// A decoded frame raster.
///
/// Owned exclusively by the store once loaded; everything downstream only
/// borrows it for drawing.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: RgbaImage,
}

impl Frame {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decode from encoded bytes (PNG in the reference layout).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self {
            pixels: image.to_rgba8(),
        })
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA value at a pixel coordinate. Coordinates are clamped to the
    /// raster bounds so nearest-neighbour sampling never panics.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.pixels.width().saturating_sub(1));
        let y = y.min(self.pixels.height().saturating_sub(1));
        self.pixels.get_pixel(x, y).0
    }
}

/// Async frame loading seam: given a path, eventually yields a decoded
/// raster or fails. One call per frame, no retry.
#[allow(async_fn_in_trait)]
pub trait FrameLoader {
    async fn load(&self, path: &Path) -> Result<Frame>;
}

/// Loads frames from the filesystem and decodes them with the image crate.
#[derive(Debug, Clone, Default)]
pub struct FsFrameLoader;

impl FrameLoader for FsFrameLoader {
    async fn load(&self, path: &Path) -> Result<Frame> {
        let bytes = fs::read(path).await?;
        Frame::decode(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .unwrap();
        png
    }

    #[test]
    fn test_decode_reports_intrinsic_size() {
        let frame = Frame::decode(&solid_png(8, 5)).unwrap();
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 5);
        assert_eq!(frame.pixel(0, 0), [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Frame::decode(b"not a png").is_err());
    }

    #[test]
    fn test_pixel_sampling_is_clamped() {
        let frame = Frame::decode(&solid_png(4, 4)).unwrap();
        // Out-of-range coordinates sample the edge instead of panicking
        assert_eq!(frame.pixel(100, 100), [10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn test_fs_loader_missing_file() {
        let loader = FsFrameLoader;
        let result = loader.load(Path::new("/nonexistent/pigeon0000.png")).await;
        assert!(result.is_err());
    }
}
