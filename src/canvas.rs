//! The draw sink seam.
//!
//! The controller never talks to a concrete surface; it drives a [`Canvas`]
//! with the four operations the render path needs: fix the backing
//! resolution, stretch the display to the container, clear, draw.

use crate::loader::Frame;
use tracing::trace;

/// An opaque 2D raster sink.
///
/// The backing resolution is the pixel size the surface rasterizes at; the
/// display stretch scales that raster to fill the container. The two are
/// independent: resizing the container re-issues the stretch, never the
/// backing.
pub trait Canvas {
    /// Fix the backing resolution, in pixels.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Stretch the displayed surface to fill its container's width with
    /// proportional height.
    fn fit_display(&mut self);

    /// Clear the full drawing surface.
    fn clear(&mut self);

    /// Draw `frame` stretched to the surface's current dimensions.
    fn draw(&mut self, frame: &Frame);
}

/// A sink that swallows draws, keeping only counts. Used by headless mode
/// where the pipeline runs without any visible surface.
#[derive(Debug, Default)]
pub struct NullCanvas {
    backing: Option<(u32, u32)>,
    draw_calls: usize,
    clear_calls: usize,
}

impl NullCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backing(&self) -> Option<(u32, u32)> {
        self.backing
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls
    }
}

impl Canvas for NullCanvas {
    fn resize_backing(&mut self, width: u32, height: u32) {
        trace!("backing resized to {}x{}", width, height);
        self.backing = Some((width, height));
    }

    fn fit_display(&mut self) {}

    fn clear(&mut self) {
        self.clear_calls += 1;
    }

    fn draw(&mut self, frame: &Frame) {
        trace!("draw {}x{} frame", frame.width(), frame.height());
        self.draw_calls += 1;
    }
}
