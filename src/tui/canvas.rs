//! Terminal-cell implementation of the draw sink.
//!
//! Each terminal cell shows two vertically stacked pixels via the upper
//! half block: foreground = top pixel, background = bottom pixel. The
//! backing resolution is the frame's intrinsic pixel size; the display
//! stretch maps it onto however many cells the container offers.

use crate::canvas::Canvas;
use crate::loader::Frame;
use ratatui::style::Color;

/// A cell raster the scrub view blits into the terminal buffer.
#[derive(Debug)]
pub struct TerminalCanvas {
    /// Available container size in cells (cols, rows).
    container: (u16, u16),
    /// Intrinsic pixel size of the sequence, fixed by the first frame.
    backing: Option<(u32, u32)>,
    /// Current display size in cells after the stretch.
    display: (u16, u16),
    /// (top, bottom) pixel colors per cell, row-major over `display`.
    cells: Vec<(Color, Color)>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            container: (cols, rows),
            backing: None,
            display: (0, 0),
            cells: Vec::new(),
        }
    }

    /// Update the available container size (terminal resize).
    pub fn set_container(&mut self, cols: u16, rows: u16) {
        self.container = (cols, rows);
    }

    pub fn container(&self) -> (u16, u16) {
        self.container
    }

    /// Display size in cells after the last stretch.
    pub fn display_size(&self) -> (u16, u16) {
        self.display
    }

    /// (top, bottom) colors for one display cell.
    pub fn cell(&self, col: u16, row: u16) -> Option<(Color, Color)> {
        if col >= self.display.0 || row >= self.display.1 {
            return None;
        }
        let index = row as usize * self.display.0 as usize + col as usize;
        self.cells.get(index).copied()
    }

    fn sample(frame: &Frame, px_x: u32, px_y: u32, px_cols: u32, px_rows: u32) -> Color {
        // Nearest neighbour over the stretched pixel grid
        let x = px_x * frame.width() / px_cols.max(1);
        let y = px_y * frame.height() / px_rows.max(1);
        let [r, g, b, a] = frame.pixel(x, y);
        if a < 8 {
            Color::Reset
        } else {
            Color::Rgb(r, g, b)
        }
    }
}

impl Canvas for TerminalCanvas {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing = Some((width, height));
    }

    fn fit_display(&mut self) {
        let Some((width, height)) = self.backing else {
            return;
        };
        let (cols, rows) = self.container;
        if cols == 0 || rows == 0 || width == 0 {
            self.display = (0, 0);
            self.cells.clear();
            return;
        }
        // Fill the container width; proportional height at two pixels per
        // cell row, clamped to the rows available.
        let px_w = cols as u32;
        let px_h = (px_w * height / width).max(1);
        let display_rows = (px_h.div_ceil(2)).min(rows as u32).max(1) as u16;
        self.display = (cols, display_rows);
        self.cells
            .resize(cols as usize * display_rows as usize, (Color::Reset, Color::Reset));
    }

    fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = (Color::Reset, Color::Reset);
        }
    }

    fn draw(&mut self, frame: &Frame) {
        let (cols, rows) = self.display;
        if cols == 0 || rows == 0 {
            return;
        }
        let px_rows = rows as u32 * 2;
        for row in 0..rows {
            for col in 0..cols {
                let top = Self::sample(frame, col as u32, row as u32 * 2, cols as u32, px_rows);
                let bottom =
                    Self::sample(frame, col as u32, row as u32 * 2 + 1, cols as u32, px_rows);
                self.cells[row as usize * cols as usize + col as usize] = (top, bottom);
            }
        }
    }
}
