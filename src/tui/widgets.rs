//! Widgets for the scrub view.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use super::canvas::TerminalCanvas;

/// Blits the terminal canvas cell raster into the buffer, centered
/// horizontally. Each cell renders two pixels with the upper half block.
pub struct FrameImage<'a> {
    canvas: &'a TerminalCanvas,
}

impl<'a> FrameImage<'a> {
    pub fn new(canvas: &'a TerminalCanvas) -> Self {
        Self { canvas }
    }
}

impl Widget for FrameImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (cols, rows) = self.canvas.display_size();
        if cols == 0 || rows == 0 || area.width == 0 || area.height == 0 {
            return;
        }
        let x_offset = area.width.saturating_sub(cols) / 2;
        for row in 0..rows.min(area.height) {
            for col in 0..cols.min(area.width) {
                let Some((top, bottom)) = self.canvas.cell(col, row) else {
                    continue;
                };
                if top == Color::Reset && bottom == Color::Reset {
                    continue;
                }
                let x = area.x + x_offset + col;
                let y = area.y + row;
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol("▀")
                        .set_style(Style::default().fg(top).bg(bottom));
                }
            }
        }
    }
}

/// Block-character progress bar shown while the sequence loads.
pub struct LoadingBar;

impl LoadingBar {
    const FULL: char = '█';
    const EMPTY: char = '░';
    const PARTIAL: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    pub fn render(progress: f32, width: usize) -> String {
        let progress = progress.clamp(0.0, 1.0);
        let filled = (progress * width as f32) as usize;
        let partial_idx = ((progress * width as f32 - filled as f32) * 8.0) as usize;

        let mut bar = String::with_capacity(width);
        for i in 0..width {
            if i < filled {
                bar.push(Self::FULL);
            } else if i == filled && partial_idx > 0 {
                bar.push(Self::PARTIAL[partial_idx.min(7)]);
            } else {
                bar.push(Self::EMPTY);
            }
        }
        bar
    }
}
