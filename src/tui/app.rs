//! Interactive scrub viewer.
//!
//! Hosts the controller in a terminal: mouse movement across the terminal
//! width scrubs the sequence, focus loss acts as pointer-leave, terminal
//! resize re-stretches the display. The sequence is rendered as half-block
//! cells stretched to the terminal width.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Terminal,
};
use tracing::warn;

use crate::controller::{AnimationController, InputEvent};
use crate::loader::FsFrameLoader;
use crate::ScrubConfig;

use super::canvas::TerminalCanvas;
use super::widgets::{FrameImage, LoadingBar};

/// Terminal viewer application.
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: AnimationController<FsFrameLoader, TerminalCanvas>,
    should_quit: bool,
    show_status: bool,
}

impl App {
    /// Set up the terminal (raw mode, alternate screen, mouse capture) and
    /// build the controller over a terminal canvas. The bottom row is
    /// reserved for the status line.
    pub fn new(config: ScrubConfig) -> crate::Result<Self> {
        // Reject bad configs before the terminal is put into raw mode
        config.validate()?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        // Focus events only arrive while focus-change reporting is enabled;
        // pointer-leave is driven off FocusLost
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let size = terminal.size()?;
        let canvas = TerminalCanvas::new(size.width, size.height.saturating_sub(1));
        let controller = AnimationController::new(config, FsFrameLoader, canvas)?;

        Ok(Self {
            terminal,
            controller,
            should_quit: false,
            show_status: true,
        })
    }

    /// Load the sequence (with a progress screen), then run the event loop.
    pub async fn run(&mut self) -> crate::Result<()> {
        // Drain events queued during terminal setup
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read()?;
        }

        self.load_sequence().await?;
        // Entering the scrub view: stretch and paint the current frame
        self.controller.handle_event(InputEvent::Resize);

        let poll_timeout = Duration::from_millis(16);
        while !self.should_quit {
            self.draw()?;

            if event::poll(poll_timeout)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::FocusLost => self.controller.handle_event(InputEvent::PointerLeave),
                    Event::Resize(cols, rows) => {
                        self.controller
                            .canvas_mut()
                            .set_container(cols, rows.saturating_sub(1));
                        self.controller.handle_event(InputEvent::Resize);
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Drive the loads while redrawing the progress screen on each settle.
    async fn load_sequence(&mut self) -> crate::Result<()> {
        let Self {
            terminal,
            controller,
            ..
        } = self;
        let total = controller.store().total();
        draw_loading(terminal, 0, total)?;
        // Progress redraws are best-effort: the loads must keep settling
        // even if the terminal stops accepting draws, so log the first
        // failure once instead of bailing out mid-load.
        let mut draw_failed = false;
        controller
            .load_all(|loaded, total| {
                if let Err(err) = draw_loading(terminal, loaded, total) {
                    if !draw_failed {
                        draw_failed = true;
                        warn!("progress redraw failed, continuing load: {}", err);
                    }
                }
            })
            .await;
        Ok(())
    }

    fn draw(&mut self) -> crate::Result<()> {
        let Self {
            terminal,
            controller,
            show_status,
            ..
        } = self;
        let status = controller.status();
        terminal.draw(|f| {
            let area = f.area();
            if area.width == 0 || area.height == 0 {
                return;
            }
            let image_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            f.render_widget(FrameImage::new(controller.canvas()), image_area);

            if *show_status {
                let line = format!(
                    "frame {}/{} · loaded {}/{} · move mouse to scrub · ←/→ step · s status · q quit",
                    status.current,
                    status.total.saturating_sub(1),
                    status.loaded,
                    status.total,
                );
                let rect = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
                f.render_widget(
                    Paragraph::new(line).style(Style::default().fg(Color::DarkGray)),
                    rect,
                );
            }
        })?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('s') => self.show_status = !self.show_status,
            KeyCode::Left => {
                let current = self.controller.status().current;
                if current > 0 {
                    self.controller.jump_to_frame(current - 1);
                }
            }
            KeyCode::Right => {
                let current = self.controller.status().current;
                // Out-of-range jumps are ignored by the controller
                self.controller.jump_to_frame(current + 1);
            }
            KeyCode::Home => {
                self.controller.jump_to_frame(0);
            }
            KeyCode::End => {
                let total = self.controller.store().total();
                self.controller.jump_to_frame(total.saturating_sub(1));
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            // Plain movement scrubs; a held-button drag is the touch analog
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let (cols, _) = self.controller.canvas().container();
                // The rightmost column must map onto the last frame
                let viewport_width = cols.saturating_sub(1).max(1) as f64;
                let x = mouse.column as f64;
                let event = if matches!(mouse.kind, MouseEventKind::Drag(_)) {
                    InputEvent::TouchMove { x, viewport_width }
                } else {
                    InputEvent::PointerMove { x, viewport_width }
                };
                self.controller.handle_event(event);
            }
            _ => {}
        }
    }

}

// Best-effort terminal restore, so an error exit from `run` (or a panic
// unwinding through it) never leaves the terminal in raw mode.
impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            DisableFocusChange,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

fn draw_loading(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    loaded: usize,
    total: usize,
) -> io::Result<()> {
    terminal.draw(|f| {
        let area = f.area();
        if area.width < 4 || area.height < 2 {
            return;
        }
        let bar_width = (area.width.saturating_sub(10)).min(40) as usize;
        let progress = loaded as f32 / total.max(1) as f32;
        let text = vec![
            Line::from(format!("Loading frames {}/{}", loaded, total)),
            Line::from(LoadingBar::render(progress, bar_width)),
        ];
        let y = area.y + area.height / 2 - 1;
        let rect = Rect::new(area.x, y, area.width, 2);
        f.render_widget(Paragraph::new(text).centered(), rect);
    })?;
    Ok(())
}
