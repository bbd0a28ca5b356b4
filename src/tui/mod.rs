//! Terminal viewer for scrubbing a frame sequence with the mouse.

mod app;
mod canvas;
mod widgets;

pub use app::App;
pub use canvas::TerminalCanvas;
pub use widgets::{FrameImage, LoadingBar};
