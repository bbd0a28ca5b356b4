//! The animation controller: load gates, input dispatch, render guard.
//!
//! One controller instance owns the store and the draw sink; whatever
//! composes the UI owns the controller and forwards host events to
//! [`AnimationController::handle_event`]. There is no global handle; the
//! debug affordances are plain methods on the instance.

use crate::canvas::Canvas;
use crate::loader::FrameLoader;
use crate::mapper::map_to_frame;
use crate::store::{FrameStore, LoadEvent};
use crate::{Result, ScrubConfig};
use serde::Serialize;
use tracing::debug;

/// Positional samples and surface events from the host.
///
/// Touch samples carry the first touch point's x-coordinate and are handled
/// exactly like pointer samples; suppressing default scrolling while
/// tracking is the host's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f64, viewport_width: f64 },
    TouchMove { x: f64, viewport_width: f64 },
    PointerLeave,
    Resize,
}

#[derive(Debug, Default)]
struct AnimationState {
    current: usize,
    ready: bool,
}

/// Read-only status snapshot for inspection and test harnesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub total: usize,
    pub loaded: usize,
    pub current: usize,
    pub ready: bool,
}

/// Drives the frame store and the draw sink from host events.
pub struct AnimationController<L, C> {
    store: FrameStore<L>,
    canvas: C,
    state: AnimationState,
}

impl<L: FrameLoader, C: Canvas> AnimationController<L, C> {
    pub fn new(config: ScrubConfig, loader: L, canvas: C) -> Result<Self> {
        Ok(Self {
            store: FrameStore::new(config, loader)?,
            canvas,
            state: AnimationState::default(),
        })
    }

    /// Load every frame and gate the controller.
    ///
    /// Two gates: as soon as frame 0 loads, the surface backing is sized to
    /// its intrinsic pixels and frame 0 is painted, well before the other
    /// loads finish; only once every load has settled do positional samples
    /// start being honored. `on_progress` observes `(loaded, total)` after
    /// each settle.
    pub async fn load_all<F>(&mut self, mut on_progress: F)
    where
        F: FnMut(usize, usize),
    {
        let Self { store, canvas, .. } = self;
        store
            .load_all(|event: LoadEvent<'_>| match event {
                LoadEvent::FirstFrame(frame) => {
                    canvas.resize_backing(frame.width(), frame.height());
                    canvas.fit_display();
                    canvas.clear();
                    canvas.draw(frame);
                }
                LoadEvent::Progress { loaded, total } => on_progress(loaded, total),
            })
            .await;
        self.state.ready = true;
        let (loaded, total) = self.store.progress();
        debug!("all frames settled: {}/{} loaded", loaded, total);
    }

    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, viewport_width }
            | InputEvent::TouchMove { x, viewport_width } => {
                // Samples are ignored until every load has settled
                if !self.state.ready {
                    return;
                }
                let target = map_to_frame(x, viewport_width, self.store.total());
                // High-frequency events: only redraw when the index changes
                if target != self.state.current {
                    self.state.current = target;
                    self.render();
                }
            }
            InputEvent::PointerLeave => {
                // Unconditional, even before the ready gate
                self.state.current = 0;
                self.render();
            }
            InputEvent::Resize => {
                self.reconfigure_surface();
                self.render();
            }
        }
    }

    /// Re-derive the backing size from frame 0 and re-issue the display
    /// stretch. Assets are never reloaded for a resize.
    fn reconfigure_surface(&mut self) {
        let Some(first) = self.store.get(0) else {
            return;
        };
        let (width, height) = (first.width(), first.height());
        self.canvas.resize_backing(width, height);
        self.canvas.fit_display();
    }

    /// Paint the current frame: clear, then draw stretched to the surface.
    /// Skips silently when the frame is still pending or failed.
    fn render(&mut self) {
        let Some(frame) = self.store.get(self.state.current) else {
            return;
        };
        self.canvas.clear();
        self.canvas.draw(frame);
    }

    /// Debug affordance: jump straight to a frame. Out-of-range indices are
    /// ignored; returns whether the jump happened.
    pub fn jump_to_frame(&mut self, index: usize) -> bool {
        if index >= self.store.total() {
            debug!("jump_to_frame({}) out of range", index);
            return false;
        }
        self.state.current = index;
        self.render();
        true
    }

    /// Debug affordance: read-only snapshot of the controller.
    pub fn status(&self) -> Status {
        let (loaded, total) = self.store.progress();
        Status {
            total,
            loaded,
            current: self.state.current,
            ready: self.state.ready,
        }
    }

    pub fn store(&self) -> &FrameStore<L> {
        &self.store
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Frame;
    use crate::store::tests::{test_config, StubLoader};

    /// Canvas that records every operation in order.
    #[derive(Debug, Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Backing(u32, u32),
        Fit,
        Clear,
        Draw(u32, u32),
    }

    impl RecordingCanvas {
        fn draws(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::Draw(..))).count()
        }
    }

    impl Canvas for RecordingCanvas {
        fn resize_backing(&mut self, width: u32, height: u32) {
            self.ops.push(Op::Backing(width, height));
        }
        fn fit_display(&mut self) {
            self.ops.push(Op::Fit);
        }
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }
        fn draw(&mut self, frame: &Frame) {
            self.ops.push(Op::Draw(frame.width(), frame.height()));
        }
    }

    async fn loaded_controller(
        frame_count: usize,
        loader: StubLoader,
    ) -> AnimationController<StubLoader, RecordingCanvas> {
        let mut controller =
            AnimationController::new(test_config(frame_count), loader, RecordingCanvas::default())
                .unwrap();
        controller.load_all(|_, _| {}).await;
        controller
    }

    #[tokio::test]
    async fn test_first_frame_sizes_surface_and_paints() {
        let controller = loaded_controller(5, StubLoader::ok(320, 240)).await;
        let ops = &controller.canvas().ops;
        assert_eq!(
            &ops[..4],
            &[
                Op::Backing(320, 240),
                Op::Fit,
                Op::Clear,
                Op::Draw(320, 240)
            ]
        );
    }

    #[tokio::test]
    async fn test_samples_ignored_before_ready() {
        let mut controller = AnimationController::new(
            test_config(125),
            StubLoader::ok(4, 4),
            RecordingCanvas::default(),
        )
        .unwrap();

        controller.handle_event(InputEvent::PointerMove {
            x: 900.0,
            viewport_width: 1000.0,
        });
        assert_eq!(controller.canvas().draws(), 0);
        assert_eq!(controller.status().current, 0);
        assert!(!controller.status().ready);
    }

    #[tokio::test]
    async fn test_ready_after_all_settled_even_with_failures() {
        let controller = loaded_controller(125, StubLoader::failing([57])).await;
        let status = controller.status();
        assert!(status.ready);
        assert_eq!(status.loaded, 124);
        assert_eq!(status.total, 125);
    }

    #[tokio::test]
    async fn test_move_maps_and_renders() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        let before = controller.canvas().draws();

        controller.handle_event(InputEvent::PointerMove {
            x: 500.0,
            viewport_width: 1000.0,
        });
        assert_eq!(controller.status().current, 62);
        assert_eq!(controller.canvas().draws(), before + 1);
    }

    #[tokio::test]
    async fn test_repeated_sample_renders_once() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        let before = controller.canvas().draws();

        let sample = InputEvent::PointerMove {
            x: 742.0,
            viewport_width: 1000.0,
        };
        controller.handle_event(sample);
        controller.handle_event(sample);
        // The second identical sample is a no-op
        assert_eq!(controller.canvas().draws(), before + 1);
    }

    #[tokio::test]
    async fn test_touch_move_behaves_like_pointer_move() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        controller.handle_event(InputEvent::TouchMove {
            x: 1000.0,
            viewport_width: 1000.0,
        });
        assert_eq!(controller.status().current, 124);
    }

    #[tokio::test]
    async fn test_pointer_leave_resets_and_renders() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        controller.handle_event(InputEvent::PointerMove {
            x: 800.0,
            viewport_width: 1000.0,
        });
        let before = controller.canvas().draws();

        controller.handle_event(InputEvent::PointerLeave);
        assert_eq!(controller.status().current, 0);
        assert_eq!(controller.canvas().draws(), before + 1);

        // Already at 0: still resets and still issues a draw
        controller.handle_event(InputEvent::PointerLeave);
        assert_eq!(controller.canvas().draws(), before + 2);
    }

    #[tokio::test]
    async fn test_pointer_leave_with_missing_frame_zero_skips_draw() {
        let mut controller = loaded_controller(4, StubLoader::failing([0])).await;
        let before = controller.canvas().draws();

        controller.handle_event(InputEvent::PointerLeave);
        assert_eq!(controller.status().current, 0);
        // The render guard suppressed the draw
        assert_eq!(controller.canvas().draws(), before);
    }

    #[tokio::test]
    async fn test_move_onto_failed_frame_skips_draw_but_moves_index() {
        let mut controller = loaded_controller(125, StubLoader::failing([62])).await;
        let before = controller.canvas().draws();

        controller.handle_event(InputEvent::PointerMove {
            x: 500.0,
            viewport_width: 1000.0,
        });
        assert_eq!(controller.status().current, 62);
        assert_eq!(controller.canvas().draws(), before);
    }

    #[tokio::test]
    async fn test_resize_reissues_backing_and_stretch() {
        let mut controller = loaded_controller(5, StubLoader::ok(320, 240)).await;
        controller.handle_event(InputEvent::Resize);

        let ops = &controller.canvas().ops;
        let tail = &ops[ops.len() - 4..];
        assert_eq!(
            tail,
            &[
                Op::Backing(320, 240),
                Op::Fit,
                Op::Clear,
                Op::Draw(320, 240)
            ]
        );
    }

    #[tokio::test]
    async fn test_degenerate_viewport_width_pins_to_frame_zero() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        controller.handle_event(InputEvent::PointerMove {
            x: 600.0,
            viewport_width: 1000.0,
        });
        controller.handle_event(InputEvent::PointerMove {
            x: 600.0,
            viewport_width: 0.0,
        });
        assert_eq!(controller.status().current, 0);
    }

    #[tokio::test]
    async fn test_jump_to_frame_bounds() {
        let mut controller = loaded_controller(125, StubLoader::ok(4, 4)).await;
        assert!(controller.jump_to_frame(77));
        assert_eq!(controller.status().current, 77);

        assert!(!controller.jump_to_frame(125));
        assert_eq!(controller.status().current, 77);
    }

    #[tokio::test]
    async fn test_status_serializes() {
        let controller = loaded_controller(5, StubLoader::ok(4, 4)).await;
        let json = serde_json::to_value(controller.status()).unwrap();
        assert_eq!(json["total"], 5);
        assert_eq!(json["loaded"], 5);
        assert_eq!(json["ready"], true);
    }

    #[tokio::test]
    async fn test_load_progress_callback() {
        let mut controller = AnimationController::new(
            test_config(6),
            StubLoader::ok(4, 4),
            RecordingCanvas::default(),
        )
        .unwrap();
        let mut seen = Vec::new();
        controller.load_all(|loaded, total| seen.push((loaded, total))).await;
        assert_eq!(seen.len(), 6);
        assert_eq!(seen.last(), Some(&(6, 6)));
    }
}
