//! Frame slot storage and the concurrent load pipeline.
//!
//! The store owns one slot per frame. Every slot starts Pending and settles
//! exactly once, to Loaded or Failed. All loads are issued at once and
//! processed in completion order on a single task; a failed frame is logged
//! and left permanently absent without disturbing its siblings.

use crate::loader::{Frame, FrameLoader};
use crate::{Result, ScrubConfig};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

/// Observable load state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug)]
enum SlotState {
    Pending,
    Loaded(Frame),
    Failed,
}

/// Events emitted while loads settle.
#[derive(Debug)]
pub enum LoadEvent<'a> {
    /// Slot 0 has loaded. Fired before the aggregate completes so the
    /// caller can size its surface and paint immediately.
    FirstFrame(&'a Frame),
    /// One more slot has settled (loaded or failed).
    Progress { loaded: usize, total: usize },
}

/// Owns the ordered frame sequence and materializes it concurrently.
pub struct FrameStore<L> {
    loader: L,
    config: ScrubConfig,
    slots: Vec<SlotState>,
    loaded: usize,
}

impl<L: FrameLoader> FrameStore<L> {
    /// Allocate `config.frame_count` Pending slots. The sequence length is
    /// fixed here and never changes afterwards.
    pub fn new(config: ScrubConfig, loader: L) -> Result<Self> {
        config.validate()?;
        let slots = (0..config.frame_count).map(|_| SlotState::Pending).collect();
        Ok(Self {
            loader,
            config,
            slots,
            loaded: 0,
        })
    }

    /// Issue one load per slot and process completions as they arrive.
    ///
    /// All loads are in flight together as interleaved async I/O on the
    /// calling task. A failure marks that slot Failed and is logged; it
    /// never aborts the siblings. `notify` observes the first-frame event
    /// and per-settle progress while the aggregate is still running.
    pub async fn load_all<F>(&mut self, mut notify: F)
    where
        F: for<'a> FnMut(LoadEvent<'a>),
    {
        let Self {
            loader,
            config,
            slots,
            loaded,
        } = self;
        let loader: &L = loader;
        let total = slots.len();

        let mut jobs: FuturesUnordered<_> = (0..total)
            .map(|index| {
                let path = config.frame_path(index);
                async move {
                    let result = loader.load(&path).await;
                    (index, path, result)
                }
            })
            .collect();

        let mut settled = 0usize;
        while let Some((index, path, result)) = jobs.next().await {
            settled += 1;
            match result {
                Ok(frame) => {
                    slots[index] = SlotState::Loaded(frame);
                    *loaded += 1;
                    if *loaded % 20 == 0 || *loaded == total {
                        debug!("loaded {}/{} frames", *loaded, total);
                    }
                    if index == 0 {
                        if let SlotState::Loaded(frame) = &slots[index] {
                            notify(LoadEvent::FirstFrame(frame));
                        }
                    }
                }
                Err(err) => {
                    warn!("failed to load frame {}: {}: {}", index, path.display(), err);
                    slots[index] = SlotState::Failed;
                }
            }
            notify(LoadEvent::Progress {
                loaded: *loaded,
                total,
            });
        }
        debug_assert_eq!(settled, total);
    }

    /// The slot's raster, only if it has loaded. Pending and Failed slots
    /// are absent; callers skip the render rather than crash.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        match self.slots.get(index) {
            Some(SlotState::Loaded(frame)) => Some(frame),
            _ => None,
        }
    }

    /// Whether frame `index` is drawable.
    pub fn is_loaded(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(SlotState::Loaded(_)))
    }

    /// Observable state of one slot.
    pub fn state(&self, index: usize) -> Option<LoadState> {
        self.slots.get(index).map(|slot| match slot {
            SlotState::Pending => LoadState::Pending,
            SlotState::Loaded(_) => LoadState::Loaded,
            SlotState::Failed => LoadState::Failed,
        })
    }

    /// Monotone `(loaded, total)` snapshot.
    pub fn progress(&self) -> (usize, usize) {
        (self.loaded, self.slots.len())
    }

    /// Sequence length, fixed at construction.
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }
}
