//! Pointer position to frame index mapping.

/// Map a raw horizontal coordinate onto a frame index.
///
/// The coordinate is normalized against the viewport width, clamped to
/// `[0, 1]`, then floor-scaled over `frame_count - 1`, so the result is
/// always in `[0, frame_count - 1]`. Degenerate input (zero or negative
/// viewport width, non-finite values) maps to index 0 rather than letting
/// NaN or infinity propagate.
pub fn map_to_frame(raw_x: f64, viewport_width: f64, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    if viewport_width <= 0.0 || !viewport_width.is_finite() || !raw_x.is_finite() {
        return 0;
    }
    let normalized = (raw_x / viewport_width).clamp(0.0, 1.0);
    let index = (normalized * (frame_count - 1) as f64).floor() as usize;
    index.min(frame_count - 1)
}
