// Progress bar: fill width, time labels, click-to-seek and drag-to-seek.

use crate::types::{BarBounds, Fraction};

/// Tracks the drag flag and computes seek targets for the progress bar.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    dragging: bool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        ProgressTracker { dragging: false }
    }

    /// Pointer pressed on the bar.
    pub fn press(&mut self) {
        self.dragging = true;
    }

    /// Pointer released anywhere on the document.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Seek target for a pointer movement, only while dragging.
    pub fn drag_target(&self, pointer_x: f64, bar: BarBounds, duration: f64) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        seek_target(pointer_x, bar, duration)
    }
}

/// Fill width in percent. `None` while the duration is unknown.
pub fn fill_percent(current_time: f64, duration: f64) -> Option<f64> {
    let percent = current_time / duration * 100.0;
    percent.is_finite().then_some(percent)
}

/// Time to seek to for a pointer at `pointer_x` over `bar`.
/// The fraction is clamped to `[0, 1]`; no target without a usable bar or duration.
pub fn seek_target(pointer_x: f64, bar: BarBounds, duration: f64) -> Option<f64> {
    if !duration.is_finite() {
        return None;
    }
    Fraction::along(pointer_x, bar).map(|f| f.as_f64() * duration)
}
