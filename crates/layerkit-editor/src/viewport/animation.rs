//! Eased zoom animation state.

use crate::host::FrameHandle;

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// An in-flight zoom (and optionally pan) animation.
///
/// The start time is taken from the first frame callback, so starting an
/// animation does not need a clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomAnimation {
    pub start_zoom: f64,
    pub target_zoom: f64,
    pub start_pan: (f64, f64),
    pub target_pan: Option<(f64, f64)>,
    pub start_time: Option<f64>,
    pub duration_ms: f64,
    pub handle: FrameHandle,
}

/// Values for one animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub zoom: f64,
    pub pan: Option<(f64, f64)>,
    pub finished: bool,
}

impl ZoomAnimation {
    /// Advance to `now_ms`, returning the eased values for this frame.
    pub fn step(&mut self, now_ms: f64) -> AnimationStep {
        let start = *self.start_time.get_or_insert(now_ms);
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
        };
        let eased = ease_out_cubic(progress);
        let zoom = self.start_zoom + (self.target_zoom - self.start_zoom) * eased;
        let pan = self.target_pan.map(|(tx, ty)| {
            let (sx, sy) = self.start_pan;
            (sx + (tx - sx) * eased, sy + (ty - sy) * eased)
        });
        AnimationStep {
            zoom,
            pan,
            finished: progress >= 1.0,
        }
    }
}
