//! Viewport and coordinate transformation for the editing surface.
//!
//! Handles conversion between device pixels, screen (CSS) pixels and logical
//! canvas coordinates, and owns zoom, pan and the eased zoom animation.
//!
//! ```text
//! screen = canvas * zoom + pan
//! canvas = (screen - pan) / zoom
//! screen = device / device_pixel_ratio
//! ```

mod animation;

pub use animation::{ease_out_cubic, AnimationStep, ZoomAnimation};

use std::fmt;

use crate::geometry::{union_bounds, Bounds, Point};
use crate::host::{FrameHandle, FrameScheduler};
use crate::model::Layer;
use layerkit_settings::ViewSettings;

/// Pan differences below this many screen pixels do not need animating.
const PAN_EPSILON: f64 = 0.5;

/// Zoom and pan state of one editor instance.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    user_has_set_zoom: bool,
    width: f64,
    height: f64,
    device_pixel_ratio: f64,
    settings: ViewSettings,
    animation: Option<ZoomAnimation>,
}

impl Viewport {
    /// Creates a viewport at 100% with no pan. Invalid view settings fall
    /// back to the defaults.
    pub fn new(settings: &ViewSettings) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings.clone(),
            Err(e) => {
                tracing::warn!("{}; using default view settings", e);
                ViewSettings::default()
            }
        };
        Self {
            zoom: 1.0_f64.clamp(settings.min_zoom, settings.max_zoom),
            pan_x: 0.0,
            pan_y: 0.0,
            user_has_set_zoom: false,
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 1.0,
            settings,
            animation: None,
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a whole percentage, for status lines.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn min_zoom(&self) -> f64 {
        self.settings.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.settings.max_zoom
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    /// Whether the user explicitly chose the current zoom (as opposed to an
    /// automatic fit).
    pub fn user_has_set_zoom(&self) -> bool {
        self.user_has_set_zoom
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Sets the visible area in screen pixels (typically on window resize).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        if ratio.is_finite() && ratio > 0.0 {
            self.device_pixel_ratio = ratio;
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.clamp(self.settings.min_zoom, self.settings.max_zoom)
    }

    fn apply_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Explicit user zoom: clamps, stops any animation and marks the zoom as
    /// user-chosen. Returns the applied zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.animation = None;
        self.apply_zoom(zoom);
        self.user_has_set_zoom = true;
        self.zoom
    }

    /// Programmatic zoom (pinch, fit): clamps but leaves `user_has_set_zoom`
    /// untouched.
    pub fn set_zoom_direct(&mut self, zoom: f64) -> f64 {
        self.animation = None;
        self.apply_zoom(zoom);
        self.zoom
    }

    /// Zooms by `delta` keeping `anchor` (screen pixels) stationary.
    ///
    /// Returns false, leaving pan untouched, when the zoom is already at the
    /// limit in the requested direction.
    pub fn zoom_by(&mut self, delta: f64, anchor: Point) -> bool {
        let new_zoom = self.clamp_zoom(self.zoom + delta);
        if new_zoom == self.zoom {
            return false;
        }
        let logical = self.screen_to_canvas(anchor);
        self.animation = None;
        self.zoom = new_zoom;
        self.pan_x = anchor.x - new_zoom * logical.x;
        self.pan_y = anchor.y - new_zoom * logical.y;
        self.user_has_set_zoom = true;
        true
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.animation = None;
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta in screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.animation = None;
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Converts screen pixels to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Converts canvas coordinates to screen pixels.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x,
            canvas.y * self.zoom + self.pan_y,
        )
    }

    /// Converts device (backing-store) pixels to canvas coordinates.
    pub fn device_to_canvas(&self, device: Point) -> Point {
        self.screen_to_canvas(Point::new(
            device.x / self.device_pixel_ratio,
            device.y / self.device_pixel_ratio,
        ))
    }

    /// Largest zoom at which a `width` x `height` box fits inside the
    /// viewport less padding.
    pub fn fitted_zoom(&self, width: f64, height: f64) -> f64 {
        let available_w = (self.width - self.settings.fit_padding).max(1.0);
        let available_h = (self.height - self.settings.fit_padding).max(1.0);
        self.clamp_zoom((available_w / width).min(available_h / height))
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&ZoomAnimation> {
        self.animation.as_ref()
    }

    /// Stops the in-flight animation and releases its frame request.
    pub fn cancel_animation(&mut self, scheduler: Option<&mut dyn FrameScheduler>) {
        if let Some(anim) = self.animation.take() {
            if let Some(s) = scheduler {
                s.cancel_frame(anim.handle);
            }
            tracing::debug!("Zoom animation cancelled");
        }
    }

    /// Animates towards `target` (clamped). Small changes, and hosts without a
    /// frame scheduler, get the target applied at once.
    ///
    /// Returns true when the zoom was applied immediately.
    pub fn smooth_zoom_to(
        &mut self,
        target: f64,
        scheduler: Option<&mut dyn FrameScheduler>,
    ) -> bool {
        let target = self.clamp_zoom(target);
        self.animate_to(target, None, scheduler)
    }

    /// One `zoom_step` in, animated. Counts as a user zoom.
    pub fn zoom_in(&mut self, scheduler: Option<&mut dyn FrameScheduler>) -> bool {
        self.user_has_set_zoom = true;
        let target = self.animation_target() + self.settings.zoom_step;
        self.smooth_zoom_to(target, scheduler)
    }

    /// One `zoom_step` out, animated. Counts as a user zoom.
    pub fn zoom_out(&mut self, scheduler: Option<&mut dyn FrameScheduler>) -> bool {
        self.user_has_set_zoom = true;
        let target = self.animation_target() - self.settings.zoom_step;
        self.smooth_zoom_to(target, scheduler)
    }

    /// Back to 100%, animated. Counts as a user zoom.
    pub fn reset_zoom(&mut self, scheduler: Option<&mut dyn FrameScheduler>) -> bool {
        self.user_has_set_zoom = true;
        self.smooth_zoom_to(1.0, scheduler)
    }

    /// Zoom the viewport is heading to: the in-flight target, else the
    /// current zoom. Repeated steps accumulate instead of restarting from a
    /// half-finished animation.
    fn animation_target(&self) -> f64 {
        self.animation
            .as_ref()
            .map_or(self.zoom, |a| a.target_zoom)
    }

    fn animate_to(
        &mut self,
        target_zoom: f64,
        target_pan: Option<(f64, f64)>,
        scheduler: Option<&mut dyn FrameScheduler>,
    ) -> bool {
        let previous = self.animation.take();
        let zoom_close = (target_zoom - self.zoom).abs() < self.settings.zoom_epsilon;
        let pan_close = target_pan.is_none_or(|(x, y)| {
            (x - self.pan_x).abs() < PAN_EPSILON && (y - self.pan_y).abs() < PAN_EPSILON
        });

        match scheduler {
            Some(s) if !(zoom_close && pan_close) => {
                if let Some(prev) = previous {
                    s.cancel_frame(prev.handle);
                }
                let handle = s.request_frame();
                tracing::debug!(
                    "Zoom animation {:.3} -> {:.3} ({:?})",
                    self.zoom,
                    target_zoom,
                    handle
                );
                self.animation = Some(ZoomAnimation {
                    start_zoom: self.zoom,
                    target_zoom,
                    start_pan: (self.pan_x, self.pan_y),
                    target_pan,
                    start_time: None,
                    duration_ms: self.settings.zoom_animation_ms,
                    handle,
                });
                false
            }
            scheduler => {
                if let (Some(prev), Some(s)) = (previous, scheduler) {
                    s.cancel_frame(prev.handle);
                }
                self.apply_zoom(target_zoom);
                if let Some((x, y)) = target_pan {
                    self.pan_x = x;
                    self.pan_y = y;
                }
                true
            }
        }
    }

    /// Advances the animation owning `handle`. Stale handles are ignored.
    ///
    /// Returns true when zoom or pan changed.
    pub fn on_animation_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        scheduler: Option<&mut dyn FrameScheduler>,
    ) -> bool {
        let step = match self.animation.as_mut() {
            Some(anim) if anim.handle == handle => anim.step(now_ms),
            Some(_) => {
                tracing::trace!("Ignoring stale animation frame {:?}", handle);
                return false;
            }
            None => return false,
        };

        self.apply_zoom(step.zoom);
        if let Some((x, y)) = step.pan {
            self.pan_x = x;
            self.pan_y = y;
        }

        if step.finished {
            self.animation = None;
            tracing::debug!("Zoom animation finished at {:.3}", self.zoom);
            return true;
        }

        match (scheduler, self.animation.as_mut()) {
            (Some(s), Some(anim)) => anim.handle = s.request_frame(),
            (None, Some(anim)) => {
                // Scheduler went away mid-flight: land on the target.
                let (zoom, pan) = (anim.target_zoom, anim.target_pan);
                self.animation = None;
                self.apply_zoom(zoom);
                if let Some((x, y)) = pan {
                    self.pan_x = x;
                    self.pan_y = y;
                }
            }
            _ => {}
        }
        true
    }

    /// Fits the background into the viewport less padding, resets pan to the
    /// origin and animates to the fitted zoom. No-op without a background.
    ///
    /// Returns the target zoom.
    pub fn fit_to_window(
        &mut self,
        background: Option<(f64, f64)>,
        scheduler: Option<&mut dyn FrameScheduler>,
    ) -> Option<f64> {
        let (bw, bh) = background?;
        let target = self.fitted_zoom(bw, bh);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.user_has_set_zoom = false;
        self.smooth_zoom_to(target, scheduler);
        Some(target)
    }

    /// Fits the union of visible layers, centred, animating zoom and pan
    /// together. Falls back to [`Viewport::fit_to_window`] when there is
    /// nothing to fit.
    pub fn zoom_to_fit_layers(
        &mut self,
        layers: &[Layer],
        background: Option<(f64, f64)>,
        scheduler: Option<&mut dyn FrameScheduler>,
    ) -> Option<f64> {
        let bounds = union_bounds(
            layers
                .iter()
                .filter(|l| l.visible && !l.is_group())
                .filter_map(Layer::bounds),
        );
        match bounds {
            Some(b) if !b.is_empty() => Some(self.fit_bounds(b, scheduler)),
            _ => self.fit_to_window(background, scheduler),
        }
    }

    fn fit_bounds(&mut self, b: Bounds, scheduler: Option<&mut dyn FrameScheduler>) -> f64 {
        let zoom = self.fitted_zoom(b.width, b.height);
        let pan = (
            (self.width - b.width * zoom) / 2.0 - b.x * zoom,
            (self.height - b.height * zoom) / 2.0 - b.y * zoom,
        );
        self.user_has_set_zoom = false;
        self.animate_to(zoom, Some(pan), scheduler);
        zoom
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewSettings::default())
    }
}
