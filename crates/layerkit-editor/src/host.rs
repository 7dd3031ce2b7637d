//! Host collaborator hooks.
//!
//! The engine never paints, never owns a text field and never runs a clock.
//! Hosts plug those in by implementing the traits below; every method has a
//! no-op default, so a host overrides only the notifications it cares about.
//! Absent collaborators are skipped silently.

use crate::geometry::Point;
use crate::model::{Layer, Style};

/// Opaque token identifying one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Status line / toolbar notifications.
pub trait StatusSink {
    /// Called after every zoom change with the zoom as a percentage.
    fn zoom_changed(&mut self, _percent: u32) {}

    /// Called on every pointer event with the canvas position.
    fn cursor_moved(&mut self, _point: Point) {}
}

/// The external painter.
pub trait RenderSink {
    /// Repaint the committed layers, in array order.
    fn redraw(&mut self, _layers: &[Layer]) {}

    /// Paint the in-progress shape of an active drawing session.
    fn draw_provisional(&mut self, _layer: &Layer) {}
}

/// Host text entry, used by the one-shot text tool.
pub trait TextInputHandler {
    fn begin_text_input(&mut self, _point: Point, _style: &Style) {}
}

/// Cooperative frame callbacks (e.g. `requestAnimationFrame`).
///
/// Each requested frame must eventually be delivered to
/// `Canvas::on_animation_frame` with the returned handle, unless cancelled.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

/// The collaborators attached to one editor instance.
#[derive(Default)]
pub struct HostHooks {
    status: Option<Box<dyn StatusSink>>,
    render: Option<Box<dyn RenderSink>>,
    text_input: Option<Box<dyn TextInputHandler>>,
    scheduler: Option<Box<dyn FrameScheduler>>,
}

impl std::fmt::Debug for HostHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHooks")
            .field("status", &self.status.is_some())
            .field("render", &self.render.is_some())
            .field("text_input", &self.text_input.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}

impl HostHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, sink: impl StatusSink + 'static) -> Self {
        self.status = Some(Box::new(sink));
        self
    }

    pub fn with_render(mut self, sink: impl RenderSink + 'static) -> Self {
        self.render = Some(Box::new(sink));
        self
    }

    pub fn with_text_input(mut self, handler: impl TextInputHandler + 'static) -> Self {
        self.text_input = Some(Box::new(handler));
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn scheduler_mut(&mut self) -> Option<&mut dyn FrameScheduler> {
        match self.scheduler.as_mut() {
            Some(s) => Some(s.as_mut()),
            None => None,
        }
    }

    pub fn notify_zoom(&mut self, percent: u32) {
        match self.status.as_mut() {
            Some(s) => s.zoom_changed(percent),
            None => tracing::trace!("No status sink; zoom {}% not reported", percent),
        }
    }

    pub fn notify_cursor(&mut self, point: Point) {
        if let Some(s) = self.status.as_mut() {
            s.cursor_moved(point);
        }
    }

    pub fn request_redraw(&mut self, layers: &[Layer], provisional: Option<&Layer>) {
        match self.render.as_mut() {
            Some(r) => {
                r.redraw(layers);
                if let Some(layer) = provisional {
                    r.draw_provisional(layer);
                }
            }
            None => tracing::trace!("No render sink; redraw skipped"),
        }
    }

    pub fn begin_text_input(&mut self, point: Point, style: &Style) {
        match self.text_input.as_mut() {
            Some(t) => t.begin_text_input(point, style),
            None => tracing::trace!("No text input handler; text tool ignored"),
        }
    }
}
