//! The editor instance.
//!
//! A [`Canvas`] owns one document's layers together with every controller
//! that edits them. Hosts create one per editing surface, wire its
//! [`HostHooks`], and feed it input; there is no global editor state.

mod input;
mod operations;

use crate::drawing::{DrawingController, Tool};
use crate::geometry::{Bounds, Point};
use crate::handles::HandleLayout;
use crate::history::HistoryManager;
use crate::host::{FrameHandle, HostHooks};
use crate::input::Modifiers;
use crate::model::{BackgroundState, Layer, Style};
use crate::selection_manager::{selection_bounds, SelectionManager};
use crate::serialization::{layers_from_json, layers_to_json, validate_layers};
use crate::transform::TransformController;
use crate::viewport::Viewport;
use layerkit_core::Result;
use layerkit_settings::EditorSettings;
use serde_json::Value;

/// Description of the bottom history entry after loading.
pub const INITIAL_STATE: &str = "Initial state";

/// The pointer session currently in progress. At most one exists.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Session {
    Idle,
    Drawing,
    Transform,
    Marquee,
    Pan { last_screen: Point },
}

/// Canvas state: layers, controllers, viewport and host hooks.
#[derive(Debug)]
pub struct Canvas {
    layers: Vec<Layer>,
    selection: SelectionManager,
    viewport: Viewport,
    background: BackgroundState,
    drawing: DrawingController,
    transform: TransformController,
    history: HistoryManager,
    tool: Tool,
    style: Style,
    settings: EditorSettings,
    hooks: HostHooks,
    session: Session,
    modifiers: Modifiers,
    destroyed: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Canvas {
    /// Creates an empty canvas. Settings sections that fail validation fall
    /// back to their defaults.
    pub fn new(settings: EditorSettings) -> Self {
        let settings = settings.sanitized();
        let mut history = HistoryManager::new(&settings.history);
        history.reset(&[], INITIAL_STATE);
        Self {
            layers: Vec::new(),
            selection: SelectionManager::new(),
            viewport: Viewport::new(&settings.view),
            background: BackgroundState::new(),
            drawing: DrawingController::new(settings.drawing.clone(), settings.shapes.clone()),
            transform: TransformController::new(settings.transform.rotation_snap_degrees),
            history,
            tool: Tool::Select,
            style: Style::from_settings(&settings.drawing),
            settings,
            hooks: HostHooks::default(),
            session: Session::Idle,
            modifiers: Modifiers::NONE,
            destroyed: false,
        }
    }

    /// Creates a canvas holding `layers`, validated.
    pub fn with_layers(settings: EditorSettings, layers: Vec<Layer>) -> Result<Self> {
        let mut canvas = Self::new(settings);
        canvas.load_layers(layers)?;
        Ok(canvas)
    }

    pub fn with_hooks(mut self, hooks: HostHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn set_hooks(&mut self, hooks: HostHooks) {
        self.ensure_alive();
        self.hooks = hooks;
    }

    /// Replaces the document. History restarts from the loaded state and the
    /// selection is cleared.
    pub fn load_layers(&mut self, layers: Vec<Layer>) -> Result<()> {
        self.ensure_alive();
        validate_layers(&layers)?;
        self.cancel_session();
        tracing::info!("Loaded {} layers", layers.len());
        self.layers = layers;
        self.history.reset(&self.layers, INITIAL_STATE);
        self.selection.deselect_all();
        self.redraw();
        Ok(())
    }

    /// Parses, validates and loads a JSON layer array.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let layers = layers_from_json(json)?;
        self.load_layers(layers)
    }

    pub fn to_json(&self) -> Result<String> {
        layers_to_json(&self.layers)
    }

    /// Layers in z-order, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Deep copy of the layers for persistence.
    pub fn export_layers(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // Selection

    /// Selected ids in z-order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.ordered_ids(&self.layers)
    }

    /// Selects an existing layer. Returns false for unknown ids.
    pub fn select(&mut self, id: &str, additive: bool) -> bool {
        self.ensure_alive();
        if self.layer(id).is_none() {
            return false;
        }
        self.selection.select(id, additive);
        self.redraw();
        true
    }

    pub fn select_all(&mut self) {
        self.ensure_alive();
        self.selection.select_all(&self.layers);
        self.redraw();
    }

    pub fn deselect_all(&mut self) {
        self.ensure_alive();
        self.selection.deselect_all();
        self.redraw();
    }

    pub fn selection_bounds(&self) -> Option<Bounds> {
        selection_bounds(&self.layers, self.selection.ids())
    }

    /// Handles of the current selection. A single layer gets its own
    /// (possibly rotated or endpoint) handles; several share an axis-aligned
    /// box.
    pub fn handle_layout(&self) -> Option<HandleLayout> {
        let zoom = self.viewport.zoom();
        let transform = &self.settings.transform;
        if self.selection.len() == 1 {
            let id = self.selection.ids().next()?;
            let layer = self.layer(id)?;
            return HandleLayout::for_layer(layer, &self.layers, zoom, transform);
        }
        let bounds = self.selection_bounds()?;
        Some(HandleLayout::for_bounds(bounds, 0.0, zoom, transform))
    }

    /// Selection marquee being dragged, for painting.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        self.selection.marquee_rect()
    }

    // Background

    pub fn background(&self) -> &BackgroundState {
        &self.background
    }

    pub fn set_background_size(&mut self, width: f64, height: f64) {
        self.ensure_alive();
        self.background.set_size(width, height);
        self.redraw();
    }

    pub fn clear_background(&mut self) {
        self.ensure_alive();
        self.background.clear_size();
        self.redraw();
    }

    pub fn set_background_visible(&mut self, visible: bool) {
        self.ensure_alive();
        self.background.set_visible(visible);
        self.redraw();
    }

    /// Accepts the loosely typed flags hosts store (`true`, `1`, `"0"`).
    pub fn set_background_visible_value(&mut self, value: &Value) {
        self.ensure_alive();
        self.background.set_visible_value(value);
        self.redraw();
    }

    pub fn background_visible(&self) -> bool {
        self.background.visible()
    }

    pub fn set_background_opacity(&mut self, opacity: f64) {
        self.ensure_alive();
        self.background.set_opacity(opacity);
        self.redraw();
    }

    // Tools and style

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tool, abandoning any drawing in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ensure_alive();
        if self.session == Session::Drawing {
            self.cancel_session();
            self.redraw();
        }
        tracing::debug!("Tool set to {}", tool.name());
        self.tool = tool;
    }

    /// Switches tool by host-facing name. Unknown names are ignored.
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match Tool::from_name(name) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => {
                tracing::warn!("Unknown tool {:?} ignored", name);
                false
            }
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Style applied to shapes drawn from now on.
    pub fn set_style(&mut self, style: Style) {
        self.ensure_alive();
        self.style = style;
    }

    /// The shape being drawn, if any.
    pub fn provisional_layer(&self) -> Option<&Layer> {
        self.drawing.provisional_layer()
    }

    // History

    /// Reverts the last committed change. Any pointer session is cancelled
    /// first.
    pub fn undo(&mut self) -> bool {
        self.ensure_alive();
        self.cancel_session();
        match self.history.undo() {
            Some(layers) => {
                self.install(layers);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.ensure_alive();
        self.cancel_session();
        match self.history.redo() {
            Some(layers) => {
                self.install(layers);
                true
            }
            None => false,
        }
    }

    /// Groups the following changes into one history entry.
    pub fn start_batch(&mut self, description: &str) {
        self.ensure_alive();
        self.history.start_batch(description, &self.layers);
    }

    pub fn commit_batch(&mut self) -> bool {
        self.ensure_alive();
        self.history.commit_batch(&self.layers)
    }

    /// Abandons the batch and restores the layers it started from.
    pub fn cancel_batch(&mut self) -> bool {
        self.ensure_alive();
        match self.history.cancel_batch() {
            Some(snapshot) => {
                self.cancel_session();
                self.install(snapshot);
                true
            }
            None => false,
        }
    }

    /// Records the current layers as a history entry.
    pub fn save_state(&mut self, description: &str) {
        self.ensure_alive();
        self.history.save_state(description, &self.layers);
    }

    // Zoom and pan

    /// Explicit user zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.ensure_alive();
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        let applied = self.viewport.set_zoom(zoom);
        self.view_changed();
        applied
    }

    /// Programmatic zoom that does not count as a user choice.
    pub fn set_zoom_direct(&mut self, zoom: f64) -> f64 {
        self.ensure_alive();
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        let applied = self.viewport.set_zoom_direct(zoom);
        self.view_changed();
        applied
    }

    /// Zooms by `delta` keeping the canvas point `anchor` under the pointer.
    pub fn zoom_by(&mut self, delta: f64, anchor: Point) -> bool {
        self.ensure_alive();
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        let screen = self.viewport.canvas_to_screen(anchor);
        let changed = self.viewport.zoom_by(delta, screen);
        if changed {
            self.view_changed();
        }
        changed
    }

    pub fn zoom_in(&mut self) {
        self.ensure_alive();
        if self.viewport.zoom_in(self.hooks.scheduler_mut()) {
            self.view_changed();
        }
    }

    pub fn zoom_out(&mut self) {
        self.ensure_alive();
        if self.viewport.zoom_out(self.hooks.scheduler_mut()) {
            self.view_changed();
        }
    }

    pub fn reset_zoom(&mut self) {
        self.ensure_alive();
        if self.viewport.reset_zoom(self.hooks.scheduler_mut()) {
            self.view_changed();
        }
    }

    pub fn smooth_zoom_to(&mut self, target: f64) {
        self.ensure_alive();
        if self.viewport.smooth_zoom_to(target, self.hooks.scheduler_mut()) {
            self.view_changed();
        }
    }

    /// Fits the background into the viewport. No-op without a background.
    pub fn fit_to_window(&mut self) -> Option<f64> {
        self.ensure_alive();
        let target = self
            .viewport
            .fit_to_window(self.background.extent(), self.hooks.scheduler_mut())?;
        self.view_changed();
        Some(target)
    }

    /// Fits the visible layers, falling back to the background.
    pub fn zoom_to_fit_layers(&mut self) -> Option<f64> {
        self.ensure_alive();
        let target = self.viewport.zoom_to_fit_layers(
            &self.layers,
            self.background.extent(),
            self.hooks.scheduler_mut(),
        )?;
        self.view_changed();
        Some(target)
    }

    /// Pans by a screen-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.ensure_alive();
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        self.viewport.pan_by(dx, dy);
        self.redraw();
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.ensure_alive();
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        self.viewport.set_pan(x, y);
        self.redraw();
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.ensure_alive();
        self.viewport.set_viewport_size(width, height);
        self.redraw();
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.ensure_alive();
        self.viewport.set_device_pixel_ratio(ratio);
        self.redraw();
    }

    /// Frame callback from the host's scheduler. Returns true when the view
    /// changed.
    pub fn on_animation_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if self.destroyed {
            tracing::trace!("Frame {:?} after destroy ignored", handle);
            return false;
        }
        let changed = self
            .viewport
            .on_animation_frame(handle, now_ms, self.hooks.scheduler_mut());
        if changed {
            self.view_changed();
        }
        changed
    }

    /// Tears the instance down: stops the animation, ends any session and
    /// detaches the host hooks. Any further use panics.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.viewport.cancel_animation(self.hooks.scheduler_mut());
        self.cancel_session();
        self.hooks = HostHooks::default();
        self.destroyed = true;
        tracing::debug!("Canvas destroyed");
    }

    // Internal helpers

    fn ensure_alive(&self) {
        assert!(!self.destroyed, "Canvas used after destroy()");
    }

    /// Ends the active pointer session, restoring whatever it changed.
    /// Returns whether there was one.
    fn cancel_session(&mut self) -> bool {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => false,
            Session::Drawing => {
                self.drawing.cancel_drawing();
                true
            }
            Session::Transform => {
                self.transform.cancel(&mut self.layers);
                true
            }
            Session::Marquee => {
                self.selection.cancel_marquee_selection();
                true
            }
            Session::Pan { .. } => true,
        }
    }

    /// Replaces the layers with a history snapshot.
    fn install(&mut self, layers: Vec<Layer>) {
        self.layers = layers;
        self.selection.retain_existing(&self.layers);
        self.redraw();
    }

    /// Records a committed change and repaints.
    fn commit(&mut self, description: &str) {
        self.selection.retain_existing(&self.layers);
        self.history.save_state(description, &self.layers);
        self.redraw();
    }

    fn redraw(&mut self) {
        self.hooks
            .request_redraw(&self.layers, self.drawing.provisional_layer());
    }

    fn view_changed(&mut self) {
        self.hooks.notify_zoom(self.viewport.zoom_percent());
        self.redraw();
    }
}
