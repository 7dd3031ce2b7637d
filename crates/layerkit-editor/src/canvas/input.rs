//! Pointer, keyboard and wheel routing.
//!
//! Points arrive in canvas coordinates. One pointer session (drawing,
//! transform, marquee or pan) runs at a time; a press while one is active is
//! ignored.

use super::{Canvas, Session};
use crate::drawing::{DrawStart, Tool};
use crate::geometry::Point;
use crate::input::{Key, Modifiers, PointerButton};
use crate::selection_manager::hit_layer;
use crate::transform::TransformKind;

impl Canvas {
    /// Records the modifier state for the following pointer moves.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn pointer_down(&mut self, point: Point, button: PointerButton, modifiers: Modifiers) {
        self.ensure_alive();
        self.modifiers = modifiers;
        self.hooks.notify_cursor(point);
        if self.session != Session::Idle {
            tracing::trace!("Pointer down ignored; {:?} in progress", self.session);
            return;
        }

        let pan_press = button == PointerButton::Primary && self.tool == Tool::Pan;
        if button == PointerButton::Middle || pan_press {
            self.session = Session::Pan {
                last_screen: self.viewport.canvas_to_screen(point),
            };
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        if self.tool == Tool::Select {
            self.pointer_down_select(point, modifiers);
            return;
        }

        self.drawing.set_constrain(modifiers.shift);
        match self.drawing.start_drawing(point, self.tool, &self.style) {
            DrawStart::Started => {
                self.session = Session::Drawing;
                self.redraw();
            }
            DrawStart::TextInput(at) => self.hooks.begin_text_input(at, &self.style),
            DrawStart::Ignored => {}
        }
    }

    fn pointer_down_select(&mut self, point: Point, modifiers: Modifiers) {
        if let Some(handle) = self.handle_layout().and_then(|l| l.hit_test(point)) {
            let ids = self.selection.ordered_ids(&self.layers);
            if self.transform.start_resize(point, handle, &self.layers, &ids) {
                self.session = Session::Transform;
                return;
            }
        }

        let tolerance = self.settings.transform.hit_tolerance / self.viewport.zoom();
        let hit = hit_layer(&self.layers, point, tolerance).map(|l| l.id.clone());
        match hit {
            Some(id) => {
                if self.selection.is_selected(&id) {
                    if modifiers.shift {
                        self.selection.select(&id, true);
                    }
                } else {
                    self.selection.select(&id, modifiers.shift);
                }
                if self.selection.is_selected(&id) {
                    let ids = self.selection.ordered_ids(&self.layers);
                    if self.transform.start_drag(point, &self.layers, &ids) {
                        self.session = Session::Transform;
                    }
                }
            }
            None => {
                self.selection.start_marquee_selection(point, modifiers.shift);
                self.session = Session::Marquee;
            }
        }
        self.redraw();
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.ensure_alive();
        self.hooks.notify_cursor(point);
        match self.session {
            Session::Idle => {}
            Session::Drawing => {
                self.drawing.set_constrain(self.modifiers.shift);
                self.drawing.continue_drawing(point);
                self.redraw();
            }
            Session::Transform => {
                self.update_transform(point);
                self.redraw();
            }
            Session::Marquee => {
                self.selection.update_marquee_selection(point, &self.layers);
                self.redraw();
            }
            Session::Pan { last_screen } => {
                let screen = self.viewport.canvas_to_screen(point);
                self.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                // Where the pointer sits on screen; the pan does not move it.
                self.session = Session::Pan { last_screen: screen };
            }
        }
    }

    fn update_transform(&mut self, point: Point) {
        let shift = self.modifiers.shift;
        match self.transform.kind() {
            Some(TransformKind::Resize(_)) => {
                self.transform.handle_resize(point, shift, &mut self.layers)
            }
            Some(TransformKind::Rotate) => {
                self.transform.handle_rotation(point, shift, &mut self.layers)
            }
            Some(TransformKind::Drag) => self.transform.handle_drag(point, shift, &mut self.layers),
            None => {}
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        self.ensure_alive();
        self.hooks.notify_cursor(point);
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle | Session::Pan { .. } => {}
            Session::Drawing => match self.drawing.finish_drawing(point) {
                Some(layer) => {
                    let id = layer.id.clone();
                    let description = format!("Draw {}", layer.kind());
                    self.layers.push(layer);
                    self.selection.select(&id, false);
                    self.commit(&description);
                }
                None => self.redraw(),
            },
            Session::Transform => {
                self.update_transform(point);
                let outcome = self.transform.finish(&mut self.layers);
                match outcome {
                    Some(outcome) if outcome.changed => {
                        let description = match outcome.kind {
                            TransformKind::Resize(_) => "Resize layers",
                            TransformKind::Rotate => "Rotate layers",
                            TransformKind::Drag => "Move layers",
                        };
                        self.commit(description);
                    }
                    _ => self.redraw(),
                }
            }
            Session::Marquee => {
                self.selection.update_marquee_selection(point, &self.layers);
                self.selection.finish_marquee_selection();
                self.redraw();
            }
        }
    }

    /// Keyboard shortcuts. Returns whether the key was handled.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.ensure_alive();
        self.modifiers = modifiers;
        let command = modifiers.command();
        match key {
            Key::Escape => {
                if self.cancel_session() {
                    self.redraw();
                } else if !self.selection.is_empty() {
                    self.deselect_all();
                }
                true
            }
            _ if self.session != Session::Idle => false,
            Key::Delete | Key::Backspace => self.delete_selected() > 0,
            Key::Char('z' | 'Z') if command && modifiers.shift => self.redo(),
            Key::Char('z' | 'Z') if command => self.undo(),
            Key::Char('y' | 'Y') if command => self.redo(),
            Key::Char('a' | 'A') if command => {
                self.select_all();
                true
            }
            Key::Char('d' | 'D') if command => !self.duplicate_selected().is_empty(),
            Key::Char('0') if command => self.fit_to_window().is_some(),
            Key::Char('0') => {
                self.reset_zoom();
                true
            }
            Key::Char('+' | '=') => {
                self.zoom_in();
                true
            }
            Key::Char('-' | '_') => {
                self.zoom_out();
                true
            }
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                let step = if modifiers.shift {
                    self.settings.transform.nudge_step_large
                } else {
                    self.settings.transform.nudge_step
                };
                let (dx, dy) = match key {
                    Key::ArrowUp => (0.0, -step),
                    Key::ArrowDown => (0.0, step),
                    Key::ArrowLeft => (-step, 0.0),
                    _ => (step, 0.0),
                };
                self.nudge_selected(dx, dy)
            }
            _ => false,
        }
    }

    /// Wheel: with Ctrl/Cmd zooms around `point`; otherwise scrolls, sideways
    /// with Shift.
    pub fn wheel(&mut self, point: Point, delta_y: f64, modifiers: Modifiers) {
        self.ensure_alive();
        self.hooks.notify_cursor(point);
        if delta_y == 0.0 {
            return;
        }
        if modifiers.command() {
            let step = self.viewport.settings().wheel_zoom_step;
            let delta = if delta_y < 0.0 { step } else { -step };
            self.zoom_by(delta, point);
        } else if modifiers.shift {
            self.pan_by(-delta_y, 0.0);
        } else {
            self.pan_by(0.0, -delta_y);
        }
    }
}
