//! Pointer-driven move, resize and rotate sessions.
//!
//! A session snapshots every affected layer when it starts. Each pointer move
//! recomputes geometry from those snapshots and the drag-start point, so
//! errors never compound; cancelling writes the snapshots back.

use crate::geometry::{
    angle_degrees, normalize_degrees, rotate_point, rotate_vector, snap_direction, union_bounds,
    Bounds, Point,
};
use crate::handles::Handle;
use crate::model::{expand_ids, Layer, Shape};

/// What a session does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Resize(Handle),
    Rotate,
    Drag,
}

/// Result of finishing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub kind: TransformKind,
    /// Whether any geometry differs from the session start. Callers record
    /// history only when this is set.
    pub changed: bool,
    pub ids: Vec<String>,
}

/// A box whose edges may cross while a handle is dragged past its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Frame {
    fn from_bounds(b: &Bounds) -> Self {
        Self {
            left: b.x,
            top: b.y,
            right: b.right(),
            bottom: b.bottom(),
        }
    }

    fn centre(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    kind: TransformKind,
    start: Point,
    snapshots: Vec<Layer>,
    frame: Bounds,
    frame_rotation: f64,
    pivot: Point,
    start_angle: f64,
}

/// Owns at most one move/resize/rotate session.
#[derive(Debug, Clone)]
pub struct TransformController {
    session: Option<Session>,
    snap_degrees: f64,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(layerkit_core::constants::ROTATION_SNAP_DEGREES)
    }
}

impl TransformController {
    pub fn new(snap_degrees: f64) -> Self {
        Self {
            session: None,
            snap_degrees,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn kind(&self) -> Option<TransformKind> {
        self.session.as_ref().map(|s| s.kind)
    }

    /// Ids of the layers the active session moves.
    pub fn affected_ids(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|s| s.snapshots.iter().map(|l| l.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Begin resizing `ids` by `handle`. The rotate handle starts a rotation
    /// instead; endpoint handles require a single line or arrow.
    pub fn start_resize(
        &mut self,
        point: Point,
        handle: Handle,
        layers: &[Layer],
        ids: &[String],
    ) -> bool {
        if handle == Handle::Rotate {
            return self.start_rotation(point, layers, ids);
        }
        self.begin(TransformKind::Resize(handle), point, layers, ids)
    }

    pub fn start_rotation(&mut self, point: Point, layers: &[Layer], ids: &[String]) -> bool {
        self.begin(TransformKind::Rotate, point, layers, ids)
    }

    pub fn start_drag(&mut self, point: Point, layers: &[Layer], ids: &[String]) -> bool {
        self.begin(TransformKind::Drag, point, layers, ids)
    }

    fn begin(&mut self, kind: TransformKind, point: Point, layers: &[Layer], ids: &[String]) -> bool {
        if self.session.is_some() {
            tracing::debug!("Transform already active; ignoring {:?}", kind);
            return false;
        }
        let expanded = expand_ids(layers, ids);
        let snapshots: Vec<Layer> = layers
            .iter()
            .filter(|l| expanded.contains(&l.id) && !l.is_group() && !l.locked)
            .cloned()
            .collect();
        let Some(frame) = union_bounds(snapshots.iter().filter_map(Layer::bounds)) else {
            return false;
        };

        if let TransformKind::Resize(handle) = kind {
            if handle.is_endpoint() && (snapshots.len() != 1 || !snapshots[0].shape.is_line()) {
                return false;
            }
        }

        let frame_rotation = match (kind, snapshots.as_slice()) {
            (TransformKind::Resize(_), [only]) => only.rotation,
            _ => 0.0,
        };
        let pivot = frame.centre();
        tracing::debug!("Transform {:?} started on {} layer(s)", kind, snapshots.len());
        self.session = Some(Session {
            kind,
            start: point,
            snapshots,
            frame,
            frame_rotation,
            pivot,
            start_angle: angle_degrees(pivot, point),
        });
        true
    }

    /// Resize towards `point`. With `preserve_aspect`, corner handles scale
    /// both axes by the larger factor and edge handles scale the other axis
    /// about the centre. Endpoint handles snap to 45 degrees instead.
    pub fn handle_resize(&mut self, point: Point, preserve_aspect: bool, layers: &mut [Layer]) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let TransformKind::Resize(handle) = session.kind else {
            return;
        };

        let updated: Vec<Layer> = if handle.is_endpoint() {
            session
                .snapshots
                .iter()
                .map(|snap| move_endpoint(snap, handle, session.start, point, preserve_aspect))
                .collect()
        } else {
            let target = resize_frame(session, handle, point, preserve_aspect);
            session
                .snapshots
                .iter()
                .map(|snap| scale_layer(snap, handle, &session.frame, &target))
                .collect()
        };
        write_back(layers, updated);
    }

    /// Rotate by the angle swept around the pivot since the session started.
    /// `snap` rounds to the configured increment. Multi-selections also orbit
    /// each layer's centre around the shared pivot.
    pub fn handle_rotation(&mut self, point: Point, snap: bool, layers: &mut [Layer]) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.kind != TransformKind::Rotate {
            return;
        }
        let step = self.snap_degrees;
        let delta = angle_degrees(session.pivot, point) - session.start_angle;
        let multi = session.snapshots.len() > 1;

        let updated: Vec<Layer> = session
            .snapshots
            .iter()
            .map(|snap_layer| {
                let mut layer = snap_layer.clone();
                let applied = if multi {
                    let d = if snap { (delta / step).round() * step } else { delta };
                    if let Some(c) = snap_layer.centre() {
                        let moved = rotate_point(c, session.pivot, d);
                        layer.shape.translate(moved.x - c.x, moved.y - c.y);
                    }
                    snap_layer.rotation + d
                } else if snap {
                    ((snap_layer.rotation + delta) / step).round() * step
                } else {
                    snap_layer.rotation + delta
                };
                layer.rotation = normalize_degrees(applied);
                layer
            })
            .collect();
        write_back(layers, updated);
    }

    /// Translate by the pointer delta. `axis_lock` keeps only the dominant axis.
    pub fn handle_drag(&mut self, point: Point, axis_lock: bool, layers: &mut [Layer]) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.kind != TransformKind::Drag {
            return;
        }
        let mut dx = point.x - session.start.x;
        let mut dy = point.y - session.start.y;
        if axis_lock {
            if dx.abs() >= dy.abs() {
                dy = 0.0;
            } else {
                dx = 0.0;
            }
        }
        let updated = session
            .snapshots
            .iter()
            .map(|l| l.translated(dx, dy))
            .collect();
        write_back(layers, updated);
    }

    /// Normalize the affected layers and end the session.
    pub fn finish(&mut self, layers: &mut [Layer]) -> Option<TransformOutcome> {
        let session = self.session.take()?;
        let mut changed = false;
        for snap in &session.snapshots {
            if let Some(layer) = layers.iter_mut().find(|l| l.id == snap.id) {
                let normalized = layer.normalized();
                changed |= normalized != *snap;
                *layer = normalized;
            }
        }
        tracing::debug!("Transform {:?} finished (changed: {})", session.kind, changed);
        Some(TransformOutcome {
            kind: session.kind,
            changed,
            ids: session.snapshots.into_iter().map(|l| l.id).collect(),
        })
    }

    /// Restore the pre-session geometry and end the session.
    pub fn cancel(&mut self, layers: &mut [Layer]) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Transform {:?} cancelled", session.kind);
            write_back(layers, session.snapshots);
        }
    }
}

fn write_back(layers: &mut [Layer], updated: Vec<Layer>) {
    for layer in updated {
        if let Some(slot) = layers.iter_mut().find(|l| l.id == layer.id) {
            *slot = layer;
        }
    }
}

fn move_endpoint(
    snap: &Layer,
    handle: Handle,
    start: Point,
    point: Point,
    snap_angle: bool,
) -> Layer {
    let mut layer = snap.clone();
    let Some((a, b)) = snap.shape.endpoints() else {
        return layer;
    };
    let (dx, dy) = (point.x - start.x, point.y - start.y);
    let (a, b) = match handle {
        Handle::LineStart => {
            let moved = a.offset(dx, dy);
            (if snap_angle { snap_direction(b, moved, 45.0) } else { moved }, b)
        }
        _ => {
            let moved = b.offset(dx, dy);
            (a, if snap_angle { snap_direction(a, moved, 45.0) } else { moved })
        }
    };
    layer.shape.set_endpoints(a, b);
    layer
}

/// The frame after dragging `handle` to `point`, in canvas space.
fn resize_frame(session: &Session, handle: Handle, point: Point, preserve_aspect: bool) -> Frame {
    let f = session.frame;
    let (dx, dy) = rotate_vector(
        point.x - session.start.x,
        point.y - session.start.y,
        -session.frame_rotation,
    );

    let mut next = Frame::from_bounds(&f);
    if handle.moves_left() {
        next.left += dx;
    }
    if handle.moves_right() {
        next.right += dx;
    }
    if handle.moves_top() {
        next.top += dy;
    }
    if handle.moves_bottom() {
        next.bottom += dy;
    }

    if preserve_aspect && f.width > 0.0 && f.height > 0.0 {
        let sx = (next.right - next.left) / f.width;
        let sy = (next.bottom - next.top) / f.height;
        if handle.is_corner() {
            let s = sx.abs().max(sy.abs());
            let (sx, sy) = (s.copysign(sx), s.copysign(sy));
            if handle.moves_left() {
                next.left = next.right - f.width * sx;
            } else {
                next.right = next.left + f.width * sx;
            }
            if handle.moves_top() {
                next.top = next.bottom - f.height * sy;
            } else {
                next.bottom = next.top + f.height * sy;
            }
        } else if handle.moves_top() || handle.moves_bottom() {
            let half = f.width * sy.abs() / 2.0;
            let cx = f.centre().x;
            next.left = cx - half;
            next.right = cx + half;
        } else {
            let half = f.height * sx.abs() / 2.0;
            let cy = f.centre().y;
            next.top = cy - half;
            next.bottom = cy + half;
        }
    }

    if session.frame_rotation == 0.0 {
        return next;
    }
    // Rotated layers pivot on their own centre; shift the new box so the
    // anchored edge stays put on screen.
    let old_centre = f.centre();
    let new_centre = next.centre();
    let placed = rotate_point(new_centre, old_centre, session.frame_rotation);
    next.shifted(placed.x - new_centre.x, placed.y - new_centre.y)
}

/// Map `snap` from the `from` box onto the `to` frame. Shapes that scale
/// uniformly keep the edges facing away from `handle` where the frame puts
/// them.
fn scale_layer(snap: &Layer, handle: Handle, from: &Bounds, to: &Frame) -> Layer {
    let sx = if from.width > 0.0 {
        (to.right - to.left) / from.width
    } else {
        1.0
    };
    let sy = if from.height > 0.0 {
        (to.bottom - to.top) / from.height
    } else {
        1.0
    };
    let map = |p: Point| Point::new(to.left + (p.x - from.x) * sx, to.top + (p.y - from.y) * sy);
    let uniform = sx.abs().max(sy.abs());
    let anchored = |c: Point, r: f64| {
        let edge = |lo: f64, hi: f64, moves_lo: bool, moves_hi: bool, scale: f64, centre: f64| {
            let grown = r * uniform * scale.signum();
            if moves_hi {
                lo + grown
            } else if moves_lo {
                hi - grown
            } else {
                centre
            }
        };
        let lo = map(Point::new(c.x - r, c.y - r));
        let hi = map(Point::new(c.x + r, c.y + r));
        let mid = map(c);
        Point::new(
            edge(lo.x, hi.x, handle.moves_left(), handle.moves_right(), sx, mid.x),
            edge(lo.y, hi.y, handle.moves_top(), handle.moves_bottom(), sy, mid.y),
        )
    };

    let mut layer = snap.clone();
    let centre = snap.centre().map(map);
    match &mut layer.shape {
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        }
        | Shape::Textbox {
            x,
            y,
            width,
            height,
            ..
        }
        | Shape::Blur {
            x,
            y,
            width,
            height,
        } => {
            if let Some(c) = centre {
                *width *= sx;
                *height *= sy;
                *x = c.x - *width / 2.0;
                *y = c.y - *height / 2.0;
            }
        }
        Shape::Callout {
            x,
            y,
            width,
            height,
            tail_x,
            tail_y,
            ..
        } => {
            if let Some(c) = centre {
                let tail = map(Point::new(*tail_x, *tail_y));
                *width *= sx;
                *height *= sy;
                *x = c.x - *width / 2.0;
                *y = c.y - *height / 2.0;
                *tail_x = tail.x;
                *tail_y = tail.y;
            }
        }
        Shape::Circle { x, y, radius } | Shape::Polygon { x, y, radius, .. } => {
            let c = anchored(Point::new(*x, *y), radius.abs());
            *x = c.x;
            *y = c.y;
            *radius *= uniform;
        }
        Shape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        } => {
            let c = map(Point::new(*x, *y));
            *x = c.x;
            *y = c.y;
            *radius_x *= sx.abs();
            *radius_y *= sy.abs();
        }
        Shape::Star {
            x,
            y,
            outer_radius,
            inner_radius,
            ..
        } => {
            let c = anchored(Point::new(*x, *y), outer_radius.abs());
            *x = c.x;
            *y = c.y;
            *outer_radius *= uniform;
            *inner_radius *= uniform;
        }
        Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2, .. } => {
            let a = map(Point::new(*x1, *y1));
            let b = map(Point::new(*x2, *y2));
            (*x1, *y1, *x2, *y2) = (a.x, a.y, b.x, b.y);
        }
        Shape::Path { points } => {
            for p in points.iter_mut() {
                *p = map(*p);
            }
        }
        Shape::Text { x, y, .. } => {
            let p = map(Point::new(*x, *y));
            *x = p.x;
            *y = p.y;
            layer.style.font_size = (layer.style.font_size * sy.abs()).max(1.0);
        }
        Shape::Group { .. } => {}
    }
    layer
}
