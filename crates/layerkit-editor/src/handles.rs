//! Selection handles and handle hit-testing.
//!
//! Box-like selections get eight resize handles and one rotate handle; lines
//! and arrows get exactly two endpoint handles. Handle sizes are screen
//! pixels, so they are divided by the zoom to stay the same on screen.

use crate::geometry::{rotate_point, Bounds, Point};
use crate::model::Layer;
use layerkit_settings::TransformSettings;
use smallvec::SmallVec;

/// An interactive hit-target on a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    Rotate,
    LineStart,
    LineEnd,
}

impl Handle {
    /// The eight resize handles, clockwise from top-left.
    pub const RESIZE: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Handle::NorthWest | Handle::NorthEast | Handle::SouthEast | Handle::SouthWest
        )
    }

    pub fn is_endpoint(&self) -> bool {
        matches!(self, Handle::LineStart | Handle::LineEnd)
    }

    /// The handle that stays fixed while this one is dragged.
    pub fn opposite(&self) -> Option<Handle> {
        let h = match self {
            Handle::NorthWest => Handle::SouthEast,
            Handle::North => Handle::South,
            Handle::NorthEast => Handle::SouthWest,
            Handle::East => Handle::West,
            Handle::SouthEast => Handle::NorthWest,
            Handle::South => Handle::North,
            Handle::SouthWest => Handle::NorthEast,
            Handle::West => Handle::East,
            Handle::LineStart => Handle::LineEnd,
            Handle::LineEnd => Handle::LineStart,
            Handle::Rotate => return None,
        };
        Some(h)
    }

    pub(crate) fn moves_left(&self) -> bool {
        matches!(self, Handle::NorthWest | Handle::West | Handle::SouthWest)
    }

    pub(crate) fn moves_right(&self) -> bool {
        matches!(self, Handle::NorthEast | Handle::East | Handle::SouthEast)
    }

    pub(crate) fn moves_top(&self) -> bool {
        matches!(self, Handle::NorthWest | Handle::North | Handle::NorthEast)
    }

    pub(crate) fn moves_bottom(&self) -> bool {
        matches!(self, Handle::SouthWest | Handle::South | Handle::SouthEast)
    }

    /// Position of a resize handle on an unrotated box.
    fn position_on(&self, b: &Bounds) -> Point {
        let c = b.centre();
        match self {
            Handle::NorthWest => Point::new(b.x, b.y),
            Handle::North => Point::new(c.x, b.y),
            Handle::NorthEast => Point::new(b.right(), b.y),
            Handle::East => Point::new(b.right(), c.y),
            Handle::SouthEast => Point::new(b.right(), b.bottom()),
            Handle::South => Point::new(c.x, b.bottom()),
            Handle::SouthWest => Point::new(b.x, b.bottom()),
            Handle::West => Point::new(b.x, c.y),
            Handle::Rotate | Handle::LineStart | Handle::LineEnd => c,
        }
    }
}

/// A handle and its centre in the layout's local (unrotated) frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePosition {
    pub handle: Handle,
    pub centre: Point,
}

/// Handles of the current selection at the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleLayout {
    handles: SmallVec<[HandlePosition; 9]>,
    pivot: Point,
    rotation: f64,
    half_size: f64,
}

impl HandleLayout {
    /// Eight resize handles plus a rotate handle around `bounds`, rotated by
    /// `rotation` degrees about the box centre.
    pub fn for_bounds(
        bounds: Bounds,
        rotation: f64,
        zoom: f64,
        settings: &TransformSettings,
    ) -> Self {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        let mut handles: SmallVec<[HandlePosition; 9]> = Handle::RESIZE
            .iter()
            .map(|h| HandlePosition {
                handle: *h,
                centre: h.position_on(&bounds),
            })
            .collect();
        handles.push(HandlePosition {
            handle: Handle::Rotate,
            centre: Point::new(
                bounds.centre().x,
                bounds.y - settings.rotate_handle_offset / zoom,
            ),
        });
        Self {
            handles,
            pivot: bounds.centre(),
            rotation,
            half_size: settings.handle_size / zoom / 2.0,
        }
    }

    /// Two endpoint handles, no rotate handle.
    pub fn for_line(start: Point, end: Point, zoom: f64, settings: &TransformSettings) -> Self {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        let mut handles = SmallVec::new();
        handles.push(HandlePosition {
            handle: Handle::LineStart,
            centre: start,
        });
        handles.push(HandlePosition {
            handle: Handle::LineEnd,
            centre: end,
        });
        Self {
            handles,
            pivot: Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0),
            rotation: 0.0,
            half_size: settings.handle_size / zoom / 2.0,
        }
    }

    /// Layout for a single selected layer. Lines with a rotation fall back to
    /// box handles so the rotation stays editable.
    pub fn for_layer(
        layer: &Layer,
        layers: &[Layer],
        zoom: f64,
        settings: &TransformSettings,
    ) -> Option<Self> {
        if let Some((start, end)) = layer.shape.endpoints() {
            if layer.rotation == 0.0 {
                return Some(Self::for_line(start, end, zoom, settings));
            }
        }
        let bounds = crate::geometry::resolved_bounds(layer, layers)?;
        let rotation = if layer.is_group() { 0.0 } else { layer.rotation };
        Some(Self::for_bounds(bounds, rotation, zoom, settings))
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Side length of a handle in canvas units.
    pub fn handle_size(&self) -> f64 {
        self.half_size * 2.0
    }

    /// Handles with centres in canvas space (rotation applied), for painting.
    pub fn positions(&self) -> impl Iterator<Item = HandlePosition> + '_ {
        self.handles.iter().map(move |h| HandlePosition {
            handle: h.handle,
            centre: rotate_point(h.centre, self.pivot, self.rotation),
        })
    }

    /// First handle whose box contains `point`.
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let local = if self.rotation != 0.0 {
            rotate_point(point, self.pivot, -self.rotation)
        } else {
            point
        };
        self.handles
            .iter()
            .find(|h| {
                (local.x - h.centre.x).abs() <= self.half_size
                    && (local.y - h.centre.y).abs() <= self.half_size
            })
            .map(|h| h.handle)
    }
}
