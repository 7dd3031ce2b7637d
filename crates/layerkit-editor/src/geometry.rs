//! Geometry primitives shared by every controller.
//!
//! All functions are pure. Coordinates are logical canvas units with the
//! y axis pointing down; rotations are in degrees, clockwise on screen.

use crate::model::{Layer, Shape, Style};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Euclidean distance.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Rotate `p` about `centre` by `degrees`.
pub fn rotate_point(p: Point, centre: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - centre.x;
    let dy = p.y - centre.y;
    Point::new(
        centre.x + dx * cos - dy * sin,
        centre.y + dx * sin + dy * cos,
    )
}

/// Rotate a direction vector by `degrees`.
pub fn rotate_vector(dx: f64, dy: f64, degrees: f64) -> (f64, f64) {
    let p = rotate_point(Point::new(dx, dy), Point::ORIGIN, degrees);
    (p.x, p.y)
}

/// Angle of the vector `from -> to` in degrees.
pub fn angle_degrees(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// `point` moved onto the nearest `step_degrees` direction from `anchor`,
/// keeping its distance.
pub fn snap_direction(anchor: Point, point: Point, step_degrees: f64) -> Point {
    let length = distance(anchor, point);
    let step = step_degrees.to_radians();
    let angle = ((point.y - anchor.y).atan2(point.x - anchor.x) / step).round() * step;
    Point::new(anchor.x + length * angle.cos(), anchor.y + length * angle.sin())
}

/// Normalize an angle to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// An axis-aligned box. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Box from a corner and an extent of either sign.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self {
            x: min_x,
            y: min_y,
            width: a.x.max(b.x) - min_x,
            height: a.y.max(b.y) - min_y,
        }
    }

    /// Smallest box around all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_corners(
            Point::new(min_x, min_y),
            Point::new(max_x, max_y),
        ))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn centre(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_corners(
            Point::new(self.x.min(other.x), self.y.min(other.y)),
            Point::new(self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    /// Strict overlap test: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Union of any number of boxes.
pub fn union_bounds(bounds: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
    bounds.into_iter().reduce(|acc, b| acc.union(&b))
}

/// Rough single-line text extent.
fn text_extent(text: &str, font_size: f64) -> (f64, f64) {
    let chars = text.chars().count().max(1) as f64;
    (chars * font_size * 0.6, font_size * 1.2)
}

/// Unrotated bounds of a shape. Groups have no geometry of their own.
pub fn shape_bounds(shape: &Shape, style: &Style) -> Option<Bounds> {
    match shape {
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
        | Shape::Callout {
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
        } => Some(Bounds::new(*x, *y, *width, *height)),
        Shape::Circle { x, y, radius } | Shape::Polygon { x, y, radius, .. } => {
            let r = radius.abs();
            Some(Bounds::new(x - r, y - r, 2.0 * r, 2.0 * r))
        }
        Shape::Star {
            x, y, outer_radius, ..
        } => {
            let r = outer_radius.abs();
            Some(Bounds::new(x - r, y - r, 2.0 * r, 2.0 * r))
        }
        Shape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        } => {
            let (rx, ry) = (radius_x.abs(), radius_y.abs());
            Some(Bounds::new(x - rx, y - ry, 2.0 * rx, 2.0 * ry))
        }
        Shape::Line { .. } | Shape::Arrow { .. } => shape
            .endpoints()
            .map(|(a, b)| Bounds::from_corners(a, b)),
        Shape::Path { points } => Bounds::from_points(points),
        Shape::Text { x, y, text } => {
            let (w, h) = text_extent(text, style.font_size);
            Some(Bounds::new(*x, *y, w, h))
        }
        Shape::Group { .. } => None,
    }
}

/// Bounds of a layer, resolving groups to the union of their descendants.
pub fn resolved_bounds(layer: &Layer, layers: &[Layer]) -> Option<Bounds> {
    if !layer.is_group() {
        return layer.bounds();
    }
    let ids = crate::model::descendant_ids(layers, &layer.id);
    union_bounds(
        layers
            .iter()
            .filter(|l| !l.is_group() && ids.contains(&l.id))
            .filter_map(Layer::bounds),
    )
}

/// Vertices of a regular polygon, first vertex straight up.
pub fn regular_polygon_vertices(centre: Point, radius: f64, sides: u32) -> Vec<Point> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let angle = -PI / 2.0 + 2.0 * PI * f64::from(i) / f64::from(sides);
            Point::new(centre.x + radius * angle.cos(), centre.y + radius * angle.sin())
        })
        .collect()
}

/// Alternating outer/inner vertices of a star, first tip straight up.
pub fn star_vertices(centre: Point, outer: f64, inner: f64, points: u32) -> Vec<Point> {
    let points = points.max(2);
    let count = points * 2;
    (0..count)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -PI / 2.0 + PI * f64::from(i) / f64::from(points);
            Point::new(centre.x + r * angle.cos(), centre.y + r * angle.sin())
        })
        .collect()
}

/// Even-odd ray casting test.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shortest distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

fn near_outline(p: Point, vertices: &[Point], tolerance: f64) -> bool {
    let n = vertices.len();
    (0..n).any(|i| distance_to_segment(p, vertices[i], vertices[(i + 1) % n]) <= tolerance)
}

/// Whether `p` hits the layer body, within `tolerance` canvas units.
///
/// Rotated layers are tested in their own frame: `p` is rotated back about the
/// shape centre first. Groups never hit directly.
pub fn layer_contains_point(layer: &Layer, p: Point, tolerance: f64) -> bool {
    let local = match layer.centre() {
        Some(c) if layer.rotation != 0.0 => rotate_point(p, c, -layer.rotation),
        _ => p,
    };
    let line_tolerance = tolerance + layer.style.stroke_width / 2.0;

    match &layer.shape {
        Shape::Rectangle { .. }
        | Shape::Textbox { .. }
        | Shape::Blur { .. }
        | Shape::Text { .. } => layer
            .bounds()
            .is_some_and(|b| b.expand(tolerance).contains_point(local)),
        Shape::Callout {
            x,
            y,
            width,
            height,
            tail_x,
            tail_y,
            tail_width,
            ..
        } => {
            let body = Bounds::new(*x, *y, *width, *height);
            if body.expand(tolerance).contains_point(local) {
                return true;
            }
            let base = body.centre();
            let half = tail_width / 2.0;
            let tail = [
                Point::new(base.x - half, base.y),
                Point::new(base.x + half, base.y),
                Point::new(*tail_x, *tail_y),
            ];
            point_in_polygon(local, &tail) || near_outline(local, &tail, tolerance)
        }
        Shape::Circle { x, y, radius } => {
            distance(local, Point::new(*x, *y)) <= radius.abs() + tolerance
        }
        Shape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        } => {
            let rx = radius_x.abs() + tolerance;
            let ry = radius_y.abs() + tolerance;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let nx = (local.x - x) / rx;
            let ny = (local.y - y) / ry;
            nx * nx + ny * ny <= 1.0
        }
        Shape::Polygon {
            x,
            y,
            radius,
            sides,
        } => {
            let vertices = regular_polygon_vertices(Point::new(*x, *y), radius.abs(), *sides);
            point_in_polygon(local, &vertices) || near_outline(local, &vertices, tolerance)
        }
        Shape::Star {
            x,
            y,
            outer_radius,
            inner_radius,
            points,
        } => {
            let vertices = star_vertices(
                Point::new(*x, *y),
                outer_radius.abs(),
                inner_radius.abs(),
                *points,
            );
            point_in_polygon(local, &vertices) || near_outline(local, &vertices, tolerance)
        }
        Shape::Line { .. } | Shape::Arrow { .. } => layer
            .shape
            .endpoints()
            .is_some_and(|(a, b)| distance_to_segment(local, a, b) <= line_tolerance),
        Shape::Path { points } => match points.as_slice() {
            [] => false,
            [only] => distance(local, *only) <= line_tolerance,
            many => many
                .windows(2)
                .any(|w| distance_to_segment(local, w[0], w[1]) <= line_tolerance),
        },
        Shape::Group { .. } => false,
    }
}
