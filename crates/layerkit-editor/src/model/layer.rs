//! Layer records and shape payloads.

use super::flags;
use super::style::{ArrowStyle, Style};
use crate::geometry::{self, Bounds, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_font_size() -> f64 {
    16.0
}

fn default_arrow_size() -> f64 {
    15.0
}

fn default_tail_width() -> f64 {
    20.0
}

fn default_sides() -> u32 {
    6
}

fn default_points() -> u32 {
    5
}

/// Geometry payload of a layer, tagged by `type` on the wire.
///
/// Rectangle-like kinds store a top-left corner and an extent that may be
/// negative while a pointer drag is in progress; [`Shape::normalize`] fixes
/// the sign at commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Shape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Textbox {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
    },
    Callout {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        tail_x: f64,
        tail_y: f64,
        #[serde(default = "default_tail_width")]
        tail_width: f64,
        #[serde(default)]
        text: String,
    },
    Blur {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    /// Centre plus radii.
    Ellipse {
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Polygon {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default = "default_sides")]
        sides: u32,
    },
    Star {
        x: f64,
        y: f64,
        #[serde(alias = "radius")]
        outer_radius: f64,
        #[serde(default)]
        inner_radius: f64,
        #[serde(default = "default_points")]
        points: u32,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Arrow {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default = "default_arrow_size")]
        arrow_size: f64,
        #[serde(default)]
        arrow_style: ArrowStyle,
    },
    Path {
        #[serde(default)]
        points: Vec<Point>,
    },
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        text: String,
    },
    Group {
        #[serde(default)]
        children: Vec<String>,
        #[serde(default = "flags::yes", deserialize_with = "flags::default_true")]
        expanded: bool,
    },
}

impl Shape {
    /// Wire name of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Textbox { .. } => "textbox",
            Shape::Callout { .. } => "callout",
            Shape::Blur { .. } => "blur",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Polygon { .. } => "polygon",
            Shape::Star { .. } => "star",
            Shape::Line { .. } => "line",
            Shape::Arrow { .. } => "arrow",
            Shape::Path { .. } => "path",
            Shape::Text { .. } => "text",
            Shape::Group { .. } => "group",
        }
    }

    /// Kinds stored as `x, y, width, height`.
    pub fn is_box(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle { .. } | Shape::Textbox { .. } | Shape::Callout { .. } | Shape::Blur { .. }
        )
    }

    /// Kinds manipulated through two endpoint handles.
    pub fn is_line(&self) -> bool {
        matches!(self, Shape::Line { .. } | Shape::Arrow { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group { .. })
    }

    /// Mutable access to the rectangle-like geometry.
    pub(crate) fn box_mut(&mut self) -> Option<(&mut f64, &mut f64, &mut f64, &mut f64)> {
        match self {
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
            } => Some((x, y, width, height)),
            _ => None,
        }
    }

    /// Endpoints of a line or arrow.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match *self {
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2, .. } => {
                Some((Point::new(x1, y1), Point::new(x2, y2)))
            }
            _ => None,
        }
    }

    pub(crate) fn set_endpoints(&mut self, start: Point, end: Point) {
        if let Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2, .. } = self {
            *x1 = start.x;
            *y1 = start.y;
            *x2 = end.x;
            *y2 = end.y;
        }
    }

    /// Move the shape by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Rectangle { x, y, .. }
            | Shape::Textbox { x, y, .. }
            | Shape::Blur { x, y, .. }
            | Shape::Circle { x, y, .. }
            | Shape::Ellipse { x, y, .. }
            | Shape::Polygon { x, y, .. }
            | Shape::Star { x, y, .. }
            | Shape::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Shape::Callout {
                x, y, tail_x, tail_y, ..
            } => {
                *x += dx;
                *y += dy;
                *tail_x += dx;
                *tail_y += dy;
            }
            Shape::Line { x1, y1, x2, y2 } | Shape::Arrow { x1, y1, x2, y2, .. } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
            Shape::Path { points } => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Shape::Group { .. } => {}
        }
    }

    /// Flip negative extents and radii to their positive equivalents.
    pub fn normalize(&mut self) {
        if let Some((x, y, width, height)) = self.box_mut() {
            if *width < 0.0 {
                *x += *width;
                *width = -*width;
            }
            if *height < 0.0 {
                *y += *height;
                *height = -*height;
            }
            return;
        }
        match self {
            Shape::Circle { radius, .. } | Shape::Polygon { radius, .. } => {
                *radius = radius.abs();
            }
            Shape::Ellipse {
                radius_x, radius_y, ..
            } => {
                *radius_x = radius_x.abs();
                *radius_y = radius_y.abs();
            }
            Shape::Star {
                outer_radius,
                inner_radius,
                ..
            } => {
                *outer_radius = outer_radius.abs();
                *inner_radius = inner_radius.abs();
            }
            _ => {}
        }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        let values: Vec<f64> = match self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            }
            | Shape::Blur {
                x,
                y,
                width,
                height,
            } => vec![*x, *y, *width, *height],
            Shape::Textbox {
                x,
                y,
                width,
                height,
                font_size,
                ..
            } => vec![*x, *y, *width, *height, *font_size],
            Shape::Callout {
                x,
                y,
                width,
                height,
                tail_x,
                tail_y,
                tail_width,
                ..
            } => vec![*x, *y, *width, *height, *tail_x, *tail_y, *tail_width],
            Shape::Circle { x, y, radius } | Shape::Polygon { x, y, radius, .. } => {
                vec![*x, *y, *radius]
            }
            Shape::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
            } => vec![*x, *y, *radius_x, *radius_y],
            Shape::Star {
                x,
                y,
                outer_radius,
                inner_radius,
                ..
            } => vec![*x, *y, *outer_radius, *inner_radius],
            Shape::Line { x1, y1, x2, y2 } => vec![*x1, *y1, *x2, *y2],
            Shape::Arrow {
                x1,
                y1,
                x2,
                y2,
                arrow_size,
                ..
            } => vec![*x1, *y1, *x2, *y2, *arrow_size],
            Shape::Path { points } => points.iter().flat_map(|p| [p.x, p.y]).collect(),
            Shape::Text { x, y, .. } => vec![*x, *y],
            Shape::Group { .. } => Vec::new(),
        };
        values.iter().all(|v| v.is_finite())
    }
}

/// One annotation in the editable set. Array position is z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(default = "flags::yes", deserialize_with = "flags::default_true")]
    pub visible: bool,
    #[serde(default, deserialize_with = "flags::default_false")]
    pub locked: bool,
    #[serde(
        default = "flags::full_opacity",
        deserialize_with = "flags::clamped_opacity"
    )]
    opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Layer {
    /// New layer with a freshly generated id.
    pub fn new(shape: Shape) -> Self {
        Self::with_id(Self::generate_id(), shape)
    }

    pub fn with_id(id: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            visible: true,
            locked: false,
            opacity: 1.0,
            rotation: 0.0,
            name: None,
            style: Style::default(),
            shape,
        }
    }

    /// `layer_<uuid>` identifier.
    pub fn generate_id() -> String {
        format!("layer_{}", Uuid::new_v4().simple())
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn kind(&self) -> &'static str {
        self.shape.kind()
    }

    pub fn is_group(&self) -> bool {
        self.shape.is_group()
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = flags::clamp_opacity(opacity);
    }

    /// Unrotated bounds of the shape. Groups have none of their own.
    pub fn bounds(&self) -> Option<Bounds> {
        geometry::shape_bounds(&self.shape, &self.style)
    }

    /// Rotation pivot: the centre of the unrotated bounds.
    pub fn centre(&self) -> Option<Point> {
        self.bounds().map(|b| b.centre())
    }

    /// Whether the layer can be hit, selected and transformed.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    /// Copy of the layer with normalized geometry.
    pub fn normalized(&self) -> Layer {
        let mut layer = self.clone();
        layer.shape.normalize();
        layer
    }

    /// Copy of the layer moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Layer {
        let mut layer = self.clone();
        layer.shape.translate(dx, dy);
        layer
    }
}
