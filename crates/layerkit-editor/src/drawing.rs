//! Shape creation state machine.
//!
//! One session at a time: `idle -> drawing -> idle`. A pointer press starts a
//! provisional layer anchored at the press point, moves reshape it, and the
//! release validates it against the minimum-size policy and hands it back.

use crate::geometry::{distance, snap_direction, Point};
use crate::model::{Layer, Shape, Style};
use layerkit_settings::{DrawingSettings, ShapeLimits};

/// Editor tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Select,
    Pan,
    Rectangle,
    Textbox,
    Callout,
    Blur,
    Circle,
    Ellipse,
    Polygon,
    Star,
    Line,
    Arrow,
    Path,
    Text,
}

impl Tool {
    /// Look up a tool by its host-facing name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Tool> {
        let tool = match name.trim().to_ascii_lowercase().as_str() {
            "select" | "pointer" => Tool::Select,
            "pan" | "hand" => Tool::Pan,
            "rectangle" | "rect" => Tool::Rectangle,
            "textbox" => Tool::Textbox,
            "callout" => Tool::Callout,
            "blur" => Tool::Blur,
            "circle" => Tool::Circle,
            "ellipse" => Tool::Ellipse,
            "polygon" => Tool::Polygon,
            "star" => Tool::Star,
            "line" => Tool::Line,
            "arrow" => Tool::Arrow,
            "path" | "pen" | "freehand" => Tool::Path,
            "text" => Tool::Text,
            _ => return None,
        };
        Some(tool)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pan => "pan",
            Tool::Rectangle => "rectangle",
            Tool::Textbox => "textbox",
            Tool::Callout => "callout",
            Tool::Blur => "blur",
            Tool::Circle => "circle",
            Tool::Ellipse => "ellipse",
            Tool::Polygon => "polygon",
            Tool::Star => "star",
            Tool::Line => "line",
            Tool::Arrow => "arrow",
            Tool::Path => "path",
            Tool::Text => "text",
        }
    }

    /// Tools that create a layer through a pointer drag.
    pub fn draws_shape(&self) -> bool {
        !matches!(self, Tool::Select | Tool::Pan | Tool::Text)
    }
}

/// Result of [`DrawingController::start_drawing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawStart {
    /// A provisional layer now follows the pointer.
    Started,
    /// One-shot text tool: the host should open text entry at this point.
    TextInput(Point),
    /// Nothing happened (non-drawing tool, or a session is already active).
    Ignored,
}

#[derive(Debug, Clone)]
enum DrawingState {
    Idle,
    Drawing {
        tool: Tool,
        anchor: Point,
        layer: Layer,
    },
}

/// Turns a press/move/release sequence into a committed layer.
#[derive(Debug, Clone)]
pub struct DrawingController {
    state: DrawingState,
    constrain: bool,
    settings: DrawingSettings,
    limits: ShapeLimits,
}

impl Default for DrawingController {
    fn default() -> Self {
        Self::new(DrawingSettings::default(), ShapeLimits::default())
    }
}

impl DrawingController {
    pub fn new(settings: DrawingSettings, limits: ShapeLimits) -> Self {
        Self {
            state: DrawingState::Idle,
            constrain: false,
            settings,
            limits,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// Tool of the active session.
    pub fn current_tool(&self) -> Option<Tool> {
        match &self.state {
            DrawingState::Drawing { tool, .. } => Some(*tool),
            DrawingState::Idle => None,
        }
    }

    /// The in-progress layer, for preview painting.
    pub fn provisional_layer(&self) -> Option<&Layer> {
        match &self.state {
            DrawingState::Drawing { layer, .. } => Some(layer),
            DrawingState::Idle => None,
        }
    }

    /// Shift held: squares, circles and 45-degree lines.
    pub fn set_constrain(&mut self, constrain: bool) {
        self.constrain = constrain;
    }

    pub fn constrain(&self) -> bool {
        self.constrain
    }

    pub fn start_drawing(&mut self, point: Point, tool: Tool, style: &Style) -> DrawStart {
        if self.is_drawing() {
            tracing::debug!("Drawing already in progress; ignoring start");
            return DrawStart::Ignored;
        }
        if tool == Tool::Text {
            return DrawStart::TextInput(point);
        }
        let Some(shape) = initial_shape(tool, point, style) else {
            return DrawStart::Ignored;
        };
        let layer = Layer::new(shape).with_style(style.clone());
        tracing::debug!("Drawing {} started at ({:.1}, {:.1})", tool.name(), point.x, point.y);
        self.state = DrawingState::Drawing {
            tool,
            anchor: point,
            layer,
        };
        DrawStart::Started
    }

    /// Like [`DrawingController::start_drawing`] for a tool given by name;
    /// unknown names are a no-op.
    pub fn start_drawing_named(&mut self, point: Point, tool: &str, style: &Style) -> DrawStart {
        match Tool::from_name(tool) {
            Some(tool) => self.start_drawing(point, tool, style),
            None => {
                tracing::debug!("Unknown drawing tool {:?}", tool);
                DrawStart::Ignored
            }
        }
    }

    /// Reshape the provisional layer for the current pointer position.
    pub fn continue_drawing(&mut self, point: Point) -> bool {
        let constrain = self.constrain;
        match &mut self.state {
            DrawingState::Drawing { anchor, layer, .. } => {
                let shape = reshape(&layer.shape, *anchor, point, constrain);
                layer.shape = shape;
                true
            }
            DrawingState::Idle => false,
        }
    }

    /// Final update, then validate. Returns the finished layer, or `None` when
    /// it is below the minimum size. Always returns to idle.
    pub fn finish_drawing(&mut self, point: Point) -> Option<Layer> {
        self.continue_drawing(point);
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        let DrawingState::Drawing { tool, mut layer, .. } = state else {
            return None;
        };

        layer.shape.normalize();
        self.apply_limits(&mut layer.shape);

        if validate_layer(&layer, self.settings.min_shape_size) {
            tracing::debug!("Drawing {} finished as {}", tool.name(), layer.id);
            Some(layer)
        } else {
            tracing::debug!("Discarding {} below minimum size", tool.name());
            None
        }
    }

    /// Discard the provisional layer.
    pub fn cancel_drawing(&mut self) {
        if self.is_drawing() {
            tracing::debug!("Drawing cancelled");
        }
        self.state = DrawingState::Idle;
    }

    fn apply_limits(&self, shape: &mut Shape) {
        match shape {
            Shape::Arrow {
                x1,
                y1,
                x2,
                y2,
                arrow_size,
                ..
            } => {
                let length = distance(Point::new(*x1, *y1), Point::new(*x2, *y2));
                *arrow_size = arrow_size.min(length * self.limits.arrow_head_max_ratio);
            }
            Shape::Callout {
                width,
                height,
                tail_width,
                ..
            } => {
                let max = width.min(*height) * self.limits.callout_tail_max_ratio;
                *tail_width = tail_width.min(max).max(0.0);
            }
            _ => {}
        }
    }
}

fn initial_shape(tool: Tool, at: Point, style: &Style) -> Option<Shape> {
    let Point { x, y } = at;
    let shape = match tool {
        Tool::Rectangle => Shape::Rectangle {
            x,
            y,
            width: 0.0,
            height: 0.0,
        },
        Tool::Textbox => Shape::Textbox {
            x,
            y,
            width: 0.0,
            height: 0.0,
            text: String::new(),
            font_size: style.font_size,
        },
        Tool::Callout => Shape::Callout {
            x,
            y,
            width: 0.0,
            height: 0.0,
            tail_x: x,
            tail_y: y,
            tail_width: 20.0,
            text: String::new(),
        },
        Tool::Blur => Shape::Blur {
            x,
            y,
            width: 0.0,
            height: 0.0,
        },
        Tool::Circle => Shape::Circle { x, y, radius: 0.0 },
        Tool::Ellipse => Shape::Ellipse {
            x,
            y,
            radius_x: 0.0,
            radius_y: 0.0,
        },
        Tool::Polygon => Shape::Polygon {
            x,
            y,
            radius: 0.0,
            sides: style.sides.max(3),
        },
        Tool::Star => Shape::Star {
            x,
            y,
            outer_radius: 0.0,
            inner_radius: 0.0,
            points: style.points.max(2),
        },
        Tool::Line => Shape::Line {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        },
        Tool::Arrow => Shape::Arrow {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
            arrow_size: style.arrow_size,
            arrow_style: style.arrow_style,
        },
        Tool::Path => Shape::Path { points: vec![at] },
        Tool::Select | Tool::Pan | Tool::Text => return None,
    };
    Some(shape)
}

/// Signed extent from anchor to point, squared off when constrained.
fn drag_extent(anchor: Point, point: Point, constrain: bool) -> (f64, f64) {
    let dx = point.x - anchor.x;
    let dy = point.y - anchor.y;
    if !constrain {
        return (dx, dy);
    }
    let side = dx.abs().max(dy.abs());
    (side.copysign(dx), side.copysign(dy))
}

fn reshape(shape: &Shape, anchor: Point, point: Point, constrain: bool) -> Shape {
    let mut next = shape.clone();
    match &mut next {
        Shape::Rectangle { width, height, .. }
        | Shape::Textbox { width, height, .. }
        | Shape::Blur { width, height, .. } => {
            (*width, *height) = drag_extent(anchor, point, constrain);
        }
        Shape::Callout {
            x,
            width,
            height,
            tail_x,
            tail_y,
            ..
        } => {
            (*width, *height) = drag_extent(anchor, point, constrain);
            *tail_x = *x + *width / 2.0;
            *tail_y = anchor.y.max(anchor.y + *height) + height.abs() * 0.5;
        }
        Shape::Circle { radius, .. } => *radius = distance(anchor, point),
        Shape::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        } => {
            let (dx, dy) = drag_extent(anchor, point, constrain);
            *x = anchor.x + dx / 2.0;
            *y = anchor.y + dy / 2.0;
            *radius_x = dx.abs() / 2.0;
            *radius_y = dy.abs() / 2.0;
        }
        Shape::Polygon { radius, .. } => *radius = distance(anchor, point),
        Shape::Star {
            outer_radius,
            inner_radius,
            ..
        } => {
            *outer_radius = distance(anchor, point);
            *inner_radius = *outer_radius / 2.0;
        }
        Shape::Line { x2, y2, .. } | Shape::Arrow { x2, y2, .. } => {
            let end = if constrain {
                snap_direction(anchor, point, 45.0)
            } else {
                point
            };
            *x2 = end.x;
            *y2 = end.y;
        }
        Shape::Path { points } => {
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        Shape::Text { .. } | Shape::Group { .. } => {}
    }
    next
}

/// Minimum-size policy for a finished layer.
///
/// Rectangle-like shapes need both sides at least `min_size`; circles,
/// polygons and stars need that radius; ellipses need either radius; lines and
/// arrows need that length; paths need two points. Other kinds always pass.
pub fn validate_layer(layer: &Layer, min_size: f64) -> bool {
    match &layer.shape {
        Shape::Rectangle { width, height, .. }
        | Shape::Textbox { width, height, .. }
        | Shape::Callout { width, height, .. }
        | Shape::Blur { width, height, .. } => width.abs() >= min_size && height.abs() >= min_size,
        Shape::Circle { radius, .. } | Shape::Polygon { radius, .. } => radius.abs() >= min_size,
        Shape::Ellipse {
            radius_x, radius_y, ..
        } => radius_x.abs() >= min_size || radius_y.abs() >= min_size,
        Shape::Star { outer_radius, .. } => outer_radius.abs() >= min_size,
        Shape::Line { .. } | Shape::Arrow { .. } => layer
            .shape
            .endpoints()
            .is_some_and(|(a, b)| distance(a, b) >= min_size),
        Shape::Path { points } => points.len() >= 2,
        Shape::Text { .. } | Shape::Group { .. } => true,
    }
}
