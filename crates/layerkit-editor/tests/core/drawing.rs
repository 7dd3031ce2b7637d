use layerkit_editor::{DrawStart, DrawingController, Point, Shape, Style, Tool};
use layerkit_settings::{DrawingSettings, ShapeLimits};

fn draw(tool: Tool, from: Point, to: Point) -> Option<Shape> {
    let mut controller = DrawingController::default();
    assert_eq!(
        controller.start_drawing(from, tool, &Style::default()),
        DrawStart::Started
    );
    controller.continue_drawing(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
    controller.finish_drawing(to).map(|l| l.shape)
}

#[test]
fn test_every_drag_tool_produces_its_kind() {
    let from = Point::new(10.0, 10.0);
    let to = Point::new(60.0, 50.0);
    for (tool, kind) in [
        (Tool::Rectangle, "rectangle"),
        (Tool::Textbox, "textbox"),
        (Tool::Callout, "callout"),
        (Tool::Blur, "blur"),
        (Tool::Circle, "circle"),
        (Tool::Ellipse, "ellipse"),
        (Tool::Polygon, "polygon"),
        (Tool::Star, "star"),
        (Tool::Line, "line"),
        (Tool::Arrow, "arrow"),
        (Tool::Path, "path"),
    ] {
        let shape = draw(tool, from, to).unwrap_or_else(|| panic!("{:?} discarded", tool));
        assert_eq!(shape.kind(), kind);
    }
}

#[test]
fn test_provisional_layer_follows_pointer() {
    let mut controller = DrawingController::default();
    controller.start_drawing(Point::new(0.0, 0.0), Tool::Circle, &Style::default());
    controller.continue_drawing(Point::new(3.0, 4.0));
    match controller.provisional_layer().map(|l| &l.shape) {
        Some(Shape::Circle { radius, .. }) => assert_eq!(*radius, 5.0),
        other => panic!("unexpected provisional {:?}", other),
    }
    assert!(controller.is_drawing());
    assert_eq!(controller.current_tool(), Some(Tool::Circle));
}

#[test]
fn test_second_start_is_ignored() {
    let mut controller = DrawingController::default();
    let style = Style::default();
    controller.start_drawing(Point::ORIGIN, Tool::Rectangle, &style);
    assert_eq!(
        controller.start_drawing(Point::ORIGIN, Tool::Circle, &style),
        DrawStart::Ignored
    );
    assert_eq!(controller.current_tool(), Some(Tool::Rectangle));
}

#[test]
fn test_constrained_line_snaps_to_45_degrees() {
    let mut controller = DrawingController::default();
    controller.set_constrain(true);
    controller.start_drawing(Point::ORIGIN, Tool::Line, &Style::default());
    let layer = controller.finish_drawing(Point::new(100.0, 90.0)).unwrap();
    let (a, b) = layer.shape.endpoints().unwrap();
    assert_eq!(a, Point::ORIGIN);
    assert!((b.x - b.y).abs() < 1e-9);
}

#[test]
fn test_polygon_uses_style_sides() {
    let style = Style {
        sides: 8,
        ..Style::default()
    };
    let mut controller = DrawingController::default();
    controller.start_drawing(Point::ORIGIN, Tool::Polygon, &style);
    match controller.finish_drawing(Point::new(20.0, 0.0)).map(|l| l.shape) {
        Some(Shape::Polygon { sides, radius, .. }) => {
            assert_eq!(sides, 8);
            assert_eq!(radius, 20.0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_callout_tail_clamped_to_box() {
    let mut controller =
        DrawingController::new(DrawingSettings::default(), ShapeLimits::default());
    controller.start_drawing(Point::ORIGIN, Tool::Callout, &Style::default());
    match controller.finish_drawing(Point::new(100.0, 10.0)).map(|l| l.shape) {
        Some(Shape::Callout { tail_width, .. }) => assert!((tail_width - 8.0).abs() < 1e-9),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_finished_layer_carries_style_and_fresh_id() {
    let style = Style {
        stroke: "#ff0000".to_string(),
        stroke_width: 4.0,
        ..Style::default()
    };
    let mut controller = DrawingController::default();
    controller.start_drawing(Point::ORIGIN, Tool::Rectangle, &style);
    let first = controller.finish_drawing(Point::new(20.0, 20.0)).unwrap();
    controller.start_drawing(Point::ORIGIN, Tool::Rectangle, &style);
    let second = controller.finish_drawing(Point::new(20.0, 20.0)).unwrap();
    assert_eq!(first.style, style);
    assert!(first.id.starts_with("layer_"));
    assert_ne!(first.id, second.id);
}

#[test]
fn test_cancel_returns_to_idle() {
    let mut controller = DrawingController::default();
    controller.start_drawing(Point::ORIGIN, Tool::Star, &Style::default());
    controller.cancel_drawing();
    assert!(!controller.is_drawing());
    assert!(controller.provisional_layer().is_none());
    assert!(controller.finish_drawing(Point::new(50.0, 50.0)).is_none());
}
