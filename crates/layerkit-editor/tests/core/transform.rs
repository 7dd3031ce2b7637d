use layerkit_editor::{Handle, Layer, Point, Shape, TransformController, TransformKind};

fn rect(id: &str, x: f64, y: f64, width: f64, height: f64) -> Layer {
    Layer::with_id(
        id,
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        },
    )
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_circle_resize_scales_radius_and_centre() {
    let mut layers = vec![Layer::with_id(
        "c",
        Shape::Circle {
            x: 50.0,
            y: 50.0,
            radius: 10.0,
        },
    )];
    let mut controller = TransformController::default();
    assert!(controller.start_resize(
        Point::new(60.0, 60.0),
        Handle::SouthEast,
        &layers,
        &ids(&["c"])
    ));
    controller.handle_resize(Point::new(80.0, 80.0), false, &mut layers);
    let outcome = controller.finish(&mut layers).unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.kind, TransformKind::Resize(Handle::SouthEast));
    assert_eq!(
        layers[0].shape,
        Shape::Circle {
            x: 60.0,
            y: 60.0,
            radius: 20.0
        }
    );
}

#[test]
fn test_circle_uneven_corner_drag_keeps_opposite_corner() {
    let mut layers = vec![Layer::with_id(
        "c",
        Shape::Circle {
            x: 50.0,
            y: 50.0,
            radius: 10.0,
        },
    )];
    let mut controller = TransformController::default();
    controller.start_resize(
        Point::new(60.0, 60.0),
        Handle::SouthEast,
        &layers,
        &ids(&["c"]),
    );
    controller.handle_resize(Point::new(80.0, 60.0), false, &mut layers);
    controller.finish(&mut layers);
    let b = layers[0].bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (40.0, 40.0, 40.0, 40.0));
}

#[test]
fn test_star_north_west_drag_keeps_south_east_corner() {
    let mut layers = vec![Layer::with_id(
        "s",
        Shape::Star {
            x: 0.0,
            y: 0.0,
            outer_radius: 10.0,
            inner_radius: 5.0,
            points: 5,
        },
    )];
    let mut controller = TransformController::default();
    controller.start_resize(
        Point::new(-10.0, -10.0),
        Handle::NorthWest,
        &layers,
        &ids(&["s"]),
    );
    controller.handle_resize(Point::new(-10.0, -30.0), false, &mut layers);
    controller.finish(&mut layers);
    let b = layers[0].bounds().unwrap();
    assert_eq!((b.right(), b.bottom()), (10.0, 10.0));
    assert_eq!(b.width, 40.0);
}

#[test]
fn test_west_edge_resize_keeps_east_edge() {
    let mut layers = vec![rect("a", 0.0, 0.0, 100.0, 40.0)];
    let mut controller = TransformController::default();
    controller.start_resize(Point::new(0.0, 20.0), Handle::West, &layers, &ids(&["a"]));
    controller.handle_resize(Point::new(-50.0, 35.0), false, &mut layers);
    controller.finish(&mut layers);
    let b = layers[0].bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (-50.0, 0.0, 150.0, 40.0));
}

#[test]
fn test_multi_rotation_orbits_pivot() {
    let mut layers = vec![
        rect("a", 0.0, 0.0, 20.0, 20.0),
        rect("b", 40.0, 0.0, 20.0, 20.0),
    ];
    let mut controller = TransformController::default();
    assert!(controller.start_resize(
        Point::new(30.0, -20.0),
        Handle::Rotate,
        &layers,
        &ids(&["a", "b"])
    ));
    assert_eq!(controller.kind(), Some(TransformKind::Rotate));
    controller.handle_rotation(Point::new(60.0, 10.0), true, &mut layers);
    controller.finish(&mut layers);

    for layer in &layers {
        assert!(approx(layer.rotation, 90.0));
    }
    let a = layers[0].centre().unwrap();
    let b = layers[1].centre().unwrap();
    assert!(approx(a.x, 30.0) && approx(a.y, -10.0));
    assert!(approx(b.x, 30.0) && approx(b.y, 30.0));
}

#[test]
fn test_single_rotation_snaps_absolute_angle() {
    let mut layers = vec![rect("a", 0.0, 0.0, 20.0, 20.0).with_rotation(10.0)];
    let mut controller = TransformController::default();
    controller.start_rotation(Point::new(20.0, 10.0), &layers, &ids(&["a"]));
    // Sweep about 20 degrees: 10 + 20 = 30 lands on a snap step.
    let (sin, cos) = 20f64.to_radians().sin_cos();
    let target = Point::new(10.0 + 10.0 * cos, 10.0 + 10.0 * sin);
    controller.handle_rotation(target, true, &mut layers);
    assert!(approx(layers[0].rotation, 30.0));
    controller.handle_rotation(target, false, &mut layers);
    assert!(approx(layers[0].rotation, 30.0));
}

#[test]
fn test_line_endpoint_drag_with_snap() {
    let mut layers = vec![Layer::with_id(
        "l",
        Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 0.0,
        },
    )];
    let mut controller = TransformController::default();
    assert!(controller.start_resize(
        Point::new(100.0, 0.0),
        Handle::LineEnd,
        &layers,
        &ids(&["l"])
    ));
    controller.handle_resize(Point::new(100.0, 50.0), false, &mut layers);
    assert_eq!(
        layers[0].shape.endpoints(),
        Some((Point::ORIGIN, Point::new(100.0, 50.0)))
    );

    controller.handle_resize(Point::new(100.0, 90.0), true, &mut layers);
    let (start, end) = layers[0].shape.endpoints().unwrap();
    assert_eq!(start, Point::ORIGIN);
    assert!(approx(end.x, end.y));
}

#[test]
fn test_endpoint_handle_refused_for_boxes() {
    let layers = vec![rect("a", 0.0, 0.0, 20.0, 20.0)];
    let mut controller = TransformController::default();
    assert!(!controller.start_resize(Point::ORIGIN, Handle::LineStart, &layers, &ids(&["a"])));
    assert!(!controller.is_active());
}

#[test]
fn test_drag_axis_lock_and_cancel() {
    let mut layers = vec![rect("a", 0.0, 0.0, 20.0, 20.0)];
    let original = layers.clone();
    let mut controller = TransformController::default();
    controller.start_drag(Point::new(10.0, 10.0), &layers, &ids(&["a"]));
    controller.handle_drag(Point::new(40.0, 18.0), true, &mut layers);
    assert_eq!(layers[0].bounds().map(|b| (b.x, b.y)), Some((30.0, 0.0)));
    assert_eq!(controller.affected_ids(), vec!["a"]);

    controller.cancel(&mut layers);
    assert_eq!(layers, original);
    assert!(controller.finish(&mut layers).is_none());
}

#[test]
fn test_group_drag_moves_children_only() {
    let mut locked = rect("locked", 50.0, 0.0, 10.0, 10.0);
    locked.locked = true;
    let mut layers = vec![
        rect("a", 0.0, 0.0, 10.0, 10.0),
        locked,
        Layer::with_id(
            "g",
            Shape::Group {
                children: ids(&["a", "locked"]),
                expanded: true,
            },
        ),
    ];
    let mut controller = TransformController::default();
    assert!(controller.start_drag(Point::ORIGIN, &layers, &ids(&["g"])));
    assert_eq!(controller.affected_ids(), vec!["a"]);
    controller.handle_drag(Point::new(5.0, 5.0), false, &mut layers);
    let outcome = controller.finish(&mut layers).unwrap();
    assert_eq!(outcome.ids, vec!["a"]);
    assert_eq!(layers[0].bounds().map(|b| (b.x, b.y)), Some((5.0, 5.0)));
    assert_eq!(layers[1].bounds().map(|b| (b.x, b.y)), Some((50.0, 0.0)));
}

#[test]
fn test_second_session_is_refused() {
    let layers = vec![rect("a", 0.0, 0.0, 20.0, 20.0)];
    let mut controller = TransformController::default();
    assert!(controller.start_drag(Point::ORIGIN, &layers, &ids(&["a"])));
    assert!(!controller.start_rotation(Point::ORIGIN, &layers, &ids(&["a"])));
    assert_eq!(controller.kind(), Some(TransformKind::Drag));
}
