use layerkit_core::{shared, SharedVec};
use layerkit_editor::{
    Canvas, Key, Layer, Modifiers, Point, PointerButton, Shape, Style, TextInputHandler, Tool,
};
use layerkit_settings::EditorSettings;

const PRIMARY: PointerButton = PointerButton::Primary;

struct TextRequests(SharedVec<Point>);

impl TextInputHandler for TextRequests {
    fn begin_text_input(&mut self, point: Point, _style: &Style) {
        self.0.borrow_mut().push(point);
    }
}

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

fn canvas_with(layers: Vec<Layer>) -> Canvas {
    Canvas::with_layers(EditorSettings::default(), layers).unwrap()
}

fn drag(canvas: &mut Canvas, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
    let to = Point::new(to.0, to.1);
    canvas.pointer_down(Point::new(from.0, from.1), PRIMARY, modifiers);
    canvas.pointer_move(to);
    canvas.pointer_up(to);
}

fn bounds_of(canvas: &Canvas, id: &str) -> (f64, f64, f64, f64) {
    let b = canvas.layer(id).and_then(|l| l.bounds()).unwrap();
    (b.x, b.y, b.width, b.height)
}

#[test]
fn test_draw_rectangle_commits_and_selects() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Rectangle);
    drag(&mut canvas, (60.0, 40.0), (10.0, 10.0), Modifiers::NONE);

    assert_eq!(canvas.layers().len(), 1);
    let layer = &canvas.layers()[0];
    assert_eq!(layer.bounds().map(|b| (b.x, b.y)), Some((10.0, 10.0)));
    assert_eq!(canvas.selected_ids(), vec![layer.id.clone()]);
    assert_eq!(canvas.history().undo_description(), Some("Draw rectangle"));
    assert!(canvas.provisional_layer().is_none());
}

#[test]
fn test_tiny_drawing_is_discarded() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Circle);
    drag(&mut canvas, (10.0, 10.0), (12.0, 11.0), Modifiers::NONE);
    assert!(canvas.layers().is_empty());
    assert_eq!(canvas.history().len(), 1);
}

#[test]
fn test_shift_draws_square() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Rectangle);
    drag(&mut canvas, (0.0, 0.0), (80.0, 30.0), Modifiers::SHIFT);
    let id = canvas.layers()[0].id.clone();
    assert_eq!(bounds_of(&canvas, &id), (0.0, 0.0, 80.0, 80.0));
}

#[test]
fn test_provisional_layer_visible_mid_drag() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Ellipse);
    canvas.pointer_down(Point::new(0.0, 0.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(40.0, 20.0));
    assert_eq!(canvas.provisional_layer().map(|l| l.kind()), Some("ellipse"));
    assert!(canvas.layers().is_empty());
}

#[test]
fn test_escape_cancels_drawing() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Rectangle);
    canvas.pointer_down(Point::new(0.0, 0.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(50.0, 50.0));
    assert!(canvas.key_down(Key::Escape, Modifiers::NONE));
    canvas.pointer_up(Point::new(50.0, 50.0));
    assert!(canvas.layers().is_empty());
    assert!(canvas.provisional_layer().is_none());
}

#[test]
fn test_switching_tool_abandons_drawing() {
    let mut canvas = Canvas::default();
    canvas.set_tool(Tool::Line);
    canvas.pointer_down(Point::new(0.0, 0.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(50.0, 0.0));
    canvas.set_tool(Tool::Select);
    canvas.pointer_up(Point::new(50.0, 0.0));
    assert!(canvas.layers().is_empty());
}

#[test]
fn test_text_tool_asks_host_for_text() {
    let requests = shared(Vec::new());
    let hooks = layerkit_editor::HostHooks::new().with_text_input(TextRequests(requests.clone()));
    let mut canvas = Canvas::default().with_hooks(hooks);
    canvas.set_tool(Tool::Text);
    canvas.pointer_down(Point::new(15.0, 25.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_up(Point::new(15.0, 25.0));
    assert_eq!(*requests.borrow(), vec![Point::new(15.0, 25.0)]);
    assert!(canvas.layers().is_empty());

    let id = canvas.add_text(Point::new(15.0, 25.0), "Hello").unwrap();
    assert_eq!(canvas.layer(&id).map(|l| l.kind()), Some("text"));
    assert_eq!(canvas.add_text(Point::ORIGIN, "   "), None);
}

#[test]
fn test_click_selects_and_drag_moves() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 50.0)]);
    drag(&mut canvas, (50.0, 25.0), (80.0, 45.0), Modifiers::NONE);
    assert_eq!(canvas.selected_ids(), vec!["a"]);
    assert_eq!(bounds_of(&canvas, "a"), (30.0, 20.0, 100.0, 50.0));
    assert_eq!(canvas.history().undo_description(), Some("Move layers"));

    assert!(canvas.undo());
    assert_eq!(bounds_of(&canvas, "a"), (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_click_without_moving_records_nothing() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 50.0)]);
    drag(&mut canvas, (50.0, 25.0), (50.0, 25.0), Modifiers::NONE);
    assert_eq!(canvas.selected_ids(), vec!["a"]);
    assert_eq!(canvas.history().len(), 1);
}

#[test]
fn test_shift_click_toggles_selection() {
    let mut canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 50.0, 50.0),
        rect("b", 100.0, 0.0, 50.0, 50.0),
    ]);
    drag(&mut canvas, (25.0, 25.0), (25.0, 25.0), Modifiers::NONE);
    drag(&mut canvas, (125.0, 25.0), (125.0, 25.0), Modifiers::SHIFT);
    assert_eq!(canvas.selected_ids(), vec!["a", "b"]);
    drag(&mut canvas, (25.0, 25.0), (25.0, 25.0), Modifiers::SHIFT);
    assert_eq!(canvas.selected_ids(), vec!["b"]);
}

#[test]
fn test_resize_from_corner_handle() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 50.0)]);
    canvas.select("a", false);
    drag(&mut canvas, (100.0, 50.0), (150.0, 100.0), Modifiers::NONE);
    assert_eq!(bounds_of(&canvas, "a"), (0.0, 0.0, 150.0, 100.0));
    assert_eq!(canvas.history().undo_description(), Some("Resize layers"));
}

#[test]
fn test_marquee_selects_intersecting_layers() {
    let mut canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 20.0, 20.0),
        rect("b", 50.0, 50.0, 20.0, 20.0),
        rect("c", 200.0, 200.0, 20.0, 20.0),
    ]);
    canvas.pointer_down(Point::new(-10.0, -10.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(60.0, 60.0));
    assert!(canvas.marquee_rect().is_some());
    canvas.pointer_up(Point::new(60.0, 60.0));
    assert_eq!(canvas.selected_ids(), vec!["a", "b"]);
    assert!(canvas.marquee_rect().is_none());
    assert_eq!(canvas.history().len(), 1);
}

#[test]
fn test_escape_restores_selection_before_marquee() {
    let mut canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 20.0, 20.0),
        rect("b", 50.0, 50.0, 20.0, 20.0),
    ]);
    canvas.select("b", false);
    canvas.pointer_down(Point::new(-10.0, -10.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(30.0, 30.0));
    assert_eq!(canvas.selected_ids(), vec!["a"]);
    canvas.key_down(Key::Escape, Modifiers::NONE);
    assert_eq!(canvas.selected_ids(), vec!["b"]);
}

#[test]
fn test_escape_while_idle_deselects() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 20.0, 20.0)]);
    canvas.select("a", false);
    assert!(canvas.key_down(Key::Escape, Modifiers::NONE));
    assert!(canvas.selected_ids().is_empty());
}

#[test]
fn test_keyboard_history_shortcuts() {
    let mut canvas = Canvas::default();
    canvas.add_layer(rect("a", 0.0, 0.0, 20.0, 20.0));
    assert!(canvas.key_down(Key::Char('z'), Modifiers::CTRL));
    assert!(canvas.layers().is_empty());
    assert!(canvas.key_down(Key::Char('Z'), Modifiers::CTRL_SHIFT));
    assert_eq!(canvas.layers().len(), 1);
    assert!(canvas.key_down(Key::Char('z'), Modifiers::CTRL));
    assert!(canvas.key_down(Key::Char('y'), Modifiers::CTRL));
    assert_eq!(canvas.layers().len(), 1);
}

#[test]
fn test_delete_and_select_all_keys() {
    let mut canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 20.0, 20.0),
        rect("b", 50.0, 0.0, 20.0, 20.0),
    ]);
    assert!(!canvas.key_down(Key::Delete, Modifiers::NONE));
    assert!(canvas.key_down(Key::Char('a'), Modifiers::CTRL));
    assert_eq!(canvas.selected_ids().len(), 2);
    assert!(canvas.key_down(Key::Backspace, Modifiers::NONE));
    assert!(canvas.layers().is_empty());
}

#[test]
fn test_arrow_keys_nudge_selection() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 20.0, 20.0)]);
    canvas.select("a", false);
    let small = canvas.settings().transform.nudge_step;
    let large = canvas.settings().transform.nudge_step_large;
    canvas.key_down(Key::ArrowRight, Modifiers::NONE);
    canvas.key_down(Key::ArrowDown, Modifiers::SHIFT);
    assert_eq!(bounds_of(&canvas, "a"), (small, large, 20.0, 20.0));
    assert_eq!(canvas.history().len(), 3);
}

#[test]
fn test_nudge_skips_locked_layers() {
    let mut locked = rect("a", 0.0, 0.0, 20.0, 20.0);
    locked.locked = true;
    let mut canvas = canvas_with(vec![locked]);
    assert!(!canvas.nudge_selected(5.0, 0.0));
    assert!(!canvas.select("missing", false));
}

#[test]
fn test_keys_ignored_during_drag() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 50.0)]);
    canvas.pointer_down(Point::new(50.0, 25.0), PRIMARY, Modifiers::NONE);
    canvas.pointer_move(Point::new(60.0, 25.0));
    assert!(!canvas.key_down(Key::Delete, Modifiers::NONE));
    canvas.pointer_up(Point::new(60.0, 25.0));
    assert_eq!(canvas.layers().len(), 1);
}

#[test]
fn test_zoom_keys() {
    let mut canvas = Canvas::default();
    let step = canvas.settings().view.zoom_step;
    assert!(canvas.key_down(Key::Char('+'), Modifiers::NONE));
    assert!((canvas.viewport().zoom() - (1.0 + step)).abs() < 1e-9);
    assert!(canvas.key_down(Key::Char('0'), Modifiers::NONE));
    assert_eq!(canvas.viewport().zoom(), 1.0);
    assert!(canvas.key_down(Key::Char('-'), Modifiers::NONE));
    assert!((canvas.viewport().zoom() - (1.0 - step)).abs() < 1e-9);
    assert!(!canvas.key_down(Key::Char('q'), Modifiers::NONE));
}

#[test]
fn test_ctrl_wheel_zooms_around_pointer() {
    let mut canvas = Canvas::default();
    let anchor = Point::new(200.0, 120.0);
    let before = canvas.viewport().canvas_to_screen(anchor);
    canvas.wheel(anchor, -100.0, Modifiers::CTRL);
    assert!(canvas.viewport().zoom() > 1.0);
    let after = canvas.viewport().canvas_to_screen(anchor);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn test_plain_wheel_scrolls() {
    let mut canvas = Canvas::default();
    canvas.wheel(Point::ORIGIN, 30.0, Modifiers::NONE);
    assert_eq!(canvas.viewport().pan(), (0.0, -30.0));
    canvas.wheel(Point::ORIGIN, 30.0, Modifiers::SHIFT);
    assert_eq!(canvas.viewport().pan(), (-30.0, -30.0));
    assert_eq!(canvas.viewport().zoom(), 1.0);
}

#[test]
fn test_middle_button_pans() {
    let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0, 100.0, 50.0)]);
    canvas.pointer_down(Point::new(10.0, 10.0), PointerButton::Middle, Modifiers::NONE);
    canvas.pointer_move(Point::new(30.0, 25.0));
    canvas.pointer_up(Point::new(30.0, 25.0));
    assert_eq!(canvas.viewport().pan(), (20.0, 15.0));
    assert_eq!(bounds_of(&canvas, "a"), (0.0, 0.0, 100.0, 50.0));
    assert!(canvas.selected_ids().is_empty());
}
