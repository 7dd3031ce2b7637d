use layerkit_editor::{FrameHandle, FrameScheduler, Layer, Point, Shape, Viewport};
use layerkit_settings::ViewSettings;

#[derive(Default)]
struct Frames {
    next: u64,
    cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for Frames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        FrameHandle::new(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

fn sized(width: f64, height: f64) -> Viewport {
    let mut vp = Viewport::default();
    vp.set_viewport_size(width, height);
    vp
}

#[test]
fn test_viewport_creation() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), (0.0, 0.0));
    assert!(!vp.user_has_set_zoom());
    assert_eq!(vp.zoom_percent(), 100);
}

#[test]
fn test_zoom_is_clamped() {
    let mut vp = Viewport::default();
    assert_eq!(vp.set_zoom(0.01), 0.1);
    assert_eq!(vp.set_zoom(12.0), 5.0);
    assert_eq!(vp.set_zoom_direct(-3.0), 0.1);
}

#[test]
fn test_zoom_by_keeps_anchor_fixed() {
    let mut vp = Viewport::default();
    vp.set_pan(40.0, 25.0);
    let anchor = Point::new(300.0, 200.0);
    let before = vp.screen_to_canvas(anchor);
    assert!(vp.zoom_by(0.5, anchor));
    let after = vp.screen_to_canvas(anchor);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
    assert!(vp.user_has_set_zoom());
}

#[test]
fn test_zoom_by_at_limit_is_noop() {
    let mut vp = Viewport::default();
    vp.set_zoom(5.0);
    vp.set_pan(10.0, 10.0);
    assert!(!vp.zoom_by(0.2, Point::new(100.0, 100.0)));
    assert_eq!(vp.pan(), (10.0, 10.0));
}

#[test]
fn test_fit_to_window_scenario() {
    let mut vp = sized(1000.0, 700.0);
    vp.set_pan(120.0, -30.0);
    vp.set_zoom(2.0);
    let target = vp.fit_to_window(Some((1200.0, 900.0)), None).unwrap();
    assert!((target - 660.0 / 900.0).abs() < 1e-9);
    assert!((vp.zoom() - 0.7333).abs() < 1e-3);
    assert_eq!(vp.pan(), (0.0, 0.0));
    assert!(!vp.user_has_set_zoom());
}

#[test]
fn test_fit_small_background_zooms_past_actual_size() {
    let mut vp = sized(1000.0, 700.0);
    let target = vp.fit_to_window(Some((200.0, 100.0)), None).unwrap();
    assert!((target - 4.8).abs() < 1e-9);

    let target = vp.fit_to_window(Some((50.0, 50.0)), None).unwrap();
    assert_eq!(target, vp.max_zoom());
}

#[test]
fn test_fit_to_window_without_background_is_noop() {
    let mut vp = sized(1000.0, 700.0);
    vp.set_zoom(2.0);
    assert_eq!(vp.fit_to_window(None, None), None);
    assert_eq!(vp.zoom(), 2.0);
}

#[test]
fn test_smooth_zoom_animates_with_ease_out() {
    let mut vp = Viewport::default();
    let mut frames = Frames::default();
    assert!(!vp.smooth_zoom_to(2.0, Some(&mut frames)));
    assert!(vp.is_animating());

    // First frame fixes the start time.
    assert!(vp.on_animation_frame(FrameHandle::new(1), 1000.0, Some(&mut frames)));
    assert_eq!(vp.zoom(), 1.0);

    // Halfway: 1 - 0.5^3 = 0.875 of the way.
    vp.on_animation_frame(FrameHandle::new(2), 1150.0, Some(&mut frames));
    assert!((vp.zoom() - 1.875).abs() < 1e-9);

    vp.on_animation_frame(FrameHandle::new(3), 1300.0, Some(&mut frames));
    assert_eq!(vp.zoom(), 2.0);
    assert!(!vp.is_animating());
}

#[test]
fn test_small_zoom_change_skips_animation() {
    let mut vp = Viewport::default();
    let mut frames = Frames::default();
    assert!(vp.smooth_zoom_to(1.005, Some(&mut frames)));
    assert_eq!(vp.zoom(), 1.005);
    assert!(!vp.is_animating());
    assert_eq!(frames.next, 0);
}

#[test]
fn test_new_target_cancels_in_flight_animation() {
    let mut vp = Viewport::default();
    let mut frames = Frames::default();
    vp.smooth_zoom_to(2.0, Some(&mut frames));
    vp.smooth_zoom_to(3.0, Some(&mut frames));
    assert_eq!(frames.cancelled, vec![FrameHandle::new(1)]);

    // The stale handle no longer drives anything.
    assert!(!vp.on_animation_frame(FrameHandle::new(1), 0.0, Some(&mut frames)));
    assert_eq!(vp.animation().unwrap().target_zoom, 3.0);
}

#[test]
fn test_cancel_animation_releases_frame() {
    let mut vp = Viewport::default();
    let mut frames = Frames::default();
    vp.smooth_zoom_to(2.0, Some(&mut frames));
    vp.cancel_animation(Some(&mut frames));
    assert!(!vp.is_animating());
    assert_eq!(frames.cancelled.len(), 1);
    assert_eq!(vp.zoom(), 1.0);
}

#[test]
fn test_zoom_to_fit_layers_centres_content() {
    let mut vp = sized(1000.0, 700.0);
    let layers = vec![Layer::new(Shape::Rectangle {
        x: 100.0,
        y: 100.0,
        width: 480.0,
        height: 330.0,
    })];
    let zoom = vp.zoom_to_fit_layers(&layers, None, None).unwrap();
    assert!((zoom - 2.0).abs() < 1e-9);
    let centre = vp.canvas_to_screen(Point::new(340.0, 265.0));
    assert!((centre.x - 500.0).abs() < 1e-9);
    assert!((centre.y - 350.0).abs() < 1e-9);
}

#[test]
fn test_zoom_to_fit_layers_falls_back_to_background() {
    let mut vp = sized(1000.0, 700.0);
    let zoom = vp.zoom_to_fit_layers(&[], Some((1200.0, 900.0)), None);
    assert!((zoom.unwrap() - 660.0 / 900.0).abs() < 1e-9);
}

#[test]
fn test_custom_limits_from_settings() {
    let settings = ViewSettings {
        min_zoom: 0.5,
        max_zoom: 2.0,
        ..ViewSettings::default()
    };
    let mut vp = Viewport::new(&settings);
    assert_eq!(vp.set_zoom(3.0), 2.0);
    assert_eq!(vp.set_zoom(0.1), 0.5);
}

#[test]
fn test_inverted_limits_fall_back_to_defaults() {
    let settings = ViewSettings {
        min_zoom: 2.0,
        max_zoom: 1.0,
        ..ViewSettings::default()
    };
    let vp = Viewport::new(&settings);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.settings(), &ViewSettings::default());
}
