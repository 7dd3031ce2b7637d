//! Engine-wide default values.
//!
//! These are the defaults baked into `EditorSettings`; hosts that need other
//! values override them through the settings file rather than these constants.

/// Smallest permitted zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest permitted zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom increment for the zoom-in/zoom-out actions.
pub const ZOOM_STEP: f64 = 0.2;

/// Zoom increment applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Zoom differences below this are applied without animation.
pub const ZOOM_EPSILON: f64 = 0.01;

/// Duration of the eased zoom animation in milliseconds.
pub const ZOOM_ANIMATION_MS: f64 = 300.0;

/// Padding (in screen pixels) subtracted from the viewport when fitting content.
pub const FIT_PADDING: f64 = 40.0;

/// Minimum extent, in logical units, for a drawn shape to be kept.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Side length of a handle hit-box in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Distance of the rotate handle above the top edge, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// Tolerance for body hit-testing in screen pixels.
pub const HIT_TOLERANCE: f64 = 3.0;

/// Rotation snap increment in degrees (Shift while rotating).
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Number of undo entries kept before the oldest is evicted.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Estimated history size (bytes of serialized layers) that triggers compression.
pub const HISTORY_MEMORY_THRESHOLD: usize = 50 * 1024 * 1024;

/// Arrow heads are clamped to this fraction of the line length.
pub const ARROW_HEAD_MAX_RATIO: f64 = 0.8;

/// Callout tail widths are clamped to this fraction of the box's smaller side.
pub const CALLOUT_TAIL_MAX_RATIO: f64 = 0.8;

/// Offset applied to duplicated layers.
pub const DUPLICATE_OFFSET: f64 = 10.0;
