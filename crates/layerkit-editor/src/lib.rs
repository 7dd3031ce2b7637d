//! # LayerKit Editor
//!
//! The layer geometry and interaction engine behind a 2D annotation editor.
//! Users draw shapes (rectangles, ellipses, polygons, stars, lines, arrows,
//! freehand paths, text boxes, callouts, blur regions) over a background image,
//! select and transform them, and undo or redo every committed change.
//!
//! ## Core Components
//!
//! - **Model**: [`Layer`] records with a tagged [`Shape`] payload
//! - **Geometry**: bounds, hit-testing and rotation helpers
//! - **Viewport**: zoom, pan and the eased zoom animation
//! - **Drawing**: the pointer-driven shape creation state machine
//! - **Handles / Transform**: resize, rotate and drag sessions
//! - **Selection**: click and marquee selection
//! - **History**: snapshot undo/redo with batching and compression
//! - **Canvas**: the editor instance routing input to the controllers
//!
//! ## Architecture
//!
//! ```text
//! input event ─► Canvas ─┬─► DrawingController ──┐
//!                        ├─► TransformController ├─► layers ─► HistoryManager
//!                        └─► SelectionManager ───┘      │
//!                                                       └─► RenderSink
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerkit_editor::{Canvas, Modifiers, Point, PointerButton, Tool};
//! use layerkit_settings::EditorSettings;
//!
//! let mut canvas = Canvas::new(EditorSettings::default());
//! canvas.set_tool(Tool::Rectangle);
//! canvas.pointer_down(Point::new(10.0, 10.0), PointerButton::Primary, Modifiers::NONE);
//! canvas.pointer_move(Point::new(60.0, 40.0));
//! canvas.pointer_up(Point::new(60.0, 40.0));
//! assert_eq!(canvas.layers().len(), 1);
//! assert!(canvas.undo());
//! ```

pub mod canvas;
pub mod drawing;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod host;
pub mod input;
pub mod model;
pub mod selection_manager;
pub mod serialization;
pub mod transform;
pub mod viewport;

pub use canvas::Canvas;
pub use drawing::{validate_layer, DrawStart, DrawingController, Tool};
pub use geometry::{
    distance, layer_contains_point, regular_polygon_vertices, rotate_point, shape_bounds,
    star_vertices, union_bounds, Bounds, Point,
};
pub use handles::{Handle, HandleLayout};
pub use history::{HistoryEntry, HistoryManager};
pub use host::{
    FrameHandle, FrameScheduler, HostHooks, RenderSink, StatusSink, TextInputHandler,
};
pub use input::{Key, Modifiers, PointerButton};
pub use model::{ArrowStyle, BackgroundState, Layer, Shape, Style};
pub use selection_manager::{hit_layer, selection_bounds, SelectionManager};
pub use serialization::{layers_from_json, layers_to_json, validate_layers};
pub use transform::{TransformController, TransformKind, TransformOutcome};
pub use viewport::Viewport;
