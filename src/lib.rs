//! # LayerKit
//!
//! Layer geometry and interaction engine for 2D vector annotation editors:
//! shapes drawn, selected and transformed over a background image, with full
//! undo/redo.
//!
//! ## Architecture
//!
//! LayerKit is organized as a workspace with multiple crates:
//!
//! 1. **layerkit-core** - Error taxonomy, engine constants, shared type aliases
//! 2. **layerkit-settings** - Editor configuration (JSON/TOML), validation
//! 3. **layerkit-editor** - Layer model, geometry, viewport, drawing, transforms,
//!    selection, history and the editor instance with its input contract
//! 4. **layerkit** - This facade crate, re-exporting the above
//!
//! Painting, host event wiring and persistence encoding stay with the embedding
//! application; the engine talks to them through the traits in
//! [`editor::host`].

pub use layerkit_core as core;
pub use layerkit_editor as editor;
pub use layerkit_settings as settings;

pub use layerkit_core::{Error, LayerError, Result};

pub use layerkit_editor::{
    BackgroundState, Bounds, Canvas, DrawingController, FrameHandle, FrameScheduler, Handle,
    HistoryEntry, HistoryManager, HostHooks, Key, Layer, Modifiers, Point, PointerButton,
    RenderSink, SelectionManager, Shape, StatusSink, Style, TextInputHandler, Tool,
    TransformController, Viewport,
};

pub use layerkit_settings::{EditorSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("LAYERKIT_BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to `info`)
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

/// Initialize logging with newline-delimited JSON output, for hosts that ship
/// engine logs to a collector instead of a terminal.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}
