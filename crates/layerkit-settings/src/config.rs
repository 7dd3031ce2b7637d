//! Editor configuration for LayerKit
//!
//! Provides configuration file handling and validation. Supports JSON and TOML
//! file formats; the default location is the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - View settings (zoom limits, zoom steps, fit padding, animation)
//! - Drawing defaults (minimum shape size, polygon sides, star points)
//! - Transform settings (handle sizes, hit tolerance, snapping, nudging)
//! - History bounds (entry count, memory threshold)
//! - Shape limits (arrow head and callout tail clamps)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use layerkit_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Zoom and viewport behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Smallest zoom factor
    pub min_zoom: f64,
    /// Largest zoom factor
    pub max_zoom: f64,
    /// Step for zoom in/out actions
    pub zoom_step: f64,
    /// Step per mouse wheel notch
    pub wheel_zoom_step: f64,
    /// Padding in screen pixels when fitting content
    pub fit_padding: f64,
    /// Duration of animated zoom in milliseconds
    pub zoom_animation_ms: f64,
    /// Zoom differences below this skip the animation
    pub zoom_epsilon: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_zoom: constants::MIN_ZOOM,
            max_zoom: constants::MAX_ZOOM,
            zoom_step: constants::ZOOM_STEP,
            wheel_zoom_step: constants::WHEEL_ZOOM_STEP,
            fit_padding: constants::FIT_PADDING,
            zoom_animation_ms: constants::ZOOM_ANIMATION_MS,
            zoom_epsilon: constants::ZOOM_EPSILON,
        }
    }
}

/// Shape creation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Minimum extent (logical units) for a drawn shape
    pub min_shape_size: f64,
    /// Sides of a newly drawn polygon
    pub polygon_sides: u32,
    /// Points of a newly drawn star
    pub star_points: u32,
    /// Default font size for text and text boxes
    pub font_size: f64,
    /// Default arrow head size
    pub arrow_size: f64,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            min_shape_size: constants::MIN_SHAPE_SIZE,
            polygon_sides: 6,
            star_points: 5,
            font_size: 16.0,
            arrow_size: 15.0,
        }
    }
}

/// Handle geometry and keyboard transform steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Handle box side in screen pixels
    pub handle_size: f64,
    /// Rotate handle distance above the top edge in screen pixels
    pub rotate_handle_offset: f64,
    /// Body hit tolerance in screen pixels
    pub hit_tolerance: f64,
    /// Rotation snap increment in degrees
    pub rotation_snap_degrees: f64,
    /// Arrow key nudge distance
    pub nudge_step: f64,
    /// Arrow key nudge distance with Shift held
    pub nudge_step_large: f64,
    /// Offset of duplicated layers
    pub duplicate_offset: f64,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            handle_size: constants::HANDLE_SIZE,
            rotate_handle_offset: constants::ROTATE_HANDLE_OFFSET,
            hit_tolerance: constants::HIT_TOLERANCE,
            rotation_snap_degrees: constants::ROTATION_SNAP_DEGREES,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            duplicate_offset: constants::DUPLICATE_OFFSET,
        }
    }
}

/// Undo history bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of entries kept
    pub max_size: usize,
    /// Estimated size (bytes) that triggers compression
    pub memory_threshold_bytes: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_size: constants::MAX_HISTORY_SIZE,
            memory_threshold_bytes: constants::HISTORY_MEMORY_THRESHOLD,
        }
    }
}

/// Clamp ratios applied to decorations relative to their host shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeLimits {
    /// Arrow head size is at most this fraction of the arrow length
    pub arrow_head_max_ratio: f64,
    /// Callout tail width is at most this fraction of the box's smaller side
    pub callout_tail_max_ratio: f64,
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self {
            arrow_head_max_ratio: constants::ARROW_HEAD_MAX_RATIO,
            callout_tail_max_ratio: constants::CALLOUT_TAIL_MAX_RATIO,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Zoom and viewport behaviour
    pub view: ViewSettings,
    /// Drawing defaults
    pub drawing: DrawingSettings,
    /// Handles and transforms
    pub transform: TransformSettings,
    /// History bounds
    pub history: HistorySettings,
    /// Decoration clamps
    pub shapes: ShapeLimits,
}

enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl EditorSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)?;

        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        tracing::debug!("Loaded editor settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load settings from `path` if it exists; fall back to defaults when the
    /// file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.view.validate()?;
        self.drawing.validate()?;
        self.transform.validate()?;
        self.history.validate()?;
        self.shapes.validate()
    }

    /// Replace every section that fails validation with its defaults.
    pub fn sanitized(mut self) -> Self {
        fn reset<T: Default>(section: &mut T, validate: fn(&T) -> SettingsResult<()>) {
            if let Err(e) = validate(section) {
                tracing::warn!("{}; using defaults for the section", e);
                *section = T::default();
            }
        }
        reset(&mut self.view, ViewSettings::validate);
        reset(&mut self.drawing, DrawingSettings::validate);
        reset(&mut self.transform, TransformSettings::validate);
        reset(&mut self.history, HistorySettings::validate);
        reset(&mut self.shapes, ShapeLimits::validate);
        self
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be a finite number > 0"))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be a finite number >= 0"))
    }
}

impl ViewSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        positive("view.min_zoom", self.min_zoom)?;
        positive("view.max_zoom", self.max_zoom)?;
        if self.max_zoom < self.min_zoom {
            return Err(SettingsError::invalid(
                "view.max_zoom",
                "must be >= view.min_zoom",
            ));
        }
        positive("view.zoom_step", self.zoom_step)?;
        positive("view.wheel_zoom_step", self.wheel_zoom_step)?;
        non_negative("view.fit_padding", self.fit_padding)?;
        non_negative("view.zoom_animation_ms", self.zoom_animation_ms)?;
        non_negative("view.zoom_epsilon", self.zoom_epsilon)
    }
}

impl DrawingSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        non_negative("drawing.min_shape_size", self.min_shape_size)?;
        if self.polygon_sides < 3 {
            return Err(SettingsError::invalid("drawing.polygon_sides", "must be >= 3"));
        }
        if self.star_points < 2 {
            return Err(SettingsError::invalid("drawing.star_points", "must be >= 2"));
        }
        positive("drawing.font_size", self.font_size)
    }
}

impl TransformSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        positive("transform.handle_size", self.handle_size)?;
        non_negative("transform.hit_tolerance", self.hit_tolerance)?;
        positive("transform.rotation_snap_degrees", self.rotation_snap_degrees)
    }
}

impl HistorySettings {
    pub fn validate(&self) -> SettingsResult<()> {
        if self.max_size == 0 {
            return Err(SettingsError::invalid("history.max_size", "must be > 0"));
        }
        Ok(())
    }
}

impl ShapeLimits {
    pub fn validate(&self) -> SettingsResult<()> {
        for (key, ratio) in [
            ("shapes.arrow_head_max_ratio", self.arrow_head_max_ratio),
            ("shapes.callout_tail_max_ratio", self.callout_tail_max_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: ratio.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Default settings file location: `<config dir>/layerkit/settings.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("platform has no configuration directory".to_string())
    })?;
    Ok(base.join("layerkit").join("settings.toml"))
}
