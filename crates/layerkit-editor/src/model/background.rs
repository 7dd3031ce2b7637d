//! Background image state.

use super::flags;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Visibility, opacity and extent of the image (or fixed canvas) under the layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundState {
    #[serde(default = "flags::yes", deserialize_with = "flags::default_true")]
    visible: bool,
    #[serde(
        default = "flags::full_opacity",
        deserialize_with = "flags::clamped_opacity"
    )]
    opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            width: None,
            height: None,
        }
    }
}

impl BackgroundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background of a known size.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Extent used for fitting, if a usable background is set.
    pub fn extent(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = Some(width);
        self.height = Some(height);
    }

    pub fn clear_size(&mut self) {
        self.width = None;
        self.height = None;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Set visibility from a loosely typed host value (`true`, `1`, `"0"`, ...).
    /// Unrecognized values and `null` restore the default (visible).
    pub fn set_visible_value(&mut self, value: &Value) {
        self.visible = flags::parse_flag(value).unwrap_or(true);
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = flags::clamp_opacity(opacity);
    }
}
