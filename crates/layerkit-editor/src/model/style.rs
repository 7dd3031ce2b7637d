//! Drawing style attached to each layer.
//!
//! The painter owns most of these values. The engine reads stroke width (line
//! hit tolerance), font size (text bounds), polygon sides, star points and the
//! arrow settings when it builds new shapes.

use layerkit_settings::DrawingSettings;
use serde::{Deserialize, Serialize};

/// Arrow head placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowStyle {
    /// Head at the end point
    #[default]
    Single,
    /// Heads at both ends
    Double,
    /// Plain line
    #[serde(rename = "none")]
    NoHead,
}

/// Stroke, fill and shape-construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub stroke: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub arrow_style: ArrowStyle,
    pub arrow_size: f64,
    pub sides: u32,
    pub points: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self::from_settings(&DrawingSettings::default())
    }
}

impl Style {
    /// Style seeded from the drawing defaults.
    pub fn from_settings(drawing: &DrawingSettings) -> Self {
        Self {
            stroke: "#000000".to_string(),
            fill: None,
            stroke_width: 2.0,
            font_size: drawing.font_size,
            arrow_style: ArrowStyle::Single,
            arrow_size: drawing.arrow_size,
            sides: drawing.polygon_sides,
            points: drawing.star_points,
        }
    }
}
