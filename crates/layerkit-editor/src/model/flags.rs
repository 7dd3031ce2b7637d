//! Tolerant boolean flags and opacity values.
//!
//! Stored layer sets come from several generations of hosts: `visible` may be
//! `true`, `1`, `"1"`, `"true"` or missing entirely. Anything unrecognized
//! falls back to the field's default.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = Option<bool>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, 0/1, or a boolean-like string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(flag_from_number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(flag_from_number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(flag_from_number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(flag_from_str(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(FlagVisitor)
    }
}

fn flag_from_number(v: f64) -> Option<bool> {
    if v == 0.0 {
        Some(false)
    } else if v == 1.0 {
        Some(true)
    } else {
        tracing::warn!("Ignoring out-of-range flag value {}", v);
        None
    }
}

fn flag_from_str(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        "" => None,
        other => {
            tracing::warn!("Ignoring unrecognized flag value {:?}", other);
            None
        }
    }
}

/// Interpret a JSON value as a flag. `None` means "use the default".
pub fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().and_then(flag_from_number),
        Value::String(s) => flag_from_str(s),
        Value::Null => None,
        _ => {
            tracing::warn!("Ignoring non-scalar flag value");
            None
        }
    }
}

/// Deserialize a flag that defaults to `true` (e.g. `visible`).
pub fn default_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(d.deserialize_any(FlagVisitor)?.unwrap_or(true))
}

/// Deserialize a flag that defaults to `false` (e.g. `locked`).
pub fn default_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(d.deserialize_any(FlagVisitor)?.unwrap_or(false))
}

pub(crate) fn yes() -> bool {
    true
}

pub(crate) fn full_opacity() -> f64 {
    1.0
}

/// Clamp an opacity to `[0, 1]`; non-finite values become fully opaque.
pub(crate) fn clamp_opacity(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Deserialize an opacity through [`clamp_opacity`]; `null` is fully opaque.
pub(crate) fn clamped_opacity<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.map_or(1.0, clamp_opacity))
}
