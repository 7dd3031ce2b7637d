//! Layer-array JSON boundary and load-time invariant checks.
//!
//! The engine does not own a file format; it exchanges the plain layer array
//! with the host and validates whatever comes back in.

use crate::model::{Layer, Shape};
use layerkit_core::{LayerError, Result};
use std::collections::{HashMap, HashSet};

/// Check the invariants a loaded layer set must satisfy: unique ids, group
/// children that exist, acyclic group membership and finite geometry.
pub fn validate_layers(layers: &[Layer]) -> std::result::Result<(), LayerError> {
    let mut ids = HashSet::with_capacity(layers.len());
    for layer in layers {
        if !ids.insert(layer.id.as_str()) {
            return Err(LayerError::DuplicateId {
                id: layer.id.clone(),
            });
        }
        if !layer.shape.is_finite() || !layer.rotation.is_finite() {
            return Err(LayerError::InvalidGeometry {
                id: layer.id.clone(),
                reason: "non-finite coordinate".to_string(),
            });
        }
    }

    let mut children: HashMap<&str, &[String]> = HashMap::new();
    for layer in layers {
        if let Shape::Group { children: kids, .. } = &layer.shape {
            if let Some(missing) = kids.iter().find(|c| !ids.contains(c.as_str())) {
                return Err(LayerError::UnknownChild {
                    group: layer.id.clone(),
                    child: missing.clone(),
                });
            }
            children.insert(layer.id.as_str(), kids.as_slice());
        }
    }

    // Depth-first walk with an on-path set; a child already on the path
    // closes a cycle.
    let mut done: HashSet<&str> = HashSet::new();
    for &start in children.keys() {
        let mut path: Vec<(&str, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<&str> = HashSet::from([start]);
        while let Some(&(id, next)) = path.last() {
            let kids = children.get(id).copied().unwrap_or(&[]);
            if next >= kids.len() || done.contains(id) {
                done.insert(id);
                on_path.remove(id);
                path.pop();
                continue;
            }
            if let Some(top) = path.last_mut() {
                top.1 += 1;
            }
            let child = kids[next].as_str();
            if on_path.contains(child) {
                return Err(LayerError::GroupCycle {
                    id: child.to_string(),
                });
            }
            if children.contains_key(child) && !done.contains(child) {
                on_path.insert(child);
                path.push((child, 0));
            }
        }
    }
    Ok(())
}

/// Serialize the layer array.
pub fn layers_to_json(layers: &[Layer]) -> Result<String> {
    Ok(serde_json::to_string(layers)?)
}

/// Parse and validate a layer array.
pub fn layers_from_json(json: &str) -> Result<Vec<Layer>> {
    let layers: Vec<Layer> = serde_json::from_str(json)?;
    validate_layers(&layers)?;
    tracing::debug!("Loaded {} layers from JSON", layers.len());
    Ok(layers)
}
