//! Group membership queries over a flat layer array.

use super::layer::{Layer, Shape};
use std::collections::HashSet;

fn children_of<'a>(layers: &'a [Layer], id: &str) -> &'a [String] {
    layers
        .iter()
        .find(|l| l.id == id)
        .and_then(|l| match &l.shape {
            Shape::Group { children, .. } => Some(children.as_slice()),
            _ => None,
        })
        .unwrap_or(&[])
}

/// The group that directly contains `id`, if any.
pub fn parent_of<'a>(layers: &'a [Layer], id: &str) -> Option<&'a str> {
    layers.iter().find_map(|l| match &l.shape {
        Shape::Group { children, .. } if children.iter().any(|c| c == id) => Some(l.id.as_str()),
        _ => None,
    })
}

/// Nesting depth of a layer: 0 at top level, +1 per enclosing group.
pub fn group_depth(layers: &[Layer], id: &str) -> usize {
    let mut depth = 0;
    let mut current = id;
    while let Some(parent) = parent_of(layers, current) {
        depth += 1;
        current = parent;
        if depth > layers.len() {
            break;
        }
    }
    depth
}

/// All layers nested under `id`, at any depth, excluding `id` itself.
pub fn descendant_ids(layers: &[Layer], id: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(id.to_string());
    let mut stack: Vec<&str> = children_of(layers, id).iter().map(String::as_str).rev().collect();
    while let Some(child) = stack.pop() {
        if !seen.insert(child.to_string()) {
            continue;
        }
        out.push(child.to_string());
        stack.extend(children_of(layers, child).iter().map(String::as_str).rev());
    }
    out
}

/// `ids` plus every descendant of any group among them, deduplicated and in
/// array order.
pub fn expand_ids(layers: &[Layer], ids: &[String]) -> Vec<String> {
    let mut wanted: HashSet<String> = ids.iter().cloned().collect();
    for id in ids {
        wanted.extend(descendant_ids(layers, id));
    }
    layers
        .iter()
        .filter(|l| wanted.contains(&l.id))
        .map(|l| l.id.clone())
        .collect()
}
