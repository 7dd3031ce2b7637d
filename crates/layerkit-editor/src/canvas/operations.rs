//! Layer manipulation operations for Canvas.
//!
//! Each operation that changes the document records exactly one history
//! entry and requests one redraw.

use std::collections::{HashMap, HashSet};

use super::Canvas;
use crate::geometry::Point;
use crate::model::{expand_ids, parent_of, Layer, Shape};

impl Canvas {
    /// Appends a layer on top and returns its id. A clashing id is replaced
    /// with a fresh one.
    pub fn add_layer(&mut self, mut layer: Layer) -> String {
        self.ensure_alive();
        if self.layer(&layer.id).is_some() {
            layer.id = Layer::generate_id();
        }
        let id = layer.id.clone();
        let description = format!("Add {}", layer.kind());
        self.layers.push(layer);
        self.commit(&description);
        id
    }

    /// Completes the text tool: places `text` at `point` in the current
    /// style. Empty text adds nothing.
    pub fn add_text(&mut self, point: Point, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let layer = Layer::new(Shape::Text {
            x: point.x,
            y: point.y,
            text: text.to_string(),
        })
        .with_style(self.style.clone());
        let id = self.add_layer(layer);
        self.selection.select(&id, false);
        Some(id)
    }

    /// Deletes the selection; groups take their descendants with them.
    /// Returns the number of layers removed.
    pub fn delete_selected(&mut self) -> usize {
        self.ensure_alive();
        let ids = self.selection.ordered_ids(&self.layers);
        if ids.is_empty() {
            return 0;
        }
        let removed = self.remove_layers(&ids);
        self.selection.deselect_all();
        if removed > 0 {
            self.commit("Delete layers");
        }
        removed
    }

    pub fn delete_layer(&mut self, id: &str) -> bool {
        self.ensure_alive();
        let removed = self.remove_layers(&[id.to_string()]);
        if removed == 0 {
            return false;
        }
        self.commit("Delete layer");
        true
    }

    /// Removes `ids` and their descendants, strips them from group child
    /// lists and drops groups left empty.
    fn remove_layers(&mut self, ids: &[String]) -> usize {
        let doomed: HashSet<String> = expand_ids(&self.layers, ids).into_iter().collect();
        let before = self.layers.len();
        self.layers.retain(|l| !doomed.contains(&l.id));
        self.detach_from_groups(doomed);
        before - self.layers.len()
    }

    /// Strips `ids` from every group child list. Groups emptied this way are
    /// removed too, cascading up through their parents.
    fn detach_from_groups(&mut self, mut ids: HashSet<String>) {
        while !ids.is_empty() {
            let mut emptied = HashSet::new();
            for layer in &mut self.layers {
                if let Shape::Group { children, .. } = &mut layer.shape {
                    let had = children.len();
                    children.retain(|c| !ids.contains(c));
                    if had > 0 && children.is_empty() {
                        emptied.insert(layer.id.clone());
                    }
                }
            }
            if !emptied.is_empty() {
                tracing::debug!("Dropping {} emptied group(s)", emptied.len());
                self.layers.retain(|l| !emptied.contains(&l.id));
            }
            ids = emptied;
        }
    }

    /// Copies the selection (with group contents) on top, offset by the
    /// configured distance, and selects the copies. Returns the new ids of
    /// the selected copies.
    pub fn duplicate_selected(&mut self) -> Vec<String> {
        self.ensure_alive();
        let selected = self.selection.ordered_ids(&self.layers);
        if selected.is_empty() {
            return Vec::new();
        }
        let offset = self.settings.transform.duplicate_offset;
        let sources = expand_ids(&self.layers, &selected);
        let renamed: HashMap<String, String> = sources
            .iter()
            .map(|id| (id.clone(), Layer::generate_id()))
            .collect();

        let copies: Vec<Layer> = self
            .layers
            .iter()
            .filter(|l| renamed.contains_key(&l.id))
            .map(|l| {
                let mut copy = l.translated(offset, offset);
                copy.id = renamed[&l.id].clone();
                if let Shape::Group { children, .. } = &mut copy.shape {
                    for child in children.iter_mut() {
                        if let Some(new_id) = renamed.get(child) {
                            *child = new_id.clone();
                        }
                    }
                }
                copy
            })
            .collect();
        self.layers.extend(copies);

        let new_selection: Vec<String> = selected.iter().map(|id| renamed[id].clone()).collect();
        self.selection.deselect_all();
        for id in &new_selection {
            self.selection.select(id, true);
        }
        self.commit("Duplicate layers");
        new_selection
    }

    /// Moves the selection to the top of the stack, keeping relative order.
    pub fn bring_to_front(&mut self) -> bool {
        self.ensure_alive();
        let (mut picked, mut next): (Vec<Layer>, Vec<Layer>) = self
            .layers
            .iter()
            .cloned()
            .partition(|l| self.selection.is_selected(&l.id));
        next.append(&mut picked);
        self.reorder(next, "Bring to front")
    }

    /// Moves the selection to the bottom of the stack, keeping relative order.
    pub fn send_to_back(&mut self) -> bool {
        self.ensure_alive();
        let (mut next, mut rest): (Vec<Layer>, Vec<Layer>) = self
            .layers
            .iter()
            .cloned()
            .partition(|l| self.selection.is_selected(&l.id));
        next.append(&mut rest);
        self.reorder(next, "Send to back")
    }

    /// Moves each selected layer one step up past an unselected neighbour.
    pub fn bring_forward(&mut self) -> bool {
        self.ensure_alive();
        let mut next = self.layers.clone();
        for i in (0..next.len().saturating_sub(1)).rev() {
            if self.selection.is_selected(&next[i].id)
                && !self.selection.is_selected(&next[i + 1].id)
            {
                next.swap(i, i + 1);
            }
        }
        self.reorder(next, "Bring forward")
    }

    /// Moves each selected layer one step down past an unselected neighbour.
    pub fn send_backward(&mut self) -> bool {
        self.ensure_alive();
        let mut next = self.layers.clone();
        for i in 1..next.len() {
            if self.selection.is_selected(&next[i].id)
                && !self.selection.is_selected(&next[i - 1].id)
            {
                next.swap(i, i - 1);
            }
        }
        self.reorder(next, "Send backward")
    }

    fn reorder(&mut self, next: Vec<Layer>, description: &str) -> bool {
        let changed = next
            .iter()
            .map(|l| &l.id)
            .ne(self.layers.iter().map(|l| &l.id));
        if changed {
            self.layers = next;
            self.commit(description);
        }
        changed
    }

    /// Translates the unlocked selected layers (and group contents).
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        self.ensure_alive();
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let ids = expand_ids(&self.layers, &self.selection.ordered_ids(&self.layers));
        let mut moved = false;
        for layer in self.layers.iter_mut() {
            if ids.contains(&layer.id) && !layer.locked && !layer.is_group() {
                *layer = layer.translated(dx, dy);
                moved = true;
            }
        }
        if moved {
            self.commit("Nudge layers");
        }
        moved
    }

    /// Hidden layers leave the selection.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> bool {
        self.update_layer(id, "Toggle visibility", |l| {
            let changed = l.visible != visible;
            l.visible = visible;
            changed
        })
    }

    /// Locked layers leave the selection.
    pub fn set_layer_locked(&mut self, id: &str, locked: bool) -> bool {
        self.update_layer(id, "Toggle lock", |l| {
            let changed = l.locked != locked;
            l.locked = locked;
            changed
        })
    }

    pub fn set_layer_opacity(&mut self, id: &str, opacity: f64) -> bool {
        self.update_layer(id, "Change opacity", |l| {
            let before = l.opacity();
            l.set_opacity(opacity);
            l.opacity() != before
        })
    }

    /// Renames a layer; an empty name clears it.
    pub fn rename_layer(&mut self, id: &str, name: &str) -> bool {
        let name = (!name.trim().is_empty()).then(|| name.trim().to_string());
        self.update_layer(id, "Rename layer", |l| {
            let changed = l.name != name;
            l.name = name;
            changed
        })
    }

    fn update_layer(
        &mut self,
        id: &str,
        description: &str,
        apply: impl FnOnce(&mut Layer) -> bool,
    ) -> bool {
        self.ensure_alive();
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            tracing::warn!("No layer {:?}", id);
            return false;
        };
        let mut next = layer.clone();
        if !apply(&mut next) {
            return false;
        }
        *layer = next;
        self.commit(description);
        true
    }

    /// Wraps the selected top-level layers in a new group placed just above
    /// the topmost of them. Needs at least two layers. Returns the group id.
    pub fn group_selected(&mut self, name: Option<&str>) -> Option<String> {
        self.ensure_alive();
        let selected = self.selection.ordered_ids(&self.layers);
        let members: Vec<String> = selected
            .iter()
            .filter(|id| {
                parent_of(&self.layers, id).is_none_or(|p| !selected.iter().any(|s| s == p))
            })
            .cloned()
            .collect();
        if members.len() < 2 {
            return None;
        }

        self.detach_from_groups(members.iter().cloned().collect());
        let top = self
            .layers
            .iter()
            .rposition(|l| members.contains(&l.id))?;
        let count = self.layers.iter().filter(|l| l.is_group()).count() + 1;
        let mut group = Layer::new(Shape::Group {
            children: members,
            expanded: true,
        });
        group.name = Some(name.map_or_else(|| format!("Group {}", count), str::to_string));
        let id = group.id.clone();
        self.layers.insert(top + 1, group);
        self.selection.select(&id, false);
        self.commit("Group layers");
        Some(id)
    }

    /// Dissolves a group. Its children move to the group's parent, if any,
    /// and become the selection.
    pub fn ungroup(&mut self, id: &str) -> bool {
        self.ensure_alive();
        let Some(children) = self.layer(id).and_then(|l| match &l.shape {
            Shape::Group { children, .. } => Some(children.clone()),
            _ => None,
        }) else {
            return false;
        };
        let parent = parent_of(&self.layers, id).map(str::to_string);
        self.layers.retain(|l| l.id != id);
        if let Some(parent) = parent {
            if let Some(Shape::Group { children: siblings, .. }) = self
                .layers
                .iter_mut()
                .find(|l| l.id == parent)
                .map(|l| &mut l.shape)
            {
                if let Some(at) = siblings.iter().position(|c| c == id) {
                    siblings.remove(at);
                    for (k, child) in children.iter().enumerate() {
                        siblings.insert(at + k, child.clone());
                    }
                }
            }
        }
        self.selection.deselect_all();
        for child in &children {
            self.selection.select(child, true);
        }
        self.commit("Ungroup layers");
        true
    }
}
