use crate::geometry::{layer_contains_point, resolved_bounds, union_bounds, Bounds, Point};
use crate::model::Layer;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Marquee {
    anchor: Point,
    current: Point,
    /// Selection kept regardless of the rectangle (Shift held at start).
    base: HashSet<String>,
    /// Selection before the marquee started, restored on cancel.
    original: HashSet<String>,
    original_primary: Option<String>,
}

/// Tracks which layers are selected and runs marquee (rubber-band) selection.
///
/// # Selection Model
///
/// - **Set**: any number of layer ids may be selected at once
/// - **Primary**: the most recently added id, used for single-layer handles
/// - **Marquee**: while a rectangle drag is active, the selection is
///   recomputed on every update as `base ∪ hits(rectangle)`
///
/// Groups, hidden layers and locked layers are never picked by clicking or by
/// the marquee. Groups can still be selected explicitly by id.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: HashSet<String>,
    primary: Option<String>,
    marquee: Option<Marquee>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The most recently selected id that is still selected.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Selected ids in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Selected ids in z-order (bottom first).
    pub fn ordered_ids(&self, layers: &[Layer]) -> Vec<String> {
        layers
            .iter()
            .filter(|l| self.selected.contains(&l.id))
            .map(|l| l.id.clone())
            .collect()
    }

    /// Select `id`. Without `additive` the previous selection is replaced;
    /// with it the id is toggled.
    pub fn select(&mut self, id: &str, additive: bool) {
        if !additive {
            self.selected.clear();
            self.selected.insert(id.to_string());
            self.primary = Some(id.to_string());
            return;
        }
        if self.selected.remove(id) {
            if self.primary.as_deref() == Some(id) {
                self.primary = self.selected.iter().next().cloned();
            }
        } else {
            self.selected.insert(id.to_string());
            self.primary = Some(id.to_string());
        }
    }

    /// Click selection: picks the topmost interactive layer under `point`.
    /// A miss without `additive` clears the selection.
    pub fn select_at(
        &mut self,
        point: Point,
        layers: &[Layer],
        tolerance: f64,
        additive: bool,
    ) -> Option<String> {
        let hit = hit_layer(layers, point, tolerance).map(|l| l.id.clone());
        match &hit {
            Some(id) => self.select(id, additive),
            None if !additive => self.deselect_all(),
            None => {}
        }
        hit
    }

    /// Select every visible, unlocked, non-group layer.
    pub fn select_all(&mut self, layers: &[Layer]) {
        self.selected = layers
            .iter()
            .filter(|l| l.is_interactive() && !l.is_group())
            .map(|l| l.id.clone())
            .collect();
        self.primary = layers
            .iter()
            .rev()
            .find(|l| self.selected.contains(&l.id))
            .map(|l| l.id.clone());
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.primary = None;
    }

    pub fn remove(&mut self, id: &str) {
        self.selected.remove(id);
        if self.primary.as_deref() == Some(id) {
            self.primary = self.selected.iter().next().cloned();
        }
    }

    /// Drop ids that no longer exist, or are now hidden or locked.
    pub fn retain_existing(&mut self, layers: &[Layer]) {
        self.selected
            .retain(|id| layers.iter().any(|l| &l.id == id && l.is_interactive()));
        if let Some(p) = &self.primary {
            if !self.selected.contains(p) {
                self.primary = self.selected.iter().next().cloned();
            }
        }
    }

    pub fn is_marquee_active(&self) -> bool {
        self.marquee.is_some()
    }

    /// Begin a rectangle selection at `point`. With `additive` the current
    /// selection is kept and the rectangle adds to it.
    pub fn start_marquee_selection(&mut self, point: Point, additive: bool) {
        let original = self.selected.clone();
        let base = if additive {
            original.clone()
        } else {
            HashSet::new()
        };
        self.marquee = Some(Marquee {
            anchor: point,
            current: point,
            base,
            original,
            original_primary: self.primary.clone(),
        });
        if !additive {
            self.deselect_all();
        }
    }

    /// Move the free corner to `point` and recompute the selection.
    pub fn update_marquee_selection(&mut self, point: Point, layers: &[Layer]) {
        let Some(marquee) = self.marquee.as_mut() else {
            return;
        };
        marquee.current = point;
        let rect = Bounds::from_corners(marquee.anchor, marquee.current);
        let mut next = marquee.base.clone();
        let mut last_hit = None;
        for layer in layers {
            if !layer.is_interactive() || layer.is_group() {
                continue;
            }
            if layer.bounds().is_some_and(|b| b.intersects(&rect)) {
                next.insert(layer.id.clone());
                last_hit = Some(layer.id.clone());
            }
        }
        self.selected = next;
        self.primary = last_hit.or_else(|| self.selected.iter().next().cloned());
    }

    /// End the marquee, keeping the computed selection. Returns the final
    /// rectangle.
    pub fn finish_marquee_selection(&mut self) -> Option<Bounds> {
        let marquee = self.marquee.take()?;
        tracing::debug!("Marquee selected {} layer(s)", self.selected.len());
        Some(Bounds::from_corners(marquee.anchor, marquee.current))
    }

    /// End the marquee and restore the selection it started from.
    pub fn cancel_marquee_selection(&mut self) {
        if let Some(marquee) = self.marquee.take() {
            self.selected = marquee.original;
            self.primary = marquee.original_primary;
        }
    }

    /// Current marquee rectangle, for painting.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        self.marquee
            .as_ref()
            .map(|m| Bounds::from_corners(m.anchor, m.current))
    }
}

/// Topmost visible, unlocked, non-group layer under `point`.
pub fn hit_layer(layers: &[Layer], point: Point, tolerance: f64) -> Option<&Layer> {
    layers
        .iter()
        .rev()
        .filter(|l| l.is_interactive() && !l.is_group())
        .find(|l| layer_contains_point(l, point, tolerance))
}

/// Union of the unrotated bounds of the given layers; groups contribute
/// their descendants.
pub fn selection_bounds<'a>(
    layers: &[Layer],
    ids: impl IntoIterator<Item = &'a str>,
) -> Option<Bounds> {
    let ids: Vec<&str> = ids.into_iter().collect();
    union_bounds(
        layers
            .iter()
            .filter(|l| ids.contains(&l.id.as_str()))
            .filter_map(|l| resolved_bounds(l, layers)),
    )
}
