//! Snapshot-based undo/redo.
//!
//! Every committed change stores a deep copy of the whole layer array. The
//! cursor points at the entry matching the current document; undo and redo
//! move it and hand back a copy of the layers to install.

use crate::model::Layer;
use chrono::{DateTime, Utc};
use layerkit_settings::HistorySettings;
use serde::{Deserialize, Serialize};

/// One recorded document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub description: String,
    pub layers: Vec<Layer>,
    pub timestamp: DateTime<Utc>,
    /// Serialized length in bytes, cached at creation.
    #[serde(skip)]
    size: usize,
}

impl HistoryEntry {
    pub fn new(description: impl Into<String>, layers: &[Layer]) -> Self {
        let layers = layers.to_vec();
        let size = serde_json::to_vec(&layers).map(|v| v.len()).unwrap_or(0);
        Self {
            description: description.into(),
            layers,
            timestamp: Utc::now(),
            size,
        }
    }

    /// Estimated memory footprint in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug, Clone)]
struct Batch {
    description: String,
    depth: usize,
    snapshot: Vec<Layer>,
    buffered: usize,
}

/// Linear undo/redo history with batching and memory-bounded compression.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    current: Option<usize>,
    max_size: usize,
    memory_threshold: usize,
    batch: Option<Batch>,
    saved: Option<usize>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(&HistorySettings::default())
    }
}

impl HistoryManager {
    pub fn new(settings: &HistorySettings) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            max_size: settings.max_size.max(1),
            memory_threshold: settings.memory_threshold_bytes,
            batch: None,
            saved: None,
        }
    }

    /// Record `layers` as the newest state. Any redo tail is discarded.
    /// While a batch is open the save is only counted; the batch commit
    /// records a single entry instead.
    pub fn save_state(&mut self, description: &str, layers: &[Layer]) {
        if let Some(batch) = self.batch.as_mut() {
            batch.buffered += 1;
            tracing::trace!("Buffered '{}' into batch '{}'", description, batch.description);
            return;
        }

        let keep = self.current.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        if self.saved.is_some_and(|s| s >= keep) {
            self.saved = None;
        }
        self.entries.push(HistoryEntry::new(description, layers));
        self.current = Some(self.entries.len() - 1);

        while self.entries.len() > self.max_size {
            self.drop_oldest();
        }
        if self.memory_usage() > self.memory_threshold {
            let removed = self.compress_history();
            tracing::debug!("History over memory threshold; dropped {} entries", removed);
        }
        tracing::debug!(
            "Saved history entry '{}' ({} of {})",
            description,
            self.entries.len(),
            self.max_size
        );
    }

    fn drop_oldest(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.remove(0);
        self.current = self.current.and_then(|c| c.checked_sub(1));
        self.saved = self.saved.and_then(|s| s.checked_sub(1));
    }

    /// Step back one entry. `None` at the oldest entry or inside a batch.
    pub fn undo(&mut self) -> Option<Vec<Layer>> {
        if self.batch.is_some() {
            tracing::warn!("Undo ignored while a batch is open");
            return None;
        }
        let current = self.current?;
        if current == 0 {
            return None;
        }
        tracing::debug!("Undo '{}'", self.entries[current].description);
        self.current = Some(current - 1);
        Some(self.entries[current - 1].layers.clone())
    }

    /// Step forward one entry. `None` at the newest entry or inside a batch.
    pub fn redo(&mut self) -> Option<Vec<Layer>> {
        if self.batch.is_some() {
            tracing::warn!("Redo ignored while a batch is open");
            return None;
        }
        let next = self.current.map_or(0, |c| c + 1);
        let entry = self.entries.get(next)?;
        tracing::debug!("Redo '{}'", entry.description);
        self.current = Some(next);
        Some(entry.layers.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.batch.is_none() && self.current.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.batch.is_none() && self.current.map_or(0, |c| c + 1) < self.entries.len()
    }

    /// Description of the change `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.current
            .filter(|c| *c > 0)
            .map(|c| self.entries[c].description.as_str())
    }

    /// Description of the change `redo` would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        let next = self.current.map_or(0, |c| c + 1);
        self.entries.get(next).map(|e| e.description.as_str())
    }

    /// Open a batch. Nested calls only deepen the current batch; the
    /// outermost commit records.
    pub fn start_batch(&mut self, description: &str, layers: &[Layer]) {
        if let Some(batch) = self.batch.as_mut() {
            batch.depth += 1;
            return;
        }
        tracing::debug!("Started history batch '{}'", description);
        self.batch = Some(Batch {
            description: description.to_string(),
            depth: 1,
            snapshot: layers.to_vec(),
            buffered: 0,
        });
    }

    /// Close one batch level. The outermost commit records exactly one entry
    /// if anything was saved inside the batch, and reports whether it did.
    pub fn commit_batch(&mut self, layers: &[Layer]) -> bool {
        match self.batch.as_mut() {
            None => false,
            Some(batch) if batch.depth > 1 => {
                batch.depth -= 1;
                false
            }
            Some(_) => {
                let Some(batch) = self.batch.take() else {
                    return false;
                };
                if batch.buffered == 0 {
                    tracing::debug!("Batch '{}' committed empty", batch.description);
                    return false;
                }
                self.save_state(&batch.description, layers);
                true
            }
        }
    }

    /// Abandon the batch at every nesting level. Returns the layers as they
    /// were when the batch opened; history itself is untouched.
    pub fn cancel_batch(&mut self) -> Option<Vec<Layer>> {
        let batch = self.batch.take()?;
        tracing::debug!("Cancelled history batch '{}'", batch.description);
        Some(batch.snapshot)
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Sum of the cached entry sizes in bytes.
    pub fn memory_usage(&self) -> usize {
        self.entries.iter().map(HistoryEntry::size).sum()
    }

    /// Drop the oldest entries until usage is below three quarters of the
    /// threshold. The cursor entry is never dropped. Returns how many
    /// entries were removed.
    pub fn compress_history(&mut self) -> usize {
        let target = self.memory_threshold / 4 * 3;
        let mut removed = 0;
        while self.memory_usage() > target && self.current.is_some_and(|c| c > 0) {
            self.drop_oldest();
            removed += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
        self.batch = None;
        self.saved = None;
    }

    /// Forget everything and start over from `layers`.
    pub fn reset(&mut self, layers: &[Layer], description: &str) {
        self.clear();
        self.save_state(description, layers);
        self.saved = self.current;
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.current;
    }

    /// Whether the document moved away from the last `mark_saved` point.
    pub fn is_dirty(&self) -> bool {
        self.saved != self.current
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
