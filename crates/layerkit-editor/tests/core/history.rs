use layerkit_editor::{HistoryEntry, HistoryManager, Layer, Shape};
use layerkit_settings::HistorySettings;

fn doc(widths: &[f64]) -> Vec<Layer> {
    widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            Layer::with_id(
                format!("layer_{}", i),
                Shape::Rectangle {
                    x: 0.0,
                    y: 0.0,
                    width: *w,
                    height: 10.0,
                },
            )
        })
        .collect()
}

#[test]
fn test_history_manager_creation() {
    let manager = HistoryManager::default();
    assert!(manager.is_empty());
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.max_size(), 50);
    assert_eq!(manager.memory_usage(), 0);
}

#[test]
fn test_undo_then_save_drops_redo() {
    let mut manager = HistoryManager::default();
    manager.save_state("Initial state", &doc(&[]));
    manager.save_state("Draw rectangle", &doc(&[10.0]));
    manager.save_state("Draw rectangle", &doc(&[10.0, 20.0]));

    assert_eq!(manager.undo(), Some(doc(&[10.0])));
    assert!(manager.can_redo());
    assert_eq!(manager.redo_description(), Some("Draw rectangle"));

    manager.save_state("Resize layers", &doc(&[30.0]));
    assert!(!manager.can_redo());
    assert_eq!(manager.len(), 3);
    assert_eq!(manager.undo(), Some(doc(&[10.0])));
}

#[test]
fn test_undo_redo_return_independent_copies() {
    let mut manager = HistoryManager::default();
    manager.save_state("a", &doc(&[10.0]));
    manager.save_state("b", &doc(&[20.0]));
    let mut restored = manager.undo().unwrap();
    restored[0].visible = false;
    assert_eq!(manager.redo(), Some(doc(&[20.0])));
    assert_eq!(manager.undo(), Some(doc(&[10.0])));
}

#[test]
fn test_eviction_caps_length_at_max() {
    let mut manager = HistoryManager::new(&HistorySettings {
        max_size: 5,
        ..HistorySettings::default()
    });
    for i in 0..12 {
        manager.save_state(&format!("step {}", i), &doc(&[i as f64]));
    }
    assert_eq!(manager.len(), 5);
    assert_eq!(manager.current_index(), Some(4));
    assert_eq!(manager.entries()[0].description, "step 7");

    let mut undos = 0;
    while manager.undo().is_some() {
        undos += 1;
    }
    assert_eq!(undos, 4);
}

#[test]
fn test_batch_is_atomic() {
    let mut manager = HistoryManager::default();
    manager.save_state("Initial state", &doc(&[]));
    let before = manager.len();

    manager.start_batch("Paste layers", &doc(&[]));
    for n in 1..=4 {
        let widths: Vec<f64> = (0..n).map(|i| i as f64 + 10.0).collect();
        manager.save_state("Add rectangle", &doc(&widths));
    }
    assert_eq!(manager.len(), before);
    assert!(manager.commit_batch(&doc(&[10.0, 11.0, 12.0, 13.0])));
    assert_eq!(manager.len(), before + 1);

    assert_eq!(manager.undo(), Some(doc(&[])));
    assert_eq!(manager.redo(), Some(doc(&[10.0, 11.0, 12.0, 13.0])));
}

#[test]
fn test_cancelled_batch_leaves_history_untouched() {
    let mut manager = HistoryManager::default();
    manager.save_state("Initial state", &doc(&[5.0]));
    manager.start_batch("Paste layers", &doc(&[5.0]));
    manager.save_state("Add rectangle", &doc(&[5.0, 6.0]));
    assert_eq!(manager.cancel_batch(), Some(doc(&[5.0])));
    assert_eq!(manager.len(), 1);
    assert!(!manager.commit_batch(&doc(&[5.0])));
}

#[test]
fn test_memory_usage_tracks_entry_sizes() {
    let mut manager = HistoryManager::default();
    let layers = doc(&[1.0, 2.0, 3.0]);
    manager.save_state("a", &layers);
    manager.save_state("b", &layers);
    let one = HistoryEntry::new("x", &layers).size();
    assert!(one > 0);
    assert_eq!(manager.memory_usage(), 2 * one);
}

#[test]
fn test_compress_history_never_drops_cursor() {
    let layers = doc(&[1.0, 2.0, 3.0, 4.0]);
    let one = HistoryEntry::new("x", &layers).size();
    let mut manager = HistoryManager::new(&HistorySettings {
        max_size: 50,
        memory_threshold_bytes: one / 2,
    });
    for i in 0..6 {
        manager.save_state(&format!("s{}", i), &layers);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.entries()[0].description, format!("s{}", i));
    }
    assert_eq!(manager.compress_history(), 0);
}

#[test]
fn test_compress_history_after_undo_keeps_redo_tail() {
    let layers = doc(&[1.0, 2.0]);
    let one = HistoryEntry::new("x", &layers).size();
    let mut manager = HistoryManager::new(&HistorySettings {
        max_size: 50,
        memory_threshold_bytes: one * 100,
    });
    for i in 0..6 {
        manager.save_state(&format!("s{}", i), &layers);
    }
    manager.undo();
    manager.undo();
    let len = manager.len();
    assert_eq!(manager.compress_history(), 0);
    assert_eq!(manager.len(), len);
    assert_eq!(manager.redo_description(), Some("s4"));
}

#[test]
fn test_reset_starts_clean() {
    let mut manager = HistoryManager::default();
    manager.save_state("a", &doc(&[1.0]));
    manager.save_state("b", &doc(&[2.0]));
    manager.reset(&doc(&[3.0]), "Initial state");
    assert_eq!(manager.len(), 1);
    assert!(!manager.can_undo());
    assert!(!manager.is_dirty());
    assert_eq!(manager.entries()[0].description, "Initial state");
}
