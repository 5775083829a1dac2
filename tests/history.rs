//! Undo/redo stack, debouncing and the manual clock.
mod common;
use common::*;
use proptest::prelude::*;
use simflow::history::{Debouncer, HistorySnapshot};
use simflow::prelude::*;
use std::time::Duration;

fn nodes_named(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| node(id, NodeKind::Chat)).collect()
}

fn snapshot_ids(snapshot: &HistorySnapshot) -> Vec<&str> {
    snapshot.nodes().iter().map(|n| n.id.as_str()).collect()
}

#[cfg(test)]
mod history_manager_tests {
    use super::*;

    #[test]
    fn test_empty_history_has_nothing_to_undo() {
        let mut history = HistoryManager::default();

        assert_eq!(history.max_size(), 50);
        assert_eq!(history.cursor(), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_and_redo_walk_the_stack() {
        let mut history = HistoryManager::new(10);
        history.push_state(&nodes_named(&["a"]), &[]);
        history.push_state(&nodes_named(&["a", "b"]), &[]);
        history.push_state(&nodes_named(&["a", "b", "c"]), &[]);

        assert!(history.can_undo());
        assert!(!history.can_redo());

        let snapshot = history.undo().expect("can undo");
        assert_eq!(snapshot_ids(snapshot), vec!["a", "b"]);
        let snapshot = history.undo().expect("can undo");
        assert_eq!(snapshot_ids(snapshot), vec!["a"]);
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));

        let snapshot = history.redo().expect("can redo");
        assert_eq!(snapshot_ids(snapshot), vec!["a", "b"]);
        assert!(history.can_redo());
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = HistoryManager::new(10);
        history.push_state(&nodes_named(&["a"]), &[]);
        history.push_state(&nodes_named(&["a", "b"]), &[]);
        history.undo();

        history.push_state(&nodes_named(&["a", "z"]), &[]);

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        let current = history.current().expect("not empty");
        assert_eq!(snapshot_ids(current), vec!["a", "z"]);
    }

    #[test]
    fn test_snapshots_are_deep_copies() {
        let mut history = HistoryManager::new(10);
        let mut nodes = nodes_named(&["a"]);
        history.push_state(&nodes, &[]);

        nodes[0].position = Position::new(500.0, 500.0);

        let stored = history.current().expect("not empty");
        assert_eq!(stored.nodes()[0].position, Position::default());
    }

    #[test]
    fn test_oldest_snapshot_is_evicted_first() {
        let mut history = HistoryManager::new(3);
        for id in ["a", "b", "c", "d", "e"] {
            history.push_state(&nodes_named(&[id]), &[]);
        }

        assert_eq!(history.len(), 3);
        let mut seen = Vec::new();
        while let Some(snapshot) = history.undo() {
            seen.push(snapshot_ids(snapshot)[0].to_string());
        }
        assert_eq!(seen, vec!["d", "c"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_snapshot() {
        let mut history = HistoryManager::new(0);
        history.push_state(&nodes_named(&["a"]), &[]);
        history.push_state(&nodes_named(&["b"]), &[]);

        assert_eq!(history.max_size(), 1);
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut history = HistoryManager::new(5);
        history.push_state(&nodes_named(&["a"]), &[]);
        history.push_state(&nodes_named(&["b"]), &[]);

        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
    }
}

#[cfg(test)]
mod debounce_tests {
    use super::*;

    #[test]
    fn test_debouncer_fires_once_after_quiet_period() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        assert!(!debouncer.schedule(clock.now()));
        clock.advance(Duration::from_millis(499));
        assert!(!debouncer.fire_if_due(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(debouncer.fire_if_due(clock.now()));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(clock.now()));
    }

    #[test]
    fn test_rescheduling_restarts_the_quiet_period() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(clock.now());
        clock.advance(Duration::from_millis(400));
        assert!(debouncer.schedule(clock.now()));
        clock.advance(Duration::from_millis(400));

        assert!(!debouncer.fire_if_due(clock.now()));
        clock.advance(Duration::from_millis(100));
        assert!(debouncer.fire_if_due(clock.now()));
    }

    #[test]
    fn test_cancel_drops_pending_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        debouncer.schedule(clock.now());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        clock.advance(Duration::from_secs(1));
        assert!(!debouncer.fire_if_due(clock.now()));
    }

    #[test]
    fn test_manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        let start = clock.now();

        assert_eq!(clock.now(), start);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }
}

proptest! {
    #[test]
    fn prop_history_never_exceeds_max_size(max_size in 1usize..20, pushes in 0usize..60) {
        let mut history = HistoryManager::new(max_size);
        for i in 0..pushes {
            let id = format!("n{}", i);
            history.push_state(&nodes_named(&[id.as_str()]), &[]);
            prop_assert!(history.len() <= max_size);
        }

        // What is left is the newest `max_size` pushes, oldest first.
        let kept = pushes.min(max_size);
        prop_assert_eq!(history.len(), kept);
        let mut expected = pushes;
        while let Some(current) = history.current() {
            expected -= 1;
            let expected_id = format!("n{}", expected);
            prop_assert_eq!(snapshot_ids(current), vec![expected_id.as_str()]);
            if history.undo().is_none() {
                break;
            }
        }
        prop_assert_eq!(expected, pushes - kept);
    }

    #[test]
    fn prop_k_pushes_then_k_undos_restore_the_start(k in 1usize..20) {
        let mut history = HistoryManager::new(50);
        let start = nodes_named(&["start"]);
        history.push_state(&start, &[]);

        for i in 0..k {
            let ids: Vec<String> = (0..=i).map(|j| format!("n{}", j)).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            history.push_state(&nodes_named(&refs), &[]);
        }
        let mut last = None;
        for _ in 0..k {
            last = history.undo().cloned();
        }

        let restored = last.expect("k undos succeed");
        prop_assert_eq!(restored.nodes(), start.as_slice());
        prop_assert!(restored.edges().is_empty());
        prop_assert!(!history.can_undo());
    }
}
