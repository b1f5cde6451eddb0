//! Hit testing: point → node lookup.
//!
//! Walks the position store back to front, so a node written later wins
//! where rectangles overlap.

use pedigree_core::{NodeId, NodeMetrics, PositionStore};

/// Find the topmost node containing layout-space point (px, py).
/// Returns `None` if no node is hit (background).
pub fn hit_test(
    store: &PositionStore,
    metrics: &dyn NodeMetrics,
    px: f32,
    py: f32,
) -> Option<NodeId> {
    let ids: Vec<NodeId> = store.ids().collect();
    ids.into_iter().rev().find(|&id| {
        store
            .bounds_of(id, metrics)
            .is_some_and(|b| b.contains(px, py))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::SizeTable;

    #[test]
    fn hit_test_background() {
        let mut store = PositionStore::new();
        store.set(NodeId::intern("far"), 500.0, 500.0);
        let metrics = SizeTable::uniform(10.0, 10.0);
        assert_eq!(hit_test(&store, &metrics, 0.0, 0.0), None);
    }

    #[test]
    fn hit_test_prefers_latest() {
        let mut store = PositionStore::new();
        store.set(NodeId::intern("under"), 0.0, 0.0);
        store.set(NodeId::intern("over"), 5.0, 5.0);
        let metrics = SizeTable::uniform(10.0, 10.0);

        assert_eq!(hit_test(&store, &metrics, 7.0, 7.0), Some(NodeId::intern("over")));
        assert_eq!(hit_test(&store, &metrics, 2.0, 2.0), Some(NodeId::intern("under")));
        // Edges count.
        assert_eq!(hit_test(&store, &metrics, 15.0, 15.0), Some(NodeId::intern("over")));
    }
}
