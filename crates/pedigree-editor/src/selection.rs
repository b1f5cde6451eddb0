//! Selection model.
//!
//! Holds the selected ids and nothing else. Rectangle selection needs a
//! `BoundsProvider`, passed in by the caller for each query; the selected
//! set is handed to renderers the same way, by parameter.

use pedigree_core::{Bounds, Identify, NodeId, NodeMetrics, PositionStore, Result, resolve_id};
use smallvec::SmallVec;

/// Rectangle lookup for marquee selection.
pub trait BoundsProvider {
    fn bounds_of(&self, id: NodeId) -> Option<Bounds>;
    fn selectable_ids(&self) -> Vec<NodeId>;
}

/// Bounds straight from a position store plus node metrics.
pub struct StoreBounds<'a> {
    store: &'a PositionStore,
    metrics: &'a dyn NodeMetrics,
}

impl<'a> StoreBounds<'a> {
    pub fn new(store: &'a PositionStore, metrics: &'a dyn NodeMetrics) -> Self {
        Self { store, metrics }
    }
}

impl BoundsProvider for StoreBounds<'_> {
    fn bounds_of(&self, id: NodeId) -> Option<Bounds> {
        self.store.bounds_of(id, self.metrics)
    }

    fn selectable_ids(&self) -> Vec<NodeId> {
        self.store.ids().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Selected ids, no duplicates. Order carries no meaning.
    selected: SmallVec<[NodeId; 8]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Replace the selection with `{id}`.
    pub fn select_single(&mut self, id: NodeId) -> bool {
        if self.selected.len() == 1 && self.selected[0] == id {
            return false;
        }
        self.selected.clear();
        self.selected.push(id);
        true
    }

    /// Resolve `obj` to an id and select only it.
    ///
    /// Fails with `InvalidArgument` if `obj` is absent or has no id.
    pub fn select_object<T: Identify + ?Sized>(&mut self, obj: Option<&T>) -> Result<bool> {
        let id = resolve_id(obj)?;
        Ok(self.select_single(id))
    }

    /// Add `id` unless it is already selected.
    pub fn add(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Resolve `obj` to an id and add it to the selection.
    pub fn add_object<T: Identify + ?Sized>(&mut self, obj: Option<&T>) -> Result<bool> {
        let id = resolve_id(obj)?;
        Ok(self.add(id))
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| *s != id);
        self.selected.len() != before
    }

    /// Shift-click: add if absent, remove if present.
    pub fn toggle(&mut self, id: NodeId) {
        if !self.remove(id) {
            self.selected.push(id);
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Replace the selection with every id whose bounds overlap `rect` with
    /// positive area. Without a provider this does nothing.
    pub fn select_in_rect(&mut self, rect: Bounds, provider: Option<&dyn BoundsProvider>) -> bool {
        let Some(provider) = provider else {
            return false;
        };
        let hits = Self::ids_in_rect(rect, provider);
        let changed =
            hits.len() != self.selected.len() || hits.iter().any(|id| !self.contains(*id));
        self.selected = hits;
        changed
    }

    /// Union the ids overlapping `rect` into the selection (shift-marquee).
    pub fn add_in_rect(&mut self, rect: Bounds, provider: Option<&dyn BoundsProvider>) -> bool {
        let Some(provider) = provider else {
            return false;
        };
        let mut changed = false;
        for id in Self::ids_in_rect(rect, provider) {
            changed |= self.add(id);
        }
        changed
    }

    pub fn select_all(&mut self, provider: &dyn BoundsProvider) -> bool {
        let mut changed = false;
        for id in provider.selectable_ids() {
            changed |= self.add(id);
        }
        changed
    }

    /// Overlapping ids in provider order, each at most once.
    fn ids_in_rect(rect: Bounds, provider: &dyn BoundsProvider) -> SmallVec<[NodeId; 8]> {
        let mut hits: SmallVec<[NodeId; 8]> = SmallVec::new();
        for id in provider.selectable_ids() {
            if hits.contains(&id) {
                continue;
            }
            if provider.bounds_of(id).is_some_and(|b| b.intersects(&rect)) {
                hits.push(id);
            }
        }
        hits
    }
}
