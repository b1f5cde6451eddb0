//! Position store: the single source of truth for node coordinates.
//!
//! Positions are layout-space top-left corners. An entry is created on
//! first write and lives until overwritten; there is no removal, so a
//! stale store is replaced by building a new one.

use crate::id::NodeId;
use crate::metrics::NodeMetrics;
use crate::model::{Bounds, Point};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStore {
    positions: HashMap<NodeId, Point>,
    /// First-write order of ids.
    order: Vec<NodeId>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the position of `id`.
    pub fn set(&mut self, id: NodeId, x: f32, y: f32) {
        let point = Point::new(x, y);
        if self.positions.insert(id, point).is_none() {
            self.order.push(id);
        }
    }

    pub fn set_point(&mut self, id: NodeId, point: Point) {
        self.set(id, point.x, point.y);
    }

    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Ids with a recorded position, in insertion order.
    /// Each call returns a fresh iterator.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// `(id, position)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.order.iter().map(|id| (*id, self.positions[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bounding box of `id` using `metrics` for its size.
    pub fn bounds_of(&self, id: NodeId, metrics: &dyn NodeMetrics) -> Option<Bounds> {
        self.get(id)
            .map(|p| Bounds::new(p.x, p.y, metrics.width(id), metrics.height(id)))
    }

    /// Union of every positioned node's bounds, or `None` when empty.
    pub fn extent(&self, metrics: &dyn NodeMetrics) -> Option<Bounds> {
        self.ids()
            .filter_map(|id| self.bounds_of(id, metrics))
            .reduce(|acc, b| acc.union(&b))
    }
}

#[derive(Serialize)]
struct Entry {
    id: NodeId,
    x: f32,
    y: f32,
}

/// Serialized as an ordered list of `{ id, x, y }` entries.
impl Serialize for PositionStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (id, p) in self.iter() {
            seq.serialize_element(&Entry { id, x: p.x, y: p.y })?;
        }
        seq.end()
    }
}
