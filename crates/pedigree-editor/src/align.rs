//! Align and distribute.
//!
//! Pure geometry over a `PositionAccessor`, so it works against the
//! position store or any stand-in. Each operation is split into a plan
//! (`NodeMove`s computed from one snapshot of the selection) and an apply
//! step; the editor records plans as undoable commands.

use pedigree_core::{NodeId, NodeMetrics, Point, PositionStore};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Top,
    Middle,
    Bottom,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// Minimal rectangle read/write surface keyed by id.
/// Getters return `None` for ids without a position.
pub trait PositionAccessor {
    fn x(&self, id: NodeId) -> Option<f32>;
    fn y(&self, id: NodeId) -> Option<f32>;
    fn width(&self, id: NodeId) -> Option<f32>;
    fn height(&self, id: NodeId) -> Option<f32>;
    fn set_x(&mut self, id: NodeId, x: f32);
    fn set_y(&mut self, id: NodeId, y: f32);
}

/// `PositionAccessor` over a position store and node metrics.
pub struct StoreAccessor<'a> {
    store: &'a mut PositionStore,
    metrics: &'a dyn NodeMetrics,
}

impl<'a> StoreAccessor<'a> {
    pub fn new(store: &'a mut PositionStore, metrics: &'a dyn NodeMetrics) -> Self {
        Self { store, metrics }
    }
}

impl PositionAccessor for StoreAccessor<'_> {
    fn x(&self, id: NodeId) -> Option<f32> {
        self.store.get(id).map(|p| p.x)
    }

    fn y(&self, id: NodeId) -> Option<f32> {
        self.store.get(id).map(|p| p.y)
    }

    fn width(&self, id: NodeId) -> Option<f32> {
        self.store.contains(id).then(|| self.metrics.width(id))
    }

    fn height(&self, id: NodeId) -> Option<f32> {
        self.store.contains(id).then(|| self.metrics.height(id))
    }

    fn set_x(&mut self, id: NodeId, x: f32) {
        if let Some(p) = self.store.get(id) {
            self.store.set(id, x, p.y);
        }
    }

    fn set_y(&mut self, id: NodeId, y: f32) {
        if let Some(p) = self.store.get(id) {
            self.store.set(id, p.x, y);
        }
    }
}

/// One planned repositioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMove {
    pub id: NodeId,
    pub from: Point,
    pub to: Point,
}

pub type MovePlan = SmallVec<[NodeMove; 8]>;

#[derive(Debug, Clone, Copy)]
struct Member {
    id: NodeId,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

fn snapshot(accessor: &dyn PositionAccessor, ids: &[NodeId]) -> SmallVec<[Member; 8]> {
    ids.iter()
        .filter_map(|&id| {
            Some(Member {
                id,
                x: accessor.x(id)?,
                y: accessor.y(id)?,
                w: accessor.width(id)?,
                h: accessor.height(id)?,
            })
        })
        .collect()
}

/// Plan an alignment of `ids` against their combined bounding box.
/// Empty when one node or fewer is selected.
pub fn plan_align(accessor: &dyn PositionAccessor, ids: &[NodeId], mode: Alignment) -> MovePlan {
    if ids.len() <= 1 {
        return MovePlan::new();
    }
    let members = snapshot(accessor, ids);
    let Some(first) = members.first() else {
        return MovePlan::new();
    };

    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x + first.w, first.y + first.h);
    for m in &members[1..] {
        min_x = min_x.min(m.x);
        min_y = min_y.min(m.y);
        max_x = max_x.max(m.x + m.w);
        max_y = max_y.max(m.y + m.h);
    }
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    members
        .iter()
        .map(|m| {
            let (x, y) = match mode {
                Alignment::Top => (m.x, min_y),
                Alignment::Middle => (m.x, mid_y - m.h / 2.0),
                Alignment::Bottom => (m.x, max_y - m.h),
                Alignment::Left => (min_x, m.y),
                Alignment::Center => (mid_x - m.w / 2.0, m.y),
                Alignment::Right => (max_x - m.w, m.y),
            };
            NodeMove {
                id: m.id,
                from: Point::new(m.x, m.y),
                to: Point::new(x, y),
            }
        })
        .collect()
}

/// Plan an even spread of `ids` between the outermost two along `mode`'s
/// axis. Empty when two nodes or fewer are selected. The gap may come out
/// negative, in which case neighbours overlap.
pub fn plan_distribute(
    accessor: &dyn PositionAccessor,
    ids: &[NodeId],
    mode: Distribution,
) -> MovePlan {
    if ids.len() <= 2 {
        return MovePlan::new();
    }
    let mut members = snapshot(accessor, ids);
    if members.len() <= 2 {
        return MovePlan::new();
    }

    let axis = |m: &Member| match mode {
        Distribution::Horizontal => (m.x, m.w),
        Distribution::Vertical => (m.y, m.h),
    };
    members.sort_by(|a, b| axis(a).0.total_cmp(&axis(b).0));

    let (start, _) = axis(&members[0]);
    let (last_pos, last_size) = axis(&members[members.len() - 1]);
    let span = last_pos + last_size - start;
    let total: f32 = members.iter().map(|m| axis(m).1).sum();
    let gap = (span - total) / (members.len() - 1) as f32;

    let mut cursor = start;
    members
        .iter()
        .map(|m| {
            let to = match mode {
                Distribution::Horizontal => Point::new(cursor, m.y),
                Distribution::Vertical => Point::new(m.x, cursor),
            };
            cursor += axis(m).1 + gap;
            NodeMove {
                id: m.id,
                from: Point::new(m.x, m.y),
                to,
            }
        })
        .collect()
}

/// Write the `to` side of each move through the accessor.
/// Returns `true` if any coordinate changed.
pub fn apply_plan(accessor: &mut dyn PositionAccessor, plan: &[NodeMove]) -> bool {
    let mut changed = false;
    for mv in plan {
        if mv.from.x != mv.to.x {
            accessor.set_x(mv.id, mv.to.x);
            changed = true;
        }
        if mv.from.y != mv.to.y {
            accessor.set_y(mv.id, mv.to.y);
            changed = true;
        }
    }
    changed
}

/// Align in place. Returns `true` if anything moved.
pub fn align(accessor: &mut dyn PositionAccessor, ids: &[NodeId], mode: Alignment) -> bool {
    let plan = plan_align(accessor, ids, mode);
    apply_plan(accessor, &plan)
}

/// Distribute in place. Returns `true` if anything moved.
pub fn distribute(accessor: &mut dyn PositionAccessor, ids: &[NodeId], mode: Distribution) -> bool {
    let plan = plan_distribute(accessor, ids, mode);
    apply_plan(accessor, &plan)
}
