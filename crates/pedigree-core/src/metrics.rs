//! Node sizing.
//!
//! The core never measures text or boxes itself: widths and heights come
//! from a `NodeMetrics` implementation supplied by the embedder and are
//! re-queried on every use.

use crate::id::NodeId;
use crate::model::PedigreeGraph;
use std::collections::{HashMap, HashSet};

/// Width/height lookup per node id. Must be pure.
pub trait NodeMetrics {
    fn width(&self, id: NodeId) -> f32;
    fn height(&self, id: NodeId) -> f32;
}

impl<M: NodeMetrics + ?Sized> NodeMetrics for &M {
    fn width(&self, id: NodeId) -> f32 {
        (**self).width(id)
    }

    fn height(&self, id: NodeId) -> f32 {
        (**self).height(id)
    }
}

impl<M: NodeMetrics + ?Sized> NodeMetrics for Box<M> {
    fn width(&self, id: NodeId) -> f32 {
        (**self).width(id)
    }

    fn height(&self, id: NodeId) -> f32 {
        (**self).height(id)
    }
}

/// Fixed per-kind sizes with per-id overrides.
#[derive(Debug, Clone)]
pub struct SizeTable {
    pub individual: (f32, f32),
    pub family: (f32, f32),
    families: HashSet<NodeId>,
    overrides: HashMap<NodeId, (f32, f32)>,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            individual: (120.0, 40.0),
            family: (16.0, 16.0),
            families: HashSet::new(),
            overrides: HashMap::new(),
        }
    }
}

impl SizeTable {
    /// Default sizes, with family ids taken from `graph`.
    pub fn for_graph(graph: &PedigreeGraph) -> Self {
        Self {
            families: graph.families().map(|f| f.id).collect(),
            ..Self::default()
        }
    }

    /// Every node the same size. Handy for geometry tests.
    pub fn uniform(width: f32, height: f32) -> Self {
        Self {
            individual: (width, height),
            family: (width, height),
            ..Self::default()
        }
    }

    pub fn with_individual_size(mut self, width: f32, height: f32) -> Self {
        self.individual = (width, height);
        self
    }

    pub fn with_family_size(mut self, width: f32, height: f32) -> Self {
        self.family = (width, height);
        self
    }

    pub fn set_size(&mut self, id: NodeId, width: f32, height: f32) {
        self.overrides.insert(id, (width, height));
    }

    fn size(&self, id: NodeId) -> (f32, f32) {
        if let Some(size) = self.overrides.get(&id) {
            *size
        } else if self.families.contains(&id) {
            self.family
        } else {
            self.individual
        }
    }
}

impl NodeMetrics for SizeTable {
    fn width(&self, id: NodeId) -> f32 {
        self.size(id).0
    }

    fn height(&self, id: NodeId) -> f32 {
        self.size(id).1
    }
}
