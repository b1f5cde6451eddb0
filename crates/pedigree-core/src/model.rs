//! Core data model for pedigree charts.
//!
//! The chart is a directed graph with two node kinds: individuals and
//! family (union) nodes. Edges go spouse → family and family → child, so
//! every edge is derived from a `Family` record. Insertion order of both
//! kinds is preserved and drives every traversal, which keeps layout
//! deterministic for graphs with remarriages.

use crate::error::{PedigreeError, Result};
use crate::id::NodeId;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Records ─────────────────────────────────────────────────────────────

/// A person in the pedigree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: NodeId,
    /// Display name; purely informational for the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Individual {
    pub fn new(id: NodeId) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// A marriage/partnership record. Source of all edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: NodeId,
    #[serde(default)]
    pub spouse_a: Option<NodeId>,
    #[serde(default)]
    pub spouse_b: Option<NodeId>,
    #[serde(default)]
    pub children: SmallVec<[NodeId; 4]>,
}

impl Family {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            spouse_a: None,
            spouse_b: None,
            children: SmallVec::new(),
        }
    }

    pub fn with_spouses(mut self, a: Option<NodeId>, b: Option<NodeId>) -> Self {
        self.spouse_a = a;
        self.spouse_b = b;
        self
    }

    pub fn with_children(mut self, children: &[NodeId]) -> Self {
        self.children = children.iter().copied().collect();
        self
    }

    /// Spouses in A, B order, skipping absent slots.
    pub fn spouses(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.spouse_a.into_iter().chain(self.spouse_b)
    }

    /// The spouse that is not `id`, if this family has one.
    pub fn partner_of(&self, id: NodeId) -> Option<NodeId> {
        match (self.spouse_a, self.spouse_b) {
            (Some(a), Some(b)) if a == id => Some(b),
            (Some(a), Some(b)) if b == id => Some(a),
            _ => None,
        }
    }
}

/// A node of the pedigree graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PedigreeNode {
    Individual(Individual),
    Family(Family),
}

impl PedigreeNode {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Individual(i) => i.id,
            Self::Family(f) => f.id,
        }
    }

    pub fn is_family(&self) -> bool {
        matches!(self, Self::Family(_))
    }

    pub fn as_family(&self) -> Option<&Family> {
        match self {
            Self::Family(f) => Some(f),
            Self::Individual(_) => None,
        }
    }
}

/// Edge kinds. `Spouse` runs individual → family, `Child` family → individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kinship {
    Spouse,
    Child,
}

// ─── Pedigree Graph ──────────────────────────────────────────────────────

/// Read-only snapshot of individuals and families handed to the layout.
#[derive(Debug, Clone, Default)]
pub struct PedigreeGraph {
    /// The underlying directed graph.
    pub graph: StableDiGraph<PedigreeNode, Kinship>,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    individuals: Vec<NodeIndex>,
    families: Vec<NodeIndex>,
}

impl PedigreeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from ordered individuals and family records.
    pub fn from_records(
        individuals: impl IntoIterator<Item = Individual>,
        families: impl IntoIterator<Item = Family>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        for individual in individuals {
            graph.add_individual(individual)?;
        }
        for family in families {
            graph.add_family(family)?;
        }
        Ok(graph)
    }

    pub fn add_individual(&mut self, individual: Individual) -> Result<NodeIndex> {
        let id = individual.id;
        self.ensure_unused(id)?;
        let idx = self.graph.add_node(PedigreeNode::Individual(individual));
        self.id_index.insert(id, idx);
        self.individuals.push(idx);
        Ok(idx)
    }

    /// Add a family and derive its spouse and child edges.
    ///
    /// Every referenced spouse and child must already be an individual.
    pub fn add_family(&mut self, family: Family) -> Result<NodeIndex> {
        let id = family.id;
        self.ensure_unused(id)?;
        if family.spouse_a.is_some() && family.spouse_a == family.spouse_b {
            return Err(PedigreeError::invalid(format!(
                "family {id} lists the same spouse twice"
            )));
        }
        let spouses: SmallVec<[NodeIndex; 2]> = family
            .spouses()
            .map(|s| self.individual_index(s, id))
            .collect::<Result<_>>()?;
        let children: SmallVec<[NodeIndex; 4]> = family
            .children
            .iter()
            .map(|&c| self.individual_index(c, id))
            .collect::<Result<_>>()?;

        let idx = self.graph.add_node(PedigreeNode::Family(family));
        for spouse in spouses {
            self.graph.add_edge(spouse, idx, Kinship::Spouse);
        }
        for child in children {
            self.graph.add_edge(idx, child, Kinship::Child);
        }
        self.id_index.insert(id, idx);
        self.families.push(idx);
        Ok(idx)
    }

    fn ensure_unused(&self, id: NodeId) -> Result<()> {
        if self.id_index.contains_key(&id) {
            return Err(PedigreeError::invalid(format!("duplicate node id {id}")));
        }
        Ok(())
    }

    fn individual_index(&self, id: NodeId, family: NodeId) -> Result<NodeIndex> {
        match self.id_index.get(&id) {
            Some(&idx) if !self.graph[idx].is_family() => Ok(idx),
            _ => Err(PedigreeError::invalid(format!(
                "family {family} references unknown individual {id}"
            ))),
        }
    }

    /// Look up a node by id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&PedigreeNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn family(&self, id: NodeId) -> Option<&Family> {
        self.get_by_id(id).and_then(PedigreeNode::as_family)
    }

    pub fn is_family(&self, id: NodeId) -> bool {
        self.get_by_id(id).is_some_and(PedigreeNode::is_family)
    }

    /// Individuals in insertion order.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual> + '_ {
        self.individuals.iter().filter_map(|&idx| match &self.graph[idx] {
            PedigreeNode::Individual(i) => Some(i),
            PedigreeNode::Family(_) => None,
        })
    }

    /// Families in insertion order.
    pub fn families(&self) -> impl Iterator<Item = &Family> + '_ {
        self.families
            .iter()
            .filter_map(|&idx| self.graph[idx].as_family())
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Families in which `id` is a spouse, in insertion order.
    pub fn spouse_families(&self, id: NodeId) -> Vec<&Family> {
        self.related(id, Direction::Outgoing, Kinship::Spouse)
            .into_iter()
            .filter_map(|idx| self.graph[idx].as_family())
            .collect()
    }

    /// Families that list `id` as a child, in insertion order.
    pub fn parent_families(&self, id: NodeId) -> Vec<&Family> {
        self.related(id, Direction::Incoming, Kinship::Child)
            .into_iter()
            .filter_map(|idx| self.graph[idx].as_family())
            .collect()
    }

    pub fn is_child(&self, id: NodeId) -> bool {
        !self
            .related(id, Direction::Incoming, Kinship::Child)
            .is_empty()
    }

    pub fn has_spouse_family(&self, id: NodeId) -> bool {
        !self
            .related(id, Direction::Outgoing, Kinship::Spouse)
            .is_empty()
    }

    /// Neighbors of `id` across `kind` edges, sorted by `NodeIndex`.
    /// Indices are never reused (no removal), so this is insertion order.
    fn related(&self, id: NodeId, dir: Direction, kind: Kinship) -> SmallVec<[NodeIndex; 4]> {
        let Some(&idx) = self.id_index.get(&id) else {
            return SmallVec::new();
        };
        let mut out: SmallVec<[NodeIndex; 4]> = self
            .graph
            .edges_directed(idx, dir)
            .filter(|e| *e.weight() == kind)
            .map(|e| if e.source() == idx { e.target() } else { e.source() })
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// A layout-space coordinate (top-left corner of a node).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag rectangle from its start and current corners.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Positive-area overlap. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    fn sample() -> PedigreeGraph {
        PedigreeGraph::from_records(
            ["dad", "mum", "kid", "kid2"].map(|s| Individual::new(id(s))),
            [Family::new(id("fam"))
                .with_spouses(Some(id("dad")), Some(id("mum")))
                .with_children(&[id("kid"), id("kid2")])],
        )
        .unwrap()
    }

    #[test]
    fn family_edges_are_derived() {
        let g = sample();
        assert_eq!(g.individual_count(), 4);
        assert_eq!(g.family_count(), 1);
        assert!(g.is_child(id("kid")));
        assert!(!g.is_child(id("dad")));
        assert!(g.has_spouse_family(id("mum")));
        assert!(!g.has_spouse_family(id("kid")));
        assert_eq!(g.spouse_families(id("dad"))[0].id, id("fam"));
        assert_eq!(g.parent_families(id("kid2"))[0].id, id("fam"));
        assert!(g.is_family(id("fam")));
    }

    #[test]
    fn spouse_families_keep_insertion_order() {
        let mut g = PedigreeGraph::new();
        for s in ["p", "w1", "w2"] {
            g.add_individual(Individual::new(id(s))).unwrap();
        }
        g.add_family(Family::new(id("m1")).with_spouses(Some(id("p")), Some(id("w1"))))
            .unwrap();
        g.add_family(Family::new(id("m2")).with_spouses(Some(id("w2")), Some(id("p"))))
            .unwrap();
        let fams: Vec<NodeId> = g.spouse_families(id("p")).iter().map(|f| f.id).collect();
        assert_eq!(fams, vec![id("m1"), id("m2")]);
    }

    #[test]
    fn unknown_and_duplicate_ids_rejected() {
        let mut g = sample();
        let err = g
            .add_family(Family::new(id("fam2")).with_spouses(Some(id("ghost")), None))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(g.add_individual(Individual::new(id("dad"))).is_err());
        // A family id is not a valid child.
        assert!(
            g.add_family(Family::new(id("fam3")).with_children(&[id("fam")]))
                .is_err()
        );
        let same = Family::new(id("fam4")).with_spouses(Some(id("dad")), Some(id("dad")));
        assert!(g.add_family(same).is_err());
    }

    #[test]
    fn partner_lookup() {
        let f = Family::new(id("f")).with_spouses(Some(id("a")), Some(id("b")));
        assert_eq!(f.partner_of(id("a")), Some(id("b")));
        assert_eq!(f.partner_of(id("b")), Some(id("a")));
        assert_eq!(f.partner_of(id("c")), None);
    }

    #[test]
    fn strict_intersection_ignores_shared_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let touching = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Bounds::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(a.contains(10.0, 10.0));
    }

    #[test]
    fn union_and_corners() {
        let u = Bounds::new(0.0, 10.0, 5.0, 5.0).union(&Bounds::new(20.0, 0.0, 10.0, 5.0));
        assert_eq!(u, Bounds::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(
            Bounds::from_corners(10.0, 10.0, 0.0, 4.0),
            Bounds::new(0.0, 4.0, 10.0, 6.0)
        );
    }
}
