//! Generational layout for pedigree charts.
//!
//! The pipeline has three stages, each exposed on its own:
//!
//! 1. [`assign_layers`]: breadth-first generation numbers from the roots.
//! 2. [`PedigreeLayout::place_layers`]: left-to-right placement per row:
//!    families (spouse A, family node, spouse B) first, then individuals
//!    without a spouse family.
//! 3. [`PedigreeLayout::center_children`]: every family's children are
//!    re-placed as a block centered under the family node.
//!
//! Stage 3 overwrites whatever stage 2 wrote for a node that is both a
//! row-placed individual and a child. No overlap correction is done.

use crate::error::{PedigreeError, Result};
use crate::id::NodeId;
use crate::metrics::NodeMetrics;
use crate::model::{Family, PedigreeGraph};
use crate::positions::PositionStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Spacing and origin of the generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between neighbouring nodes in a row.
    pub node_gap: f32,
    /// Vertical distance between the tops of consecutive rows.
    pub layer_spacing: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_gap: 20.0,
            layer_spacing: 120.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl LayoutConfig {
    /// Decode a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.node_gap, self.layer_spacing, self.origin_x, self.origin_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(PedigreeError::invalid("layout config values must be finite"));
        }
        if self.node_gap < 0.0 || self.layer_spacing < 0.0 {
            return Err(PedigreeError::invalid(
                "node_gap and layer_spacing must not be negative",
            ));
        }
        Ok(())
    }

    /// Top of row `layer`.
    pub fn row_y(&self, layer: u32) -> f32 {
        self.origin_y + layer as f32 * self.layer_spacing
    }
}

// ─── Layering ────────────────────────────────────────────────────────────

/// Generation numbers of individuals and families. First assignment wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layering {
    layers: HashMap<NodeId, u32>,
}

impl Layering {
    pub fn layer_of(&self, id: NodeId) -> Option<u32> {
        self.layers.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn max_layer(&self) -> Option<u32> {
        self.layers.values().copied().max()
    }

    /// Returns `true` if `id` had no layer yet.
    fn assign(&mut self, id: NodeId, layer: u32) -> bool {
        if self.layers.contains_key(&id) {
            return false;
        }
        self.layers.insert(id, layer);
        true
    }
}

/// Individuals that are nobody's child, in insertion order.
/// Falls back to every individual when the graph has no such node.
pub fn roots(graph: &PedigreeGraph) -> Vec<NodeId> {
    let roots: Vec<NodeId> = graph
        .individuals()
        .map(|i| i.id)
        .filter(|&id| !graph.is_child(id))
        .collect();
    if roots.is_empty() {
        graph.individuals().map(|i| i.id).collect()
    } else {
        roots
    }
}

/// Breadth-first layer assignment, starting at layer 0.
///
/// Roots are taken in insertion order; a root already reached from an
/// earlier root keeps that layer. Families without spouses cannot be
/// reached through a spouse, so they are seeded on layer 0 afterwards.
/// Anything still unreached stays unlayered.
pub fn assign_layers(graph: &PedigreeGraph) -> Layering {
    let mut layering = Layering::default();
    let mut queue = VecDeque::new();

    for root in roots(graph) {
        if layering.assign(root, 0) {
            queue.push_back(root);
            walk(graph, &mut layering, &mut queue);
        }
    }

    for family in graph.families() {
        if family.spouses().next().is_some() || !layering.assign(family.id, 0) {
            continue;
        }
        for &child in &family.children {
            if layering.assign(child, 1) {
                queue.push_back(child);
            }
        }
        walk(graph, &mut layering, &mut queue);
    }

    log::debug!(
        "layering: {} of {} nodes layered, {} generations",
        layering.len(),
        graph.individual_count() + graph.family_count(),
        layering.max_layer().map_or(0, |l| l + 1)
    );
    layering
}

/// Drain `queue`, pushing spouse-family layers down to partners and children.
fn walk(graph: &PedigreeGraph, layering: &mut Layering, queue: &mut VecDeque<NodeId>) {
    while let Some(id) = queue.pop_front() {
        let Some(layer) = layering.layer_of(id) else {
            continue;
        };
        for family in graph.spouse_families(id) {
            layering.assign(family.id, layer);
            let family_layer = layering.layer_of(family.id).unwrap_or(layer);

            if let Some(partner) = family.partner_of(id)
                && layering.assign(partner, family_layer)
            {
                queue.push_back(partner);
            }
            for &child in &family.children {
                if layering.assign(child, family_layer + 1) {
                    queue.push_back(child);
                }
            }
        }
    }
}

// ─── Placement ───────────────────────────────────────────────────────────

/// A layout run over one graph snapshot.
///
/// Borrowing the graph and metrics keeps the stages free to be re-run
/// against the same store.
pub struct PedigreeLayout<'a> {
    graph: &'a PedigreeGraph,
    metrics: &'a dyn NodeMetrics,
    config: LayoutConfig,
    layering: Layering,
}

impl<'a> PedigreeLayout<'a> {
    /// Runs layer assignment; placement is left to the caller.
    pub fn new(
        graph: &'a PedigreeGraph,
        metrics: &'a dyn NodeMetrics,
        config: LayoutConfig,
    ) -> Self {
        Self {
            graph,
            metrics,
            config,
            layering: assign_layers(graph),
        }
    }

    pub fn layering(&self) -> &Layering {
        &self.layering
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Row-by-row placement. Families first, then spouseless individuals.
    pub fn place_layers(&self, store: &mut PositionStore) {
        let rows = self.rows();
        let gap = self.config.node_gap;

        for (&layer, row) in &rows {
            let y = self.config.row_y(layer);
            let mut cursor = self.config.origin_x;

            for family in &row.families {
                cursor = self.place_family(family, cursor, y, store);
            }
            for &id in &row.singles {
                store.set(id, cursor, y);
                log::trace!("PLACE single {id} at ({cursor}, {y})");
                cursor += self.metrics.width(id) + gap;
            }
        }
    }

    /// Place one family at `cursor`, returning the advanced cursor.
    fn place_family(
        &self,
        family: &Family,
        cursor: f32,
        y: f32,
        store: &mut PositionStore,
    ) -> f32 {
        let gap = self.config.node_gap;
        let family_width = self.metrics.width(family.id);

        match (family.spouse_a, family.spouse_b) {
            (Some(a), Some(b)) => {
                store.set(a, cursor, y);
                let a_right = cursor + self.metrics.width(a);
                let b_left = a_right + gap + family_width + gap;
                let family_x = (a_right + b_left) / 2.0 - family_width / 2.0;
                store.set(family.id, family_x, y);
                let b_x = family_x + family_width + gap;
                store.set(b, b_x, y);
                log::trace!("PLACE family {} between {a} and {b} at x={family_x}", family.id);
                b_x + self.metrics.width(b) + gap
            }
            (Some(only), None) | (None, Some(only)) => {
                store.set(only, cursor, y);
                let family_x = cursor + self.metrics.width(only) + gap;
                store.set(family.id, family_x, y);
                log::trace!("PLACE family {} beside {only} at x={family_x}", family.id);
                family_x + family_width + gap
            }
            (None, None) => {
                store.set(family.id, cursor, y);
                log::trace!("PLACE orphan family {} at x={cursor}", family.id);
                cursor + family_width + gap
            }
        }
    }

    /// Center each family's children under it, one row below the family.
    ///
    /// Reads only family positions, so running it twice gives the same result.
    pub fn center_children(&self, store: &mut PositionStore) {
        let gap = self.config.node_gap;

        for family in self.graph.families() {
            if family.children.is_empty() {
                continue;
            }
            let (Some(layer), Some(pos)) =
                (self.layering.layer_of(family.id), store.get(family.id))
            else {
                continue;
            };

            let midpoint = pos.x + self.metrics.width(family.id) / 2.0;
            let widths: f32 = family.children.iter().map(|&c| self.metrics.width(c)).sum();
            let block = widths + gap * (family.children.len() - 1) as f32;
            let y = self.config.row_y(layer + 1);

            let mut x = midpoint - block / 2.0;
            for &child in &family.children {
                store.set(child, x, y);
                x += self.metrics.width(child) + gap;
            }
            log::trace!(
                "CENTER {} children of {} around x={midpoint}",
                family.children.len(),
                family.id
            );
        }
    }

    /// Layered families and spouseless individuals grouped by row.
    fn rows(&self) -> BTreeMap<u32, Row<'a>> {
        let graph = self.graph;
        let mut rows: BTreeMap<u32, Row<'a>> = BTreeMap::new();
        for family in graph.families() {
            if let Some(layer) = self.layering.layer_of(family.id) {
                rows.entry(layer).or_default().families.push(family);
            }
        }
        for individual in graph.individuals() {
            if graph.has_spouse_family(individual.id) {
                continue;
            }
            if let Some(layer) = self.layering.layer_of(individual.id) {
                rows.entry(layer).or_default().singles.push(individual.id);
            }
        }
        rows
    }
}

#[derive(Default)]
struct Row<'a> {
    families: Vec<&'a Family>,
    singles: Vec<NodeId>,
}

/// Run the full pipeline into a fresh store.
pub fn compute_layout(
    graph: &PedigreeGraph,
    metrics: &dyn NodeMetrics,
    config: LayoutConfig,
) -> PositionStore {
    let layout = PedigreeLayout::new(graph, metrics, config);
    let mut store = PositionStore::new();
    layout.place_layers(&mut store);
    layout.center_children(&mut store);
    log::debug!("layout: placed {} nodes", store.len());
    store
}
