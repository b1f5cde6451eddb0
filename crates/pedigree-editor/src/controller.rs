//! Interaction controller.
//!
//! `PedigreeEditor` owns the chart state (positions, selection, view,
//! history) and translates `InputEvent`s into selection changes and
//! undoable moves. Every entry point returns `true` when the embedder
//! should repaint.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Click | Drag | Marquee |
//! |----------|-------|------|---------|
//! | **Shift** | Toggle membership | Axis-constrain | Add to selection |

use crate::align::{
    Alignment, Distribution, MovePlan, NodeMove, StoreAccessor, plan_align, plan_distribute,
};
use crate::commands::{Command, CommandStack, MoveNodeCommand, MoveNodesCommand};
use crate::hit::hit_test;
use crate::input::{InputEvent, Modifiers};
use crate::selection::{Selection, StoreBounds};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::viewport::Viewport;
use pedigree_core::{
    Bounds, LayoutConfig, NodeId, NodeMetrics, PedigreeGraph, Point, PositionStore, Result,
    compute_layout,
};
use smallvec::SmallVec;

/// Padding in screen pixels around the chart for zoom-to-fit.
pub const FIT_PADDING: f32 = 40.0;

/// In-progress pointer gesture. Coordinates are layout space.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Drag {
        start: (f32, f32),
        origins: SmallVec<[(NodeId, Point); 8]>,
    },
    Marquee {
        start: (f32, f32),
        rect: Bounds,
    },
}

pub struct PedigreeEditor {
    store: PositionStore,
    metrics: Box<dyn NodeMetrics>,
    selection: Selection,
    viewport: Viewport,
    history: CommandStack<PositionStore>,
    gesture: Gesture,
    /// Drawing surface size in pixels, for zoom-to-fit.
    screen: (f32, f32),
}

impl PedigreeEditor {
    pub fn new(metrics: impl NodeMetrics + 'static) -> Self {
        Self {
            store: PositionStore::new(),
            metrics: Box::new(metrics),
            selection: Selection::new(),
            viewport: Viewport::default(),
            history: CommandStack::default(),
            gesture: Gesture::Idle,
            screen: (0.0, 0.0),
        }
    }

    /// Lay out `graph` and open it for editing.
    pub fn with_graph(
        graph: &PedigreeGraph,
        metrics: impl NodeMetrics + 'static,
        config: LayoutConfig,
    ) -> Result<Self> {
        let mut editor = Self::new(metrics);
        editor.relayout(graph, config)?;
        Ok(editor)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Rebuild every position from scratch. Manual moves are discarded
    /// along with the undo history; selected ids that no longer exist are
    /// dropped.
    pub fn relayout(&mut self, graph: &PedigreeGraph, config: LayoutConfig) -> Result<()> {
        config.validate()?;
        self.store = compute_layout(graph, self.metrics.as_ref(), config);
        self.history.clear();
        self.gesture = Gesture::Idle;

        let stale: Vec<NodeId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| !self.store.contains(*id))
            .collect();
        for id in stale {
            self.selection.remove(id);
        }
        log::debug!("relayout: {} nodes positioned", self.store.len());
        Ok(())
    }

    /// Replace the size source. Positions are kept.
    pub fn set_metrics(&mut self, metrics: impl NodeMetrics + 'static) {
        self.metrics = Box::new(metrics);
    }

    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen = (width, height);
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    pub fn metrics(&self) -> &dyn NodeMetrics {
        self.metrics.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Selected ids, for highlight rendering and property panels.
    pub fn selected(&self) -> &[NodeId] {
        self.selection.ids()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn history(&self) -> &CommandStack<PositionStore> {
        &self.history
    }

    /// Current rubber-band rectangle in layout space, while one is drawn.
    pub fn marquee(&self) -> Option<Bounds> {
        match &self.gesture {
            Gesture::Marquee { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Drag { .. })
    }

    /// Node under a screen-space point.
    pub fn node_at(&self, sx: f32, sy: f32) -> Option<NodeId> {
        let (lx, ly) = self.viewport.screen_to_layout(sx, sy);
        hit_test(&self.store, self.metrics.as_ref(), lx, ly)
    }

    // ─── Commands ──────────────────────────────────────────────────────

    /// Run an externally built command through the history.
    pub fn execute(&mut self, cmd: impl Command<PositionStore> + 'static) -> bool {
        self.history.execute(&mut self.store, cmd)
    }

    /// Move one node as an undoable step. Unknown ids are ignored.
    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> bool {
        match MoveNodeCommand::new(&self.store, id, Point::new(x, y)) {
            Some(cmd) => self.history.execute(&mut self.store, cmd),
            None => false,
        }
    }

    /// Description of the undone step and whether any position changed.
    pub fn undo(&mut self) -> Option<(String, bool)> {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> Option<(String, bool)> {
        self.history.redo(&mut self.store)
    }

    pub fn align(&mut self, mode: Alignment) -> bool {
        let accessor = StoreAccessor::new(&mut self.store, self.metrics.as_ref());
        let plan = plan_align(&accessor, self.selection.ids(), mode);
        self.record_plan(plan, format!("Align {mode:?}"))
    }

    pub fn distribute(&mut self, mode: Distribution) -> bool {
        let accessor = StoreAccessor::new(&mut self.store, self.metrics.as_ref());
        let plan = plan_distribute(&accessor, self.selection.ids(), mode);
        self.record_plan(plan, format!("Distribute {mode:?}"))
    }

    fn record_plan(&mut self, plan: MovePlan, description: String) -> bool {
        if plan.iter().all(|mv| mv.from == mv.to) {
            return false;
        }
        self.history
            .execute(&mut self.store, MoveNodesCommand::new(plan, description))
    }

    pub fn select_all(&mut self) -> bool {
        let provider = StoreBounds::new(&self.store, self.metrics.as_ref());
        self.selection.select_all(&provider)
    }

    /// Fit the whole chart to the screen set by `set_screen_size`.
    pub fn zoom_to_fit(&mut self) -> bool {
        let Some(extent) = self.store.extent(self.metrics.as_ref()) else {
            return false;
        };
        let (w, h) = self.screen;
        self.viewport.fit_to(extent, w, h, FIT_PADDING)
    }

    // ─── Input ─────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => self.pointer_down(*x, *y, *modifiers),
            InputEvent::PointerMove { x, y, modifiers } => self.pointer_move(*x, *y, *modifiers),
            InputEvent::PointerUp { modifiers, .. } => self.pointer_up(*modifiers),
            InputEvent::Scroll {
                x,
                y,
                dx,
                dy,
                zoom,
            } => {
                if zoom.is_finite() && *zoom != 1.0 {
                    self.viewport.zoom_about(*x, *y, *zoom > 1.0)
                } else {
                    self.viewport.pan_by(-dx, -dy)
                }
            }
            InputEvent::Key {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => match ShortcutMap::resolve(key, *ctrl, *shift, *alt, *meta) {
                Some(action) => self.dispatch(action),
                None => false,
            },
        }
    }

    fn dispatch(&mut self, action: ShortcutAction) -> bool {
        log::trace!("shortcut {action:?}");
        match action {
            ShortcutAction::Undo => self.undo().is_some_and(|(_, changed)| changed),
            ShortcutAction::Redo => self.redo().is_some_and(|(_, changed)| changed),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Deselect => self.selection.clear(),
            ShortcutAction::ZoomIn => self.viewport.zoom_in(),
            ShortcutAction::ZoomOut => self.viewport.zoom_out(),
            ShortcutAction::ResetView => {
                self.viewport.reset_view();
                true
            }
            ShortcutAction::ZoomToFit => self.zoom_to_fit(),
            ShortcutAction::Align(mode) => self.align(mode),
            ShortcutAction::Distribute(mode) => self.distribute(mode),
        }
    }

    fn pointer_down(&mut self, sx: f32, sy: f32, modifiers: Modifiers) -> bool {
        let start = self.viewport.screen_to_layout(sx, sy);

        if let Some(hit) = hit_test(&self.store, self.metrics.as_ref(), start.0, start.1) {
            let changed = if modifiers.shift {
                self.selection.toggle(hit);
                true
            } else if !self.selection.contains(hit) {
                self.selection.select_single(hit)
            } else {
                // Keep the selection so the whole group drags.
                false
            };

            let origins = self
                .selection
                .ids()
                .iter()
                .filter_map(|&id| self.store.get(id).map(|p| (id, p)))
                .collect();
            self.gesture = Gesture::Drag { start, origins };
            changed
        } else {
            let changed = !modifiers.shift && self.selection.clear();
            self.gesture = Gesture::Marquee {
                start,
                rect: Bounds::new(start.0, start.1, 0.0, 0.0),
            };
            changed
        }
    }

    fn pointer_move(&mut self, sx: f32, sy: f32, modifiers: Modifiers) -> bool {
        let (lx, ly) = self.viewport.screen_to_layout(sx, sy);
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::Marquee { start, rect } => {
                *rect = Bounds::from_corners(start.0, start.1, lx, ly);
                true
            }
            Gesture::Drag { start, origins } => {
                let mut dx = lx - start.0;
                let mut dy = ly - start.1;
                // Shift: constrain to dominant axis
                if modifiers.shift {
                    if dx.abs() > dy.abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }
                let mut changed = false;
                for (id, origin) in origins.iter() {
                    let to = Point::new(origin.x + dx, origin.y + dy);
                    if self.store.get(*id) != Some(to) {
                        self.store.set_point(*id, to);
                        changed = true;
                    }
                }
                changed
            }
        }
    }

    fn pointer_up(&mut self, modifiers: Modifiers) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Drag { origins, .. } => {
                let moves: SmallVec<[NodeMove; 8]> = origins
                    .into_iter()
                    .filter_map(|(id, from)| {
                        let to = self.store.get(id)?;
                        (to != from).then_some(NodeMove { id, from, to })
                    })
                    .collect();
                match moves.len() {
                    0 => {}
                    1 => {
                        let mv = moves[0];
                        let cmd = MoveNodeCommand::between(mv.id, mv.from, mv.to);
                        self.history.execute(&mut self.store, cmd);
                    }
                    _ => {
                        let description = format!("Move {} nodes", moves.len());
                        self.history
                            .execute(&mut self.store, MoveNodesCommand::new(moves, description));
                    }
                }
                false
            }
            Gesture::Marquee { rect, .. } => {
                if rect.width > 0.0 && rect.height > 0.0 {
                    let provider = StoreBounds::new(&self.store, self.metrics.as_ref());
                    if modifiers.shift {
                        self.selection.add_in_rect(rect, Some(&provider));
                    } else {
                        self.selection.select_in_rect(rect, Some(&provider));
                    }
                }
                // The rubber band disappears either way.
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::{Family, Individual, SizeTable};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    /// pa (0,0) ── f (120,0) ── pb (150,0), child c at (75,120).
    fn editor() -> PedigreeEditor {
        let graph = PedigreeGraph::from_records(
            ["pa", "pb", "c"].iter().map(|p| Individual::new(id(p))),
            vec![
                Family::new(id("f"))
                    .with_spouses(Some(id("pa")), Some(id("pb")))
                    .with_children(&[id("c")]),
            ],
        )
        .unwrap();
        let metrics = SizeTable::for_graph(&graph)
            .with_individual_size(100.0, 40.0)
            .with_family_size(10.0, 10.0);
        PedigreeEditor::with_graph(&graph, metrics, LayoutConfig::default()).unwrap()
    }

    fn shift_event(event: InputEvent) -> InputEvent {
        match event {
            InputEvent::PointerDown { x, y, .. } => InputEvent::PointerDown {
                x,
                y,
                modifiers: Modifiers::SHIFT,
            },
            InputEvent::PointerMove { x, y, .. } => InputEvent::PointerMove {
                x,
                y,
                modifiers: Modifiers::SHIFT,
            },
            InputEvent::PointerUp { x, y, .. } => InputEvent::PointerUp {
                x,
                y,
                modifiers: Modifiers::SHIFT,
            },
            other => other,
        }
    }

    #[test]
    fn layout_positions() {
        let ed = editor();
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(0.0, 0.0)));
        assert_eq!(ed.store().get(id("f")), Some(Point::new(120.0, 0.0)));
        assert_eq!(ed.store().get(id("pb")), Some(Point::new(150.0, 0.0)));
        assert_eq!(ed.store().get(id("c")), Some(Point::new(75.0, 120.0)));
    }

    #[test]
    fn click_selects_and_background_clears() {
        let mut ed = editor();
        assert!(ed.handle(&InputEvent::pointer_down(10.0, 10.0)));
        ed.handle(&InputEvent::pointer_up(10.0, 10.0));
        assert_eq!(ed.selected(), &[id("pa")]);

        ed.handle(&InputEvent::pointer_down(500.0, 500.0));
        ed.handle(&InputEvent::pointer_up(500.0, 500.0));
        assert!(ed.selected().is_empty());
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn shift_click_toggles() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(10.0, 10.0));
        ed.handle(&InputEvent::pointer_up(10.0, 10.0));
        ed.handle(&shift_event(InputEvent::pointer_down(160.0, 10.0)));
        ed.handle(&shift_event(InputEvent::pointer_up(160.0, 10.0)));
        assert_eq!(ed.selected(), &[id("pa"), id("pb")]);

        ed.handle(&shift_event(InputEvent::pointer_down(10.0, 10.0)));
        ed.handle(&shift_event(InputEvent::pointer_up(10.0, 10.0)));
        assert_eq!(ed.selected(), &[id("pb")]);
    }

    #[test]
    fn drag_records_one_undo_step() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(10.0, 10.0));
        assert!(ed.handle(&InputEvent::pointer_move(30.0, 20.0)));
        assert!(ed.handle(&InputEvent::pointer_move(60.0, 30.0)));
        ed.handle(&InputEvent::pointer_up(60.0, 30.0));

        assert_eq!(ed.store().get(id("pa")), Some(Point::new(50.0, 20.0)));
        assert_eq!(ed.history().undo_descriptions(), vec!["Move pa"]);

        assert_eq!(ed.undo(), Some(("Move pa".to_string(), true)));
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(0.0, 0.0)));
        ed.redo();
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(50.0, 20.0)));
    }

    #[test]
    fn click_without_move_records_nothing() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(10.0, 10.0));
        ed.handle(&InputEvent::pointer_up(10.0, 10.0));
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn shift_drag_locks_axis() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(10.0, 10.0));
        ed.handle(&shift_event(InputEvent::pointer_move(60.0, 20.0)));
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(50.0, 0.0)));
    }

    #[test]
    fn multi_drag_is_one_step() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(10.0, 10.0));
        ed.handle(&InputEvent::pointer_up(10.0, 10.0));
        ed.handle(&shift_event(InputEvent::pointer_down(160.0, 10.0)));
        ed.handle(&shift_event(InputEvent::pointer_up(160.0, 10.0)));

        ed.handle(&InputEvent::pointer_down(160.0, 10.0));
        ed.handle(&InputEvent::pointer_move(160.0, 60.0));
        ed.handle(&InputEvent::pointer_up(160.0, 60.0));

        assert_eq!(ed.store().get(id("pa")), Some(Point::new(0.0, 50.0)));
        assert_eq!(ed.store().get(id("pb")), Some(Point::new(150.0, 50.0)));
        assert_eq!(ed.history().undo_descriptions(), vec!["Move 2 nodes"]);

        ed.undo();
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(0.0, 0.0)));
        assert_eq!(ed.store().get(id("pb")), Some(Point::new(150.0, 0.0)));
    }

    #[test]
    fn marquee_selects_overlapping_nodes() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(-10.0, -10.0));
        ed.handle(&InputEvent::pointer_move(260.0, 50.0));
        assert_eq!(ed.marquee(), Some(Bounds::new(-10.0, -10.0, 270.0, 60.0)));
        assert!(ed.handle(&InputEvent::pointer_up(260.0, 50.0)));
        assert_eq!(ed.marquee(), None);

        let mut got: Vec<&str> = ed.selected().iter().map(|i| i.as_str()).collect();
        got.sort();
        assert_eq!(got, vec!["f", "pa", "pb"]);
    }

    #[test]
    fn shift_marquee_adds() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(80.0, 130.0));
        ed.handle(&InputEvent::pointer_up(80.0, 130.0));
        assert_eq!(ed.selected(), &[id("c")]);

        ed.handle(&shift_event(InputEvent::pointer_down(-10.0, -10.0)));
        ed.handle(&shift_event(InputEvent::pointer_move(50.0, 50.0)));
        ed.handle(&shift_event(InputEvent::pointer_up(50.0, 50.0)));
        assert_eq!(ed.selected(), &[id("c"), id("pa")]);
    }

    #[test]
    fn zero_size_marquee_selects_nothing() {
        let mut ed = editor();
        ed.handle(&InputEvent::pointer_down(300.0, 300.0));
        ed.handle(&InputEvent::pointer_up(300.0, 300.0));
        assert!(ed.selected().is_empty());
    }

    #[test]
    fn scroll_zooms_about_pointer_or_pans() {
        let mut ed = editor();
        let zoom = InputEvent::Scroll {
            x: 100.0,
            y: 100.0,
            dx: 0.0,
            dy: 0.0,
            zoom: 1.5,
        };
        assert!(ed.handle(&zoom));
        assert_eq!(ed.viewport().zoom(), 1.2);
        let (lx, ly) = ed.viewport().screen_to_layout(100.0, 100.0);
        assert!((lx - 100.0).abs() < 1e-3 && (ly - 100.0).abs() < 1e-3);

        ed.viewport_mut().reset_view();
        let pan = InputEvent::Scroll {
            x: 0.0,
            y: 0.0,
            dx: 10.0,
            dy: 5.0,
            zoom: 1.0,
        };
        assert!(ed.handle(&pan));
        assert_eq!(ed.viewport().pan(), (-10.0, -5.0));
    }

    #[test]
    fn clicks_respect_zoom() {
        let mut ed = editor();
        ed.viewport_mut().set_zoom(2.0);
        // Screen (300, 20) is layout (150, 10): pb's top-left corner.
        assert_eq!(ed.node_at(300.0, 20.0), Some(id("pb")));
    }

    #[test]
    fn align_shortcut_is_undoable() {
        let mut ed = editor();
        ed.selection_mut().add(id("pa"));
        ed.selection_mut().add(id("c"));
        let top = InputEvent::Key {
            key: "w".into(),
            ctrl: false,
            shift: false,
            alt: true,
            meta: false,
        };
        assert!(ed.handle(&top));
        assert_eq!(ed.store().get(id("c")), Some(Point::new(75.0, 0.0)));
        assert_eq!(ed.history().undo_descriptions(), vec!["Align Top"]);

        // Already aligned: nothing recorded.
        assert!(!ed.align(Alignment::Top));
        assert_eq!(ed.history().undo_descriptions().len(), 1);

        ed.undo();
        assert_eq!(ed.store().get(id("c")), Some(Point::new(75.0, 120.0)));
    }

    #[test]
    fn distribute_needs_three() {
        let mut ed = editor();
        ed.selection_mut().add(id("pa"));
        ed.selection_mut().add(id("pb"));
        assert!(!ed.distribute(Distribution::Horizontal));
        ed.selection_mut().add(id("f"));
        // Layout already spaces them evenly.
        assert!(!ed.distribute(Distribution::Horizontal));

        ed.move_node(id("f"), 60.0, 0.0);
        // Spread 250 wide, sizes 210: gap 20.
        assert!(ed.distribute(Distribution::Horizontal));
        assert_eq!(ed.store().get(id("f")), Some(Point::new(120.0, 0.0)));
    }

    #[test]
    fn select_all_and_deselect_keys() {
        let mut ed = editor();
        let select_all = InputEvent::Key {
            key: "a".into(),
            ctrl: true,
            shift: false,
            alt: false,
            meta: false,
        };
        assert!(ed.handle(&select_all));
        assert_eq!(ed.selected().len(), 4);
        assert!(ed.handle(&InputEvent::key("Escape")));
        assert!(ed.selected().is_empty());
        assert!(!ed.handle(&InputEvent::key("q")));
    }

    #[test]
    fn zoom_to_fit_uses_screen_size() {
        let mut ed = editor();
        assert!(!ed.zoom_to_fit());
        ed.set_screen_size(500.0, 300.0);
        // Extent 250 × 160, room 420 × 220.
        assert!(ed.zoom_to_fit());
        assert_eq!(ed.viewport().zoom(), 1.375);
    }

    #[test]
    fn relayout_clears_history_and_prunes_selection() {
        let mut ed = editor();
        ed.selection_mut().add(id("pb"));
        ed.selection_mut().add(id("pa"));
        ed.move_node(id("pa"), 5.0, 5.0);
        assert!(ed.history().can_undo());

        let solo = PedigreeGraph::from_records([Individual::new(id("pa"))], Vec::<Family>::new())
            .unwrap();
        ed.relayout(&solo, LayoutConfig::default()).unwrap();

        assert!(!ed.history().can_undo());
        assert_eq!(ed.selected(), &[id("pa")]);
        assert_eq!(ed.store().len(), 1);
        assert_eq!(ed.store().get(id("pa")), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn move_node_ignores_unknown_ids() {
        let mut ed = editor();
        assert!(!ed.move_node(id("stranger"), 1.0, 1.0));
        assert!(!ed.history().can_undo());
    }
}
