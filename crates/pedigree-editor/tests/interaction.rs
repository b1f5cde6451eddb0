//! Integration tests: pointer and keyboard interaction (pedigree-editor).
//!
//! Drives `PedigreeEditor` with raw input events on a zoomed, panned view
//! and checks selection, positions and history end to end.

use pedigree_core::*;
use pedigree_editor::{InputEvent, Modifiers, PedigreeEditor, Viewport};
use pretty_assertions::assert_eq;

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn key(k: &str, ctrl: bool, shift: bool, alt: bool) -> InputEvent {
    InputEvent::Key {
        key: k.to_string(),
        ctrl,
        shift,
        alt,
        meta: false,
    }
}

/// Three unrelated individuals, each a root on layer 0:
/// solo_a at x=0, solo_b at x=140, solo_c at x=280 (width 120, gap 20).
fn editor() -> PedigreeEditor {
    let _ = env_logger::builder().is_test(true).try_init();
    let graph = PedigreeGraph::from_records(
        ["solo_a", "solo_b", "solo_c"]
            .iter()
            .map(|p| Individual::new(id(p))),
        Vec::<Family>::new(),
    )
    .unwrap();
    let metrics = SizeTable::for_graph(&graph);
    PedigreeEditor::with_graph(&graph, metrics, LayoutConfig::default()).unwrap()
}

#[test]
fn singles_fill_the_first_row() {
    let ed = editor();
    assert_eq!(ed.store().get(id("solo_a")), Some(Point::new(0.0, 0.0)));
    assert_eq!(ed.store().get(id("solo_b")), Some(Point::new(140.0, 0.0)));
    assert_eq!(ed.store().get(id("solo_c")), Some(Point::new(280.0, 0.0)));
}

#[test]
fn drag_under_zoom_moves_in_layout_units() {
    let mut ed = editor().with_viewport(Viewport::new(0.5, 4.0, 2.0).unwrap());
    ed.viewport_mut().set_zoom(2.0);
    ed.viewport_mut().pan_by(100.0, 50.0);

    // solo_b's top-left (140, 0) is on screen at (380, 50).
    ed.handle(&InputEvent::pointer_down(390.0, 60.0));
    ed.handle(&InputEvent::pointer_move(430.0, 100.0));
    ed.handle(&InputEvent::pointer_up(430.0, 100.0));

    assert_eq!(ed.selected(), &[id("solo_b")]);
    assert_eq!(ed.store().get(id("solo_b")), Some(Point::new(160.0, 20.0)));
}

#[test]
fn keyboard_undo_redo_after_drag() {
    let mut ed = editor();
    ed.handle(&InputEvent::pointer_down(10.0, 10.0));
    ed.handle(&InputEvent::pointer_move(10.0, 210.0));
    ed.handle(&InputEvent::pointer_up(10.0, 210.0));
    assert_eq!(ed.store().get(id("solo_a")), Some(Point::new(0.0, 200.0)));

    assert!(ed.handle(&key("z", true, false, false)));
    assert_eq!(ed.store().get(id("solo_a")), Some(Point::new(0.0, 0.0)));

    assert!(ed.handle(&key("Z", true, true, false)));
    assert_eq!(ed.store().get(id("solo_a")), Some(Point::new(0.0, 200.0)));

    // Nothing left to redo.
    assert!(!ed.handle(&key("y", true, false, false)));
}

#[test]
fn marquee_then_distribute_vertical() {
    let mut ed = editor();
    ed.move_node(id("solo_b"), 140.0, 30.0);
    ed.move_node(id("solo_c"), 280.0, 300.0);

    ed.handle(&InputEvent::pointer_down(-5.0, -5.0));
    ed.handle(&InputEvent::pointer_move(500.0, 500.0));
    ed.handle(&InputEvent::pointer_up(500.0, 500.0));
    assert_eq!(ed.selected().len(), 3);

    // Tops 0, 30, 300 with height 40: span 340, gap 110.
    assert!(ed.handle(&key("v", false, true, true)));
    assert_eq!(ed.store().get(id("solo_b")), Some(Point::new(140.0, 150.0)));
    assert_eq!(ed.history().undo_descriptions().last(), Some(&"Distribute Vertical"));
}

#[test]
fn align_center_via_shortcut() {
    let mut ed = editor();
    ed.handle(&key("a", true, false, false));
    assert!(ed.handle(&key("h", false, false, true)));

    // Combined box 0..400, midpoint 200: every left edge at 140.
    for who in ["solo_a", "solo_b", "solo_c"] {
        assert_eq!(ed.store().get(id(who)).unwrap().x, 140.0, "{who}");
    }
    ed.undo();
    assert_eq!(ed.store().get(id("solo_c")), Some(Point::new(280.0, 0.0)));
}

#[test]
fn view_shortcuts() {
    let mut ed = editor();
    ed.handle(&key("=", true, false, false));
    assert_eq!(ed.viewport().zoom(), 1.2);
    ed.handle(&key("0", true, false, false));
    assert_eq!(ed.viewport().zoom(), 1.0);

    ed.set_screen_size(480.0, 120.0);
    assert!(ed.handle(&key("1", true, false, false)));
    // Extent 400 × 40 inside 400 × 40 of room.
    assert_eq!(ed.viewport().zoom(), 1.0);
    assert_eq!(ed.viewport().pan(), (40.0, 40.0));
}

#[test]
fn shift_click_background_keeps_selection() {
    let mut ed = editor();
    ed.handle(&InputEvent::pointer_down(10.0, 10.0));
    ed.handle(&InputEvent::pointer_up(10.0, 10.0));

    let shift_down = InputEvent::PointerDown {
        x: 900.0,
        y: 900.0,
        modifiers: Modifiers::SHIFT,
    };
    ed.handle(&shift_down);
    ed.handle(&InputEvent::pointer_up(900.0, 900.0));
    assert_eq!(ed.selected(), &[id("solo_a")]);
}
