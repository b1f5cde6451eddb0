//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! ⌥ plus a letter drives alignment, ⌥⇧ drives distribution.

use crate::align::{Alignment, Distribution};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    SelectAll,
    Deselect,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    ZoomToFit,

    // ── Arrange ──
    Align(Alignment),
    Distribute(Distribution),
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                "1" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        if alt && shift {
            return match key {
                "h" | "H" => Some(ShortcutAction::Distribute(Distribution::Horizontal)),
                "v" | "V" => Some(ShortcutAction::Distribute(Distribution::Vertical)),
                _ => None,
            };
        }

        if alt {
            let mode = match key {
                "a" | "A" => Alignment::Left,
                "d" | "D" => Alignment::Right,
                "w" | "W" => Alignment::Top,
                "s" | "S" => Alignment::Bottom,
                "h" | "H" => Alignment::Center,
                "v" | "V" => Alignment::Middle,
                _ => return None,
            };
            return Some(ShortcutAction::Align(mode));
        }

        match key {
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
