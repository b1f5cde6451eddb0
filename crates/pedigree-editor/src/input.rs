//! Input abstraction layer.
//!
//! Normalizes mouse, trackpad and keyboard events into a unified
//! `InputEvent` enum consumed by the editor. Coordinates are screen space.

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// A normalized input event from any pointing device or keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Pointer moved.
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Pointer released.
    PointerUp {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Wheel / pinch at screen position (x, y).
    Scroll {
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        /// Zoom factor (1.0 = no change; >1 = zoom in).
        zoom: f32,
    },

    /// Keyboard shortcut.
    Key {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// A key press without modifiers.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// Extract position if this is a pointer or scroll event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Scroll { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}
