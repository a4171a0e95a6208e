//! Input model: pointers, modifier keys, wheel deltas, and keyboard keys.
//!
//! These are the raw facts the host forwards from its event loop. A pointer
//! event carries the pointer's id and whether it is the primary pointer, so
//! the engine can let the primary pointer drive note gestures while extra
//! touch points feed the pinch handler.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Host-assigned identifier of a pointer (mouse, pen, or one finger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// Physical device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// One pointer sample in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub kind: PointerKind,
    /// Whether this is the first pointer of a multi-pointer interaction.
    pub is_primary: bool,
    pub button: Button,
    /// Position in CSS pixels relative to the canvas viewport.
    pub screen: Point,
}

impl Pointer {
    /// A primary left-button mouse pointer at `screen`.
    #[must_use]
    pub fn mouse(screen: Point) -> Self {
        Self { id: PointerId(1), kind: PointerKind::Mouse, is_primary: true, button: Button::Primary, screen }
    }

    /// A touch point. The first finger down is the primary one.
    #[must_use]
    pub fn touch(id: i32, is_primary: bool, screen: Point) -> Self {
        Self { id: PointerId(id), kind: PointerKind::Touch, is_primary, button: Button::Primary, screen }
    }

    /// Same pointer, moved to `screen`.
    #[must_use]
    pub fn at(self, screen: Point) -> Self {
        Self { screen, ..self }
    }

    /// Whether this pointer may start a gesture (primary and left button).
    #[must_use]
    pub fn can_drive_gesture(&self) -> bool {
        self.is_primary && self.button == Button::Primary
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"v"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Backspace or Delete.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Backspace" | "Delete")
    }

    /// The `v` key, in either case.
    #[must_use]
    pub fn is_v(&self) -> bool {
        self.0.eq_ignore_ascii_case("v")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// What kind of element holds keyboard focus in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Nothing editable is focused; board shortcuts apply.
    #[default]
    Board,
    /// A text input, textarea, or content-editable element has focus.
    TextEditing,
}

impl Focus {
    #[must_use]
    pub fn is_editing(self) -> bool {
        self == Self::TextEditing
    }
}
