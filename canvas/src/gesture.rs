//! Gesture exclusivity registry shared between note and camera handlers.
//!
//! Each note handler holds a [`GestureGuard`] for as long as its gesture is
//! live. The guard raises the matching flag on acquisition and lowers it on
//! drop, so a gesture that ends abnormally (cancelled pointer, dropped
//! handler) can never leave a flag stuck. The camera handler only reads.
//!
//! The registry is a cheap cloneable handle; every handler that should see
//! the same flags must be given a clone of the same [`GestureLocks`].

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::doc::{NoteId, PartialNote};

/// Which exclusive note manipulation a flag tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
    Rotate,
}

#[derive(Debug, Default)]
struct Flags {
    dragging: AtomicBool,
    resizing: AtomicBool,
    rotating: AtomicBool,
}

impl Flags {
    fn flag(&self, kind: GestureKind) -> &AtomicBool {
        match kind {
            GestureKind::Drag => &self.dragging,
            GestureKind::Resize => &self.resizing,
            GestureKind::Rotate => &self.rotating,
        }
    }
}

/// Shared handle to the three note-gesture flags.
#[derive(Debug, Clone, Default)]
pub struct GestureLocks {
    flags: Arc<Flags>,
}

impl GestureLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for `kind` until the returned guard is dropped.
    #[must_use = "dropping the guard immediately releases the flag"]
    pub fn acquire(&self, kind: GestureKind) -> GestureGuard {
        self.flags.flag(kind).store(true, Ordering::Release);
        GestureGuard { flags: Arc::clone(&self.flags), kind }
    }

    #[must_use]
    pub fn is_active(&self, kind: GestureKind) -> bool {
        self.flags.flag(kind).load(Ordering::Acquire)
    }

    #[must_use]
    pub fn dragging_note(&self) -> bool {
        self.is_active(GestureKind::Drag)
    }

    #[must_use]
    pub fn resizing_note(&self) -> bool {
        self.is_active(GestureKind::Resize)
    }

    #[must_use]
    pub fn rotating_note(&self) -> bool {
        self.is_active(GestureKind::Rotate)
    }

    /// True while any note drag, resize, or rotate is in progress.
    #[must_use]
    pub fn any_note_gesture(&self) -> bool {
        self.dragging_note() || self.resizing_note() || self.rotating_note()
    }
}

/// Scoped ownership of one registry flag. Lowers the flag on drop.
#[derive(Debug)]
pub struct GestureGuard {
    flags: Arc<Flags>,
    kind: GestureKind,
}

impl GestureGuard {
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }
}

impl Drop for GestureGuard {
    fn drop(&mut self) {
        self.flags.flag(self.kind).store(false, Ordering::Release);
    }
}

/// Final value of a note gesture, ready to be merged into the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureCommit {
    pub id: NoteId,
    pub fields: PartialNote,
}
