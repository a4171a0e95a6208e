//! Note resize: `Idle -> Resizing -> Idle`, driven from the bottom-right handle.
//!
//! Size grows with the pointer's screen displacement divided by the camera
//! scale and is floored at a configurable minimum on each axis.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::camera::Point;
use crate::consts::DEFAULT_MIN_NOTE_SIZE;
use crate::doc::{Note, NoteId, PartialNote};
use crate::gesture::{GestureCommit, GestureGuard, GestureKind, GestureLocks};
use crate::input::{Pointer, PointerId};

#[derive(Debug)]
struct ResizeSession {
    id: NoteId,
    pointer: PointerId,
    origin_screen: Point,
    start_width: f64,
    start_height: f64,
    width: f64,
    height: f64,
    _guard: GestureGuard,
}

/// Resize handler for one board.
#[derive(Debug)]
pub struct NoteResize {
    locks: GestureLocks,
    min_size: f64,
    session: Option<ResizeSession>,
}

impl NoteResize {
    #[must_use]
    pub fn new(locks: GestureLocks) -> Self {
        Self::with_min_size(locks, DEFAULT_MIN_NOTE_SIZE)
    }

    /// Handler with a custom floor. Non-positive floors are raised to 1.
    #[must_use]
    pub fn with_min_size(locks: GestureLocks, min_size: f64) -> Self {
        let min_size = if min_size.is_finite() && min_size >= 1.0 { min_size } else { 1.0 };
        Self { locks, min_size, session: None }
    }

    #[must_use]
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Start resizing `note` with `pointer`.
    pub fn begin(&mut self, note: &Note, pointer: &Pointer) -> bool {
        if self.session.is_some() || !pointer.can_drive_gesture() {
            return false;
        }
        self.session = Some(ResizeSession {
            id: note.id,
            pointer: pointer.id,
            origin_screen: pointer.screen,
            start_width: note.width,
            start_height: note.height,
            width: note.width,
            height: note.height,
            _guard: self.locks.acquire(GestureKind::Resize),
        });
        true
    }

    /// Follow the pointer; returns the clamped local `(width, height)`.
    pub fn update(&mut self, pointer: &Pointer, scale: f64) -> Option<(f64, f64)> {
        let min = self.min_size;
        let session = self.session.as_mut().filter(|s| s.pointer == pointer.id)?;
        let dx = (pointer.screen.x - session.origin_screen.x) / scale;
        let dy = (pointer.screen.y - session.origin_screen.y) / scale;
        session.width = (session.start_width + dx).max(min);
        session.height = (session.start_height + dy).max(min);
        Some((session.width, session.height))
    }

    /// Release and hand back the final size.
    pub fn end(&mut self, pointer: &Pointer, scale: f64) -> Option<GestureCommit> {
        let (width, height) = self.update(pointer, scale)?;
        let session = self.session.take()?;
        tracing::debug!(note = %session.id, width, height, "resize committed");
        Some(GestureCommit { id: session.id, fields: PartialNote::size(width, height) })
    }

    /// Abandon the resize without committing.
    pub fn cancel(&mut self) -> Option<NoteId> {
        self.session.take().map(|s| s.id)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_driven_by(&self, pointer: PointerId) -> bool {
        self.session.as_ref().is_some_and(|s| s.pointer == pointer)
    }

    /// The note being resized and its uncommitted `(width, height)`.
    #[must_use]
    pub fn preview(&self) -> Option<(NoteId, f64, f64)> {
        self.session.as_ref().map(|s| (s.id, s.width, s.height))
    }
}
