//! Note drag: `Idle -> Dragging -> Idle`.
//!
//! A drag starts from a note's drag handle and follows one pointer. Every
//! move recomputes the local position from the pointer's total screen
//! displacement divided by the current camera scale; the authoritative note
//! is only touched once, on release.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::camera::Point;
use crate::doc::{Note, NoteId, PartialNote};
use crate::gesture::{GestureCommit, GestureGuard, GestureKind, GestureLocks};
use crate::input::{Pointer, PointerId};

#[derive(Debug)]
struct DragSession {
    id: NoteId,
    pointer: PointerId,
    /// Screen position of the pointer at pointer-down.
    origin_screen: Point,
    /// Note position at pointer-down.
    start: Point,
    /// Uncommitted position shown while dragging.
    local: Point,
    _guard: GestureGuard,
}

/// Drag handler for one board. Holds at most one live drag.
#[derive(Debug)]
pub struct NoteDrag {
    locks: GestureLocks,
    session: Option<DragSession>,
}

impl NoteDrag {
    #[must_use]
    pub fn new(locks: GestureLocks) -> Self {
        Self { locks, session: None }
    }

    /// Start dragging `note` with `pointer`. Returns false if a drag is
    /// already live or the pointer can't drive a gesture.
    pub fn begin(&mut self, note: &Note, pointer: &Pointer) -> bool {
        if self.session.is_some() || !pointer.can_drive_gesture() {
            return false;
        }
        let start = Point::new(note.x, note.y);
        self.session = Some(DragSession {
            id: note.id,
            pointer: pointer.id,
            origin_screen: pointer.screen,
            start,
            local: start,
            _guard: self.locks.acquire(GestureKind::Drag),
        });
        true
    }

    /// Follow the pointer. Returns the new local position, or `None` if the
    /// event belongs to another pointer or no drag is live.
    pub fn update(&mut self, pointer: &Pointer, scale: f64) -> Option<Point> {
        let session = self.session.as_mut().filter(|s| s.pointer == pointer.id)?;
        let dx = (pointer.screen.x - session.origin_screen.x) / scale;
        let dy = (pointer.screen.y - session.origin_screen.y) / scale;
        session.local = Point::new(session.start.x + dx, session.start.y + dy);
        Some(session.local)
    }

    /// Release: apply the final pointer sample, then hand back the position
    /// to commit. The registry flag is lowered before this returns.
    pub fn end(&mut self, pointer: &Pointer, scale: f64) -> Option<GestureCommit> {
        let local = self.update(pointer, scale)?;
        let session = self.session.take()?;
        tracing::debug!(note = %session.id, x = local.x, y = local.y, "drag committed");
        Some(GestureCommit { id: session.id, fields: PartialNote::position(local.x, local.y) })
    }

    /// Abandon the drag without committing. Returns the note it was driving.
    pub fn cancel(&mut self) -> Option<NoteId> {
        self.session.take().map(|s| s.id)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether `pointer` is the one driving the live drag.
    #[must_use]
    pub fn is_driven_by(&self, pointer: PointerId) -> bool {
        self.session.as_ref().is_some_and(|s| s.pointer == pointer)
    }

    /// The note being dragged and its uncommitted position.
    #[must_use]
    pub fn preview(&self) -> Option<(NoteId, Point)> {
        self.session.as_ref().map(|s| (s.id, s.local))
    }
}
