//! Note rotate: `Idle -> Rotating -> Idle`, driven from the rotate handle.
//!
//! The pivot is the note's screen-space center captured at pointer-down and
//! held fixed for the whole gesture. Rotation is relative to the angle at
//! pointer-down and is never wrapped into 0..360.

#[cfg(test)]
#[path = "rotate_test.rs"]
mod rotate_test;

use crate::camera::{Camera, Point, angle_deg};
use crate::doc::{Note, NoteId, PartialNote};
use crate::gesture::{GestureCommit, GestureGuard, GestureKind, GestureLocks};
use crate::input::{Pointer, PointerId};

#[derive(Debug)]
struct RotateSession {
    id: NoteId,
    pointer: PointerId,
    center_screen: Point,
    initial_angle: f64,
    start_rotation: f64,
    rotation: f64,
    _guard: GestureGuard,
}

/// Rotate handler for one board.
#[derive(Debug)]
pub struct NoteRotate {
    locks: GestureLocks,
    session: Option<RotateSession>,
}

impl NoteRotate {
    #[must_use]
    pub fn new(locks: GestureLocks) -> Self {
        Self { locks, session: None }
    }

    /// Start rotating `note`. The pivot is its current center as seen through `camera`.
    pub fn begin(&mut self, note: &Note, camera: &Camera, pointer: &Pointer) -> bool {
        if self.session.is_some() || !pointer.can_drive_gesture() {
            return false;
        }
        let center_screen = camera.world_to_screen(note.center());
        self.session = Some(RotateSession {
            id: note.id,
            pointer: pointer.id,
            center_screen,
            initial_angle: angle_deg(center_screen, pointer.screen),
            start_rotation: note.rotation,
            rotation: note.rotation,
            _guard: self.locks.acquire(GestureKind::Rotate),
        });
        true
    }

    /// Follow the pointer; returns the local rotation in degrees.
    pub fn update(&mut self, pointer: &Pointer) -> Option<f64> {
        let session = self.session.as_mut().filter(|s| s.pointer == pointer.id)?;
        let angle = angle_deg(session.center_screen, pointer.screen);
        session.rotation = session.start_rotation + (angle - session.initial_angle);
        Some(session.rotation)
    }

    /// Release and hand back the final rotation.
    pub fn end(&mut self, pointer: &Pointer) -> Option<GestureCommit> {
        let rotation = self.update(pointer)?;
        let session = self.session.take()?;
        tracing::debug!(note = %session.id, rotation, "rotate committed");
        Some(GestureCommit { id: session.id, fields: PartialNote::rotation(rotation) })
    }

    /// Double activation of the handle: drop any live rotation and commit 0.
    pub fn reset(&mut self, id: NoteId) -> GestureCommit {
        self.session = None;
        GestureCommit { id, fields: PartialNote::rotation(0.0) }
    }

    /// Abandon the rotation without committing.
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

    /// The note being rotated and its uncommitted rotation.
    #[must_use]
    pub fn preview(&self) -> Option<(NoteId, f64)> {
        self.session.as_ref().map(|s| (s.id, s.rotation))
    }
}
