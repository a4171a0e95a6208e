#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{DRAG_HANDLE_HEIGHT, RESIZE_HANDLE_SIZE, ROTATE_HANDLE_OFFSET, ROTATE_HANDLE_RADIUS_PX};
use crate::doc::{DocStore, Note, NoteId};

/// Which part of a note was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Anywhere on the note that isn't a handle. Activates but never drags.
    Body,
    /// Strip along the top edge that starts a drag.
    DragHandle,
    /// Square in the bottom-right corner that starts a resize.
    ResizeHandle,
    /// Knob above the top-right corner of the active note.
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub note_id: NoteId,
    pub part: HitPart,
}

/// Test which note (if any) is under `world_pt`, topmost first.
///
/// Handles are only reported for non-decor notes, and the rotate handle only
/// for the active one.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera, active: Option<NoteId>) -> Option<Hit> {
    doc.sorted_notes(active)
        .into_iter()
        .rev()
        .find_map(|note| hit_note(world_pt, note, camera, active == Some(note.id)))
}

/// Test a single note. `is_active` enables the rotate handle.
#[must_use]
pub fn hit_note(world_pt: Point, note: &Note, camera: &Camera, is_active: bool) -> Option<Hit> {
    let local = to_local(world_pt, note);
    let hit = |part| Some(Hit { note_id: note.id, part });

    if note.decor_mode {
        return if inside(local, note) { hit(HitPart::Body) } else { None };
    }

    if is_active {
        let knob = Point::new(note.width, -ROTATE_HANDLE_OFFSET);
        if local.distance(knob) <= camera.screen_dist_to_world(ROTATE_HANDLE_RADIUS_PX) {
            return hit(HitPart::RotateHandle);
        }
    }

    if !inside(local, note) {
        return None;
    }
    if local.x >= note.width - RESIZE_HANDLE_SIZE && local.y >= note.height - RESIZE_HANDLE_SIZE {
        return hit(HitPart::ResizeHandle);
    }
    if local.y <= DRAG_HANDLE_HEIGHT {
        return hit(HitPart::DragHandle);
    }
    hit(HitPart::Body)
}

/// Map a world point into the note's unrotated frame, origin at its top-left.
fn to_local(world_pt: Point, note: &Note) -> Point {
    let center = note.center();
    let (sin, cos) = note.rotation.to_radians().sin_cos();
    let dx = world_pt.x - center.x;
    let dy = world_pt.y - center.y;
    Point::new(
        dx * cos + dy * sin + note.width * 0.5,
        -dx * sin + dy * cos + note.height * 0.5,
    )
}

fn inside(local: Point, note: &Note) -> bool {
    (0.0..=note.width).contains(&local.x) && (0.0..=note.height).contains(&local.y)
}
