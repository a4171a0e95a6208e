//! Note collection: the authoritative set of notes plus the active selection.
//!
//! Every mutation returns the [`Action`]s the host must forward: the
//! normalized record to persist, the id to delete, selection changes, and
//! user-visible notices.

#[cfg(test)]
#[path = "notes_test.rs"]
mod notes_test;

use rand::Rng;
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, DEFAULT_Z_INDEX, PLACEHOLDER_CONTENT, SPAWN_JITTER};
use crate::doc::{DocStore, Note, NoteId, NoteRecord, PartialNote};
use crate::engine::Action;

/// Direction for a z-order step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    Up,
    Down,
}

/// Owns every live note and the single active selection.
#[derive(Default)]
pub struct NoteCollection {
    doc: DocStore,
    active: Option<NoteId>,
    lock_decor: bool,
}

impl NoteCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every note with `records`, e.g. at startup or after import.
    /// The selection is cleared.
    pub fn load(&mut self, records: Vec<NoteRecord>) {
        self.doc.load_snapshot(records.into_iter().map(Note::from).collect());
        self.active = None;
    }

    /// Add a note built from `draft`.
    ///
    /// Missing fields get defaults: a fresh id, a position jittered up to
    /// [`SPAWN_JITTER`] units up/left of `spawn_center`, a 200x150 size, a
    /// random pastel color, and z-index 1. Fields present in `draft` win.
    pub fn create(&mut self, draft: PartialNote, spawn_center: Point, rng: &mut impl Rng) -> Vec<Action> {
        let note = Note {
            id: Uuid::new_v4(),
            x: draft.x.unwrap_or_else(|| spawn_center.x + jitter(rng)),
            y: draft.y.unwrap_or_else(|| spawn_center.y + jitter(rng)),
            width: draft.width.unwrap_or(DEFAULT_NOTE_WIDTH),
            height: draft.height.unwrap_or(DEFAULT_NOTE_HEIGHT),
            content: draft.content.unwrap_or_else(|| PLACEHOLDER_CONTENT.to_owned()),
            color: draft.color.unwrap_or_else(|| random_pastel(rng)),
            rotation: draft.rotation.unwrap_or(0.0),
            z_index: draft.z_index.unwrap_or(DEFAULT_Z_INDEX).max(0),
            decor_mode: draft.decor_mode.unwrap_or(false),
        };
        // Route through the record conversion so bad sizes are repaired.
        let note = Note::from(note.to_record());
        let record = note.to_record();
        tracing::debug!(note = %note.id, x = note.x, y = note.y, "note created");
        self.doc.insert(note);
        vec![Action::NoteCreated(record)]
    }

    /// Merge `fields` into the note. Unknown ids are a no-op.
    ///
    /// Turning on decor mode for the active note also clears the selection.
    pub fn update(&mut self, id: NoteId, fields: &PartialNote) -> Vec<Action> {
        if !self.doc.apply_partial(&id, fields) {
            return Vec::new();
        }
        let mut actions = self.record_of(id).map(Action::NoteUpdated).into_iter().collect::<Vec<_>>();
        if fields.decor_mode == Some(true) && self.active == Some(id) {
            self.active = None;
            actions.push(Action::ActiveChanged(None));
        }
        actions
    }

    /// Remove the note. Clears the selection only if it pointed at this note.
    pub fn delete(&mut self, id: NoteId) -> Vec<Action> {
        if self.doc.remove(&id).is_none() {
            return Vec::new();
        }
        tracing::debug!(note = %id, "note deleted");
        let mut actions = vec![Action::NoteDeleted { id }];
        if self.active == Some(id) {
            self.active = None;
            actions.push(Action::ActiveChanged(None));
        }
        actions
    }

    /// Step the stored z-index one layer, never below 0.
    pub fn change_z_order(&mut self, id: NoteId, direction: ZDirection) -> Vec<Action> {
        let Some(current) = self.doc.get(&id).map(|n| n.z_index) else {
            return Vec::new();
        };
        let next = match direction {
            ZDirection::Up => current.saturating_add(1),
            ZDirection::Down => current.saturating_sub(1).max(0),
        };
        let mut actions = self.update(id, &PartialNote::z_index(next));
        actions.push(Action::Notify(format!("moved to layer {next}")));
        actions
    }

    /// Make `id` the only active note, or clear the selection with `None`.
    /// Ids that don't exist clear the selection.
    pub fn set_active(&mut self, id: Option<NoteId>) -> Vec<Action> {
        let next = id.filter(|id| self.doc.get(id).is_some());
        if next == self.active {
            return Vec::new();
        }
        self.active = next;
        vec![Action::ActiveChanged(next)]
    }

    #[must_use]
    pub fn active(&self) -> Option<NoteId> {
        self.active
    }

    /// Whether decor notes are locked against leaving decor mode.
    #[must_use]
    pub fn lock_decor(&self) -> bool {
        self.lock_decor
    }

    pub fn set_lock_decor(&mut self, locked: bool) {
        self.lock_decor = locked;
    }

    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    /// Notes in draw order, the active one last.
    #[must_use]
    pub fn draw_order(&self) -> Vec<&Note> {
        self.doc.sorted_notes(self.active)
    }

    /// Normalized records for every note.
    #[must_use]
    pub fn records(&self) -> Vec<NoteRecord> {
        self.doc.records()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    fn record_of(&self, id: NoteId) -> Option<NoteRecord> {
        self.doc.get(&id).map(Note::to_record)
    }
}

/// Offset in `[-SPAWN_JITTER, 0)`.
fn jitter(rng: &mut impl Rng) -> f64 {
    (rng.random::<f64>() - 1.0) * SPAWN_JITTER
}

/// A random light background in `hsl(h, 70%, 80%)` form.
#[must_use]
pub fn random_pastel(rng: &mut impl Rng) -> String {
    format!("hsl({}, 70%, 80%)", rng.random_range(0..360))
}
