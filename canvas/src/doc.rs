//! Document model: notes, their persisted record form, and the in-memory store.
//!
//! This module defines the authoritative note type (`Note`), the normalized
//! record handed to persistence (`NoteRecord`), a sparse-update type for
//! field patches (`PartialNote`), and the runtime store that owns all live
//! notes (`DocStore`).
//!
//! Records flow in from persistence at startup (and from import) and flow
//! out on every committed mutation. The renderer reads from `DocStore` via
//! `sorted_notes` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{ACTIVE_Z_INDEX, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, DEFAULT_Z_INDEX, IMAGE_CONTENT_PREFIX};

/// Unique identifier for a note.
pub type NoteId = Uuid;

/// A positioned, sized, rotatable note card.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Unique identifier for this note. Never changes.
    pub id: NoteId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    /// Width in canvas units; always positive.
    pub width: f64,
    /// Height in canvas units; always positive.
    pub height: f64,
    /// Markdown text, or an image encoded as a `data:image/...` URI.
    pub content: String,
    /// Background color as a CSS color string.
    pub color: String,
    /// Clockwise rotation in degrees around the note's center. Not normalized.
    pub rotation: f64,
    /// Stacking order among inactive notes; never negative.
    pub z_index: i64,
    /// Borderless overlay mode without handles or toolbar.
    pub decor_mode: bool,
}

impl Note {
    /// Whether the content is an embedded image rather than text.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content.starts_with(IMAGE_CONTENT_PREFIX)
    }

    /// Center of the note in canvas coordinates; the rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        self.frame().center()
    }

    /// Geometry of the note as committed.
    #[must_use]
    pub fn frame(&self) -> NoteFrame {
        NoteFrame { x: self.x, y: self.y, width: self.width, height: self.height, rotation: self.rotation }
    }

    /// z-index reported to the renderer for the active note. Draw order
    /// itself comes from [`DocStore::sorted_notes`].
    #[must_use]
    pub fn effective_z_index(&self, active: Option<NoteId>) -> i64 {
        if active == Some(self.id) { ACTIVE_Z_INDEX } else { self.z_index }
    }

    /// Normalized record for persistence. Every optional field is filled in.
    #[must_use]
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            content: self.content.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            color: self.color.clone(),
            rotation: Some(self.rotation),
            z_index: Some(self.z_index),
            decor_mode: Some(self.decor_mode),
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            x: finite_or(record.x, 0.0),
            y: finite_or(record.y, 0.0),
            width: positive_or(record.width, DEFAULT_NOTE_WIDTH),
            height: positive_or(record.height, DEFAULT_NOTE_HEIGHT),
            content: record.content,
            color: record.color,
            rotation: finite_or(record.rotation.unwrap_or(0.0), 0.0),
            z_index: record.z_index.unwrap_or(DEFAULT_Z_INDEX).max(0),
            decor_mode: record.decor_mode.unwrap_or(false),
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

/// Live geometry of a note, possibly overridden by an in-flight gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl NoteFrame {
    /// Center of the frame in canvas coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// A note as stored by the persistence collaborator and in export documents.
///
/// Field names match the stored JSON (`zIndex`, `decorMode`). Optional fields
/// are omitted when absent so older records survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: NoteId,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decor_mode: Option<bool>,
}

/// Sparse update for a note. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decor_mode: Option<bool>,
}

impl PartialNote {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Self::default() }
    }

    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self { z_index: Some(z_index), ..Self::default() }
    }

    #[must_use]
    pub fn decor_mode(decor_mode: bool) -> Self {
        Self { decor_mode: Some(decor_mode), ..Self::default() }
    }

    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Self::default() }
    }
}

/// In-memory store of notes.
pub struct DocStore {
    notes: HashMap<NoteId, Note>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { notes: HashMap::new() }
    }

    /// Insert or replace a note. If a note with the same `id` already
    /// exists it is overwritten.
    pub fn insert(&mut self, note: Note) {
        self.notes.insert(note.id, note);
    }

    /// Remove a note by id, returning it if it was present.
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        self.notes.remove(id)
    }

    /// Return a reference to a note by id.
    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Apply a partial update to an existing note. Returns false if the note doesn't exist.
    ///
    /// Sizes are floored at a hair above zero and z-index at zero so a patch
    /// can never break the note invariants.
    pub fn apply_partial(&mut self, id: &NoteId, partial: &PartialNote) -> bool {
        let Some(note) = self.notes.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            note.x = x;
        }
        if let Some(y) = partial.y {
            note.y = y;
        }
        if let Some(w) = partial.width {
            note.width = w.max(f64::MIN_POSITIVE);
        }
        if let Some(h) = partial.height {
            note.height = h.max(f64::MIN_POSITIVE);
        }
        if let Some(ref content) = partial.content {
            note.content.clone_from(content);
        }
        if let Some(ref color) = partial.color {
            note.color.clone_from(color);
        }
        if let Some(r) = partial.rotation {
            note.rotation = r;
        }
        if let Some(z) = partial.z_index {
            note.z_index = z.max(0);
        }
        if let Some(decor) = partial.decor_mode {
            note.decor_mode = decor;
        }
        true
    }

    /// Replace all notes with a full snapshot.
    pub fn load_snapshot(&mut self, notes: Vec<Note>) {
        self.notes.clear();
        for note in notes {
            self.notes.insert(note.id, note);
        }
    }

    /// Return all notes in draw order: the active note last, the rest by
    /// stored z-index, then id.
    #[must_use]
    pub fn sorted_notes(&self, active: Option<NoteId>) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by_key(|note| (active == Some(note.id), note.z_index, note.id));
        notes
    }

    /// Normalized records for every note, in draw order with nothing active.
    #[must_use]
    pub fn records(&self) -> Vec<NoteRecord> {
        self.sorted_notes(None).into_iter().map(Note::to_record).collect()
    }

    /// Number of notes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns `true` if the store contains no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
