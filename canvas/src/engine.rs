use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::{CURSOR_RESET_MS, DEFAULT_MIN_NOTE_SIZE, GUIDE_NOTE_HEIGHT, GUIDE_NOTE_WIDTH};
use crate::doc::{Note, NoteFrame, NoteId, NoteRecord, PartialNote};
use crate::drag::NoteDrag;
use crate::gesture::{GestureCommit, GestureLocks};
use crate::hit::{HitPart, hit_test};
use crate::input::{Focus, Key, Modifiers, Pointer, PointerId, PointerKind, WheelDelta};
use crate::notes::{NoteCollection, ZDirection};
use crate::resize::NoteResize;
use crate::rotate::NoteRotate;
use crate::viewport::{CameraController, CursorMode, ViewChange};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const GUIDE_CONTENT: &str = "welcome to your note board!

here's how to use it:
- drag empty space: move around the canvas
- scroll or pinch: zoom in & out
- ctrl/cmd + v: paste text or images from the clipboard
- double-click a note: toggle decor mode
- drag the top strip to move a note, the corner to resize it, and the knob to rotate it";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A note was created; persist the record.
    NoteCreated(NoteRecord),
    /// A note changed; persist the full record.
    NoteUpdated(NoteRecord),
    /// A note was removed; delete it from persistence.
    NoteDeleted { id: NoteId },
    /// The active selection changed.
    ActiveChanged(Option<NoteId>),
    /// Pan or scale changed; persist to settings.
    CameraChanged(Camera),
    /// Switch the board cursor.
    SetCursor(CursorMode),
    /// The paste shortcut fired outside text editing; read the clipboard.
    PasteRequested,
    /// Show a short notice to the user.
    Notify(String),
    /// Redraw from current state; nothing to persist.
    RenderNeeded,
}

/// Tunables the host passes in at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Resize floor for both axes, in canvas units.
    pub min_note_size: f64,
    /// Delay before the transient `Scaling` cursor reverts.
    pub cursor_reset_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { min_note_size: DEFAULT_MIN_NOTE_SIZE, cursor_reset_ms: CURSOR_RESET_MS }
    }
}

/// Core engine state: the note collection, the camera, and every gesture
/// handler, wired to one shared [`GestureLocks`] registry.
///
/// Input arrives as plain values from the host's event loop; every handler
/// returns the [`Action`]s the host must carry out.
pub struct EngineCore {
    notes: NoteCollection,
    camera: Camera,
    viewport: Viewport,
    locks: GestureLocks,
    drag: NoteDrag,
    resize: NoteResize,
    rotate: NoteRotate,
    view: CameraController,
    rng: StdRng,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::build(config, StdRng::from_os_rng())
    }

    /// Deterministic placement jitter and colors, for replays and tests.
    #[must_use]
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: EngineConfig, rng: StdRng) -> Self {
        let locks = GestureLocks::new();
        Self {
            notes: NoteCollection::new(),
            camera: Camera::default(),
            viewport: Viewport::new(0.0, 0.0),
            drag: NoteDrag::new(locks.clone()),
            resize: NoteResize::with_min_size(locks.clone(), config.min_note_size),
            rotate: NoteRotate::new(locks.clone()),
            view: CameraController::with_cursor_reset(locks.clone(), config.cursor_reset_ms),
            locks,
            rng,
        }
    }

    // --- Data inputs ---

    /// Hydrate the collection from persisted records. Any live gesture is dropped.
    pub fn load_snapshot(&mut self, records: Vec<NoteRecord>) {
        self.drag.cancel();
        self.resize.cancel();
        self.rotate.cancel();
        self.notes.load(records);
    }

    /// Restore a persisted camera. The scale is clamped.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Camera::new(camera.pan_x, camera.pan_y, camera.zoom);
    }

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
    }

    pub fn set_lock_decor(&mut self, locked: bool) {
        self.notes.set_lock_decor(locked);
    }

    // --- Collection operations ---

    /// Add a note at the canvas point under the viewport center, jittered.
    pub fn add_note(&mut self, draft: PartialNote) -> Vec<Action> {
        let center = self.camera.screen_center_to_canvas(self.viewport);
        let mut actions = self.notes.create(draft, center, &mut self.rng);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Add the 500x300 note that explains the controls.
    pub fn add_guide_note(&mut self) -> Vec<Action> {
        self.add_note(PartialNote {
            width: Some(GUIDE_NOTE_WIDTH),
            height: Some(GUIDE_NOTE_HEIGHT),
            content: Some(GUIDE_CONTENT.to_owned()),
            ..PartialNote::default()
        })
    }

    pub fn update_note(&mut self, id: NoteId, fields: &PartialNote) -> Vec<Action> {
        self.notes.update(id, fields)
    }

    /// Replace a note's text (or image URI). Decor notes are read-only while
    /// the decor lock is on.
    pub fn set_content(&mut self, id: NoteId, content: &str) -> Vec<Action> {
        let decor = self.notes.get(&id).is_some_and(|n| n.decor_mode);
        if decor && self.notes.lock_decor() {
            tracing::debug!(note = %id, "content edit blocked by decor lock");
            return Vec::new();
        }
        self.notes.update(id, &PartialNote::content(content))
    }

    pub fn set_color(&mut self, id: NoteId, color: &str) -> Vec<Action> {
        self.notes.update(id, &PartialNote::color(color))
    }

    pub fn delete_note(&mut self, id: NoteId) -> Vec<Action> {
        self.notes.delete(id)
    }

    pub fn change_z_order(&mut self, id: NoteId, direction: ZDirection) -> Vec<Action> {
        self.notes.change_z_order(id, direction)
    }

    pub fn set_active(&mut self, id: Option<NoteId>) -> Vec<Action> {
        self.notes.set_active(id)
    }

    // --- Input events ---

    /// Pointer pressed. Routes to a note handle, activation, pan, or pinch.
    pub fn on_pointer_down(&mut self, pointer: Pointer) -> Vec<Action> {
        let mut actions = Vec::new();
        if pointer.kind == PointerKind::Touch {
            let change = self.view.touch_down(&pointer, &self.camera);
            self.push_view(&mut actions, change);
            if self.view.is_pinching() {
                return actions;
            }
        }
        if !pointer.can_drive_gesture() || self.note_gesture_live() {
            return actions;
        }

        let world = self.camera.screen_to_world(pointer.screen);
        let hit = hit_test(world, self.notes.doc(), &self.camera, self.notes.active());
        let target = hit.and_then(|h| self.notes.get(&h.note_id).map(|n| (h.part, n.clone())));

        match target {
            Some((HitPart::RotateHandle, note)) => {
                if self.rotate.begin(&note, &self.camera, &pointer) {
                    actions.push(Action::RenderNeeded);
                }
            }
            Some((HitPart::ResizeHandle, note)) => {
                if self.resize.begin(&note, &pointer) {
                    actions.push(Action::RenderNeeded);
                }
            }
            Some((HitPart::DragHandle, note)) => {
                actions.extend(self.notes.set_active(Some(note.id)));
                if self.drag.begin(&note, &pointer) {
                    actions.push(Action::RenderNeeded);
                }
            }
            Some((HitPart::Body, note)) if !note.decor_mode => {
                actions.extend(self.notes.set_active(Some(note.id)));
            }
            // Empty canvas, or a decor overlay that lets presses through.
            _ => {
                actions.extend(self.notes.set_active(None));
                let change = self.view.begin_pan(&pointer);
                self.push_view(&mut actions, change);
            }
        }
        actions
    }

    /// Pointer moved. Updates the live preview or the camera.
    pub fn on_pointer_move(&mut self, pointer: Pointer) -> Vec<Action> {
        let mut actions = Vec::new();
        if pointer.kind == PointerKind::Touch {
            let change = self.view.touch_move(&pointer, &mut self.camera);
            self.push_view(&mut actions, change);
        }

        let zoom = self.camera.zoom;
        let previewed = if self.drag.is_driven_by(pointer.id) {
            self.drag.update(&pointer, zoom).is_some()
        } else if self.resize.is_driven_by(pointer.id) {
            self.resize.update(&pointer, zoom).is_some()
        } else if self.rotate.is_driven_by(pointer.id) {
            self.rotate.update(&pointer).is_some()
        } else {
            let change = self.view.pan_move(&pointer, &mut self.camera);
            self.push_view(&mut actions, change);
            false
        };
        if previewed {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer released. Commits whichever gesture this pointer drove.
    pub fn on_pointer_up(&mut self, pointer: Pointer, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if pointer.kind == PointerKind::Touch {
            let change = self.view.touch_up(pointer.id, now_ms);
            self.push_view(&mut actions, change);
        }

        let zoom = self.camera.zoom;
        let commit = if self.drag.is_driven_by(pointer.id) {
            self.drag.end(&pointer, zoom)
        } else if self.resize.is_driven_by(pointer.id) {
            self.resize.end(&pointer, zoom)
        } else if self.rotate.is_driven_by(pointer.id) {
            self.rotate.end(&pointer)
        } else {
            None
        };
        if let Some(commit) = commit {
            actions.extend(self.commit(commit));
        }

        let change = self.view.end_pan(pointer.id);
        self.push_view(&mut actions, change);
        actions
    }

    /// Pointer cancelled by the host. Gestures it drove end without a commit.
    pub fn on_pointer_cancel(&mut self, pointer: PointerId, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let cancelled = if self.drag.is_driven_by(pointer) {
            self.drag.cancel()
        } else if self.resize.is_driven_by(pointer) {
            self.resize.cancel()
        } else if self.rotate.is_driven_by(pointer) {
            self.rotate.cancel()
        } else {
            None
        };
        if let Some(id) = cancelled {
            tracing::debug!(note = %id, "gesture cancelled");
            actions.push(Action::RenderNeeded);
        }
        let change = self.view.cancel(pointer, now_ms);
        self.push_view(&mut actions, change);
        actions
    }

    /// Wheel over the canvas: zoom anchored at the viewport center.
    pub fn on_wheel(&mut self, delta: WheelDelta, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let change = self.view.wheel(delta, self.viewport, &mut self.camera, now_ms);
        self.push_view(&mut actions, change);
        actions
    }

    /// Double activation: resets rotation on the rotate handle, otherwise
    /// toggles decor mode on the note underneath.
    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        let Some(hit) = hit_test(world, self.notes.doc(), &self.camera, self.notes.active()) else {
            return Vec::new();
        };
        if hit.part == HitPart::RotateHandle {
            let commit = self.rotate.reset(hit.note_id);
            return self.commit(commit);
        }
        if self.notes.lock_decor() {
            return Vec::new();
        }
        let Some(decor) = self.notes.get(&hit.note_id).map(|n| n.decor_mode) else {
            return Vec::new();
        };
        let mut actions = self.notes.update(hit.note_id, &PartialNote::decor_mode(!decor));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Keyboard shortcuts. Ignored while a text-editing control has focus.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, focus: Focus) -> Vec<Action> {
        if focus.is_editing() {
            return Vec::new();
        }
        if modifiers.command() && key.is_v() {
            return vec![Action::PasteRequested];
        }
        if key.is_delete() {
            if let Some(id) = self.notes.active() {
                let mut actions = self.notes.delete(id);
                actions.push(Action::RenderNeeded);
                return actions;
            }
        }
        Vec::new()
    }

    /// Host timer tick; reverts the transient cursor once its delay passes.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let change = self.view.poll(now_ms);
        self.push_view(&mut actions, change);
        actions
    }

    fn commit(&mut self, commit: GestureCommit) -> Vec<Action> {
        let mut actions = self.notes.update(commit.id, &commit.fields);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn push_view(&self, actions: &mut Vec<Action>, change: ViewChange) {
        if change.camera {
            actions.push(Action::CameraChanged(self.camera));
            actions.push(Action::RenderNeeded);
        }
        if let Some(mode) = change.cursor {
            actions.push(Action::SetCursor(mode));
        }
    }

    fn note_gesture_live(&self) -> bool {
        self.drag.is_active() || self.resize.is_active() || self.rotate.is_active()
    }

    // --- Queries ---

    /// Geometry to draw for `id`, with any in-flight gesture's local value applied.
    #[must_use]
    pub fn preview(&self, id: &NoteId) -> Option<NoteFrame> {
        let mut frame = self.notes.get(id)?.frame();
        if let Some((_, pos)) = self.drag.preview().filter(|(d, _)| d == id) {
            frame.x = pos.x;
            frame.y = pos.y;
        }
        if let Some((_, w, h)) = self.resize.preview().filter(|(r, _, _)| r == id) {
            frame.width = w;
            frame.height = h;
        }
        if let Some((_, rotation)) = self.rotate.preview().filter(|(r, _)| r == id) {
            frame.rotation = rotation;
        }
        Some(frame)
    }

    /// Notes bottom to top.
    #[must_use]
    pub fn draw_order(&self) -> Vec<&Note> {
        self.notes.draw_order()
    }

    #[must_use]
    pub fn active(&self) -> Option<NoteId> {
        self.notes.active()
    }

    #[must_use]
    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    #[must_use]
    pub fn records(&self) -> Vec<NoteRecord> {
        self.notes.records()
    }

    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn cursor_mode(&self) -> CursorMode {
        self.view.cursor_mode()
    }

    #[must_use]
    pub fn lock_decor(&self) -> bool {
        self.notes.lock_decor()
    }

    /// Handle to the shared gesture flags.
    #[must_use]
    pub fn locks(&self) -> &GestureLocks {
        &self.locks
    }
}
