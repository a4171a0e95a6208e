//! Camera manipulation: panning, wheel zoom, and two-finger pinch.
//!
//! Panning and zooming are independent. Both stand down while the gesture
//! registry reports a note drag, resize, or rotate, and panning also stands
//! down while a pinch is in progress. Wheel zoom is anchored at the viewport
//! center; pinch zoom is anchored at the point where the two fingers started.
//!
//! Time is supplied by the host as milliseconds on any monotonic clock. The
//! transient `Scaling` cursor reverts after `cursor_reset_ms` without wheel
//! input; call [`CameraController::poll`] from the host's frame or timer tick.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::{CURSOR_RESET_MS, MIN_PINCH_DISTANCE_PX, WHEEL_ZOOM_FACTOR};
use crate::gesture::GestureLocks;
use crate::input::{Pointer, PointerId, WheelDelta};

/// Cursor hint the host shows over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Default,
    Panning,
    Scaling,
}

/// What changed as a result of one camera input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewChange {
    /// The camera was modified and should be redrawn and persisted.
    pub camera: bool,
    /// The cursor mode switched to this value.
    pub cursor: Option<CursorMode>,
}

impl ViewChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.camera && self.cursor.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct PanSession {
    pointer: PointerId,
    last_screen: Point,
}

#[derive(Debug, Clone, Copy)]
struct PinchSession {
    a: PointerId,
    b: PointerId,
    initial_dist: f64,
    origin: Point,
    base: Camera,
}

/// Pan/zoom state machine for the board camera.
#[derive(Debug)]
pub struct CameraController {
    locks: GestureLocks,
    cursor_reset_ms: f64,
    cursor_mode: CursorMode,
    cursor_reset_at: Option<f64>,
    pan: Option<PanSession>,
    touches: Vec<(PointerId, Point)>,
    pinch: Option<PinchSession>,
}

impl CameraController {
    #[must_use]
    pub fn new(locks: GestureLocks) -> Self {
        Self::with_cursor_reset(locks, CURSOR_RESET_MS)
    }

    #[must_use]
    pub fn with_cursor_reset(locks: GestureLocks, cursor_reset_ms: f64) -> Self {
        Self {
            locks,
            cursor_reset_ms: cursor_reset_ms.max(0.0),
            cursor_mode: CursorMode::Default,
            cursor_reset_at: None,
            pan: None,
            touches: Vec::new(),
            pinch: None,
        }
    }

    #[must_use]
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Camera input is blocked while a note gesture or a pinch owns the pointer stream.
    fn pan_blocked(&self) -> bool {
        self.locks.any_note_gesture() || self.pinch.is_some()
    }

    fn set_cursor(&mut self, mode: CursorMode) -> Option<CursorMode> {
        if self.cursor_mode == mode {
            return None;
        }
        self.cursor_mode = mode;
        Some(mode)
    }

    // --- Pan ---

    /// Pointer-down on empty canvas. Starts a pan unless something else owns the input.
    pub fn begin_pan(&mut self, pointer: &Pointer) -> ViewChange {
        if self.pan.is_some() || self.pan_blocked() || !pointer.can_drive_gesture() {
            return ViewChange::default();
        }
        self.pan = Some(PanSession { pointer: pointer.id, last_screen: pointer.screen });
        self.cursor_reset_at = None;
        ViewChange { camera: false, cursor: self.set_cursor(CursorMode::Panning) }
    }

    /// Add the pointer's screen delta since the last sample to the pan offset.
    pub fn pan_move(&mut self, pointer: &Pointer, camera: &mut Camera) -> ViewChange {
        let blocked = self.pan_blocked();
        let Some(pan) = self.pan.as_mut().filter(|p| p.pointer == pointer.id) else {
            return ViewChange::default();
        };
        let dx = pointer.screen.x - pan.last_screen.x;
        let dy = pointer.screen.y - pan.last_screen.y;
        pan.last_screen = pointer.screen;
        if blocked || (dx == 0.0 && dy == 0.0) {
            return ViewChange::default();
        }
        camera.pan_x += dx;
        camera.pan_y += dy;
        ViewChange { camera: true, cursor: None }
    }

    /// Pointer-up for the panning pointer. The cursor returns to default at once.
    pub fn end_pan(&mut self, pointer: PointerId) -> ViewChange {
        if !self.pan.is_some_and(|p| p.pointer == pointer) {
            return ViewChange::default();
        }
        self.pan = None;
        if self.pinch.is_some() {
            return ViewChange::default();
        }
        ViewChange { camera: false, cursor: self.set_cursor(CursorMode::Default) }
    }

    // --- Wheel ---

    /// Zoom by `scale - dy * 0.001`, anchored at the viewport center.
    pub fn wheel(&mut self, delta: WheelDelta, viewport: Viewport, camera: &mut Camera, now_ms: f64) -> ViewChange {
        if self.locks.any_note_gesture() || !delta.dy.is_finite() {
            return ViewChange::default();
        }
        let next = camera.zoom_anchored(viewport.center(), camera.zoom - delta.dy * WHEEL_ZOOM_FACTOR);
        let changed = next != *camera;
        *camera = next;
        self.cursor_reset_at = Some(now_ms + self.cursor_reset_ms);
        ViewChange { camera: changed, cursor: self.set_cursor(CursorMode::Scaling) }
    }

    /// Revert the transient cursor mode once its debounce deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> ViewChange {
        match self.cursor_reset_at {
            Some(at) if now_ms >= at => {
                self.cursor_reset_at = None;
                if self.pan.is_some() || self.pinch.is_some() {
                    return ViewChange::default();
                }
                ViewChange { camera: false, cursor: self.set_cursor(CursorMode::Default) }
            }
            _ => ViewChange::default(),
        }
    }

    // --- Pinch ---

    /// Track a touch point. A second finger starts a pinch unless a note
    /// gesture is live; a pinch supersedes any single-finger pan.
    pub fn touch_down(&mut self, pointer: &Pointer, camera: &Camera) -> ViewChange {
        self.touches.retain(|(id, _)| *id != pointer.id);
        self.touches.push((pointer.id, pointer.screen));
        if self.pinch.is_some() || self.touches.len() != 2 || self.locks.any_note_gesture() {
            return ViewChange::default();
        }
        let (a, pa) = self.touches[0];
        let (b, pb) = self.touches[1];
        let initial_dist = pa.distance(pb);
        if initial_dist < MIN_PINCH_DISTANCE_PX {
            return ViewChange::default();
        }
        self.pan = None;
        self.cursor_reset_at = None;
        self.pinch = Some(PinchSession { a, b, initial_dist, origin: pa.midpoint(pb), base: *camera });
        ViewChange { camera: false, cursor: self.set_cursor(CursorMode::Scaling) }
    }

    /// Move a touch point; rescales the camera when it belongs to the pinch.
    pub fn touch_move(&mut self, pointer: &Pointer, camera: &mut Camera) -> ViewChange {
        if let Some(slot) = self.touches.iter_mut().find(|(id, _)| *id == pointer.id) {
            slot.1 = pointer.screen;
        }
        let Some(pinch) = self.pinch else {
            return ViewChange::default();
        };
        if (pointer.id != pinch.a && pointer.id != pinch.b) || self.locks.any_note_gesture() {
            return ViewChange::default();
        }
        let (Some(pa), Some(pb)) = (self.touch_position(pinch.a), self.touch_position(pinch.b)) else {
            return ViewChange::default();
        };
        let ratio = pa.distance(pb) / pinch.initial_dist;
        let next = pinch.base.zoom_anchored(pinch.origin, pinch.base.zoom * ratio);
        let changed = next != *camera;
        *camera = next;
        ViewChange { camera: changed, cursor: None }
    }

    /// Lift a touch point. Ending a pinch schedules the cursor reset.
    pub fn touch_up(&mut self, pointer: PointerId, now_ms: f64) -> ViewChange {
        self.touches.retain(|(id, _)| *id != pointer);
        let ends_pinch = self.pinch.is_some_and(|p| p.a == pointer || p.b == pointer);
        if !ends_pinch {
            return ViewChange::default();
        }
        self.pinch = None;
        self.cursor_reset_at = Some(now_ms + self.cursor_reset_ms);
        ViewChange::default()
    }

    fn touch_position(&self, pointer: PointerId) -> Option<Point> {
        self.touches.iter().find(|(id, _)| *id == pointer).map(|(_, p)| *p)
    }

    /// Forget a cancelled pointer entirely.
    pub fn cancel(&mut self, pointer: PointerId, now_ms: f64) -> ViewChange {
        let mut change = self.touch_up(pointer, now_ms);
        let pan = self.end_pan(pointer);
        change.cursor = change.cursor.or(pan.cursor);
        change
    }
}
