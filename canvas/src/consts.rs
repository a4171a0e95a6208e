//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed camera scale.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest allowed camera scale.
pub const MAX_ZOOM: f64 = 2.0;

/// Scale change per pixel of wheel `deltaY`.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.001;

/// Delay before a transient cursor mode reverts to default, in milliseconds.
pub const CURSOR_RESET_MS: f64 = 300.0;

// ── Notes ───────────────────────────────────────────────────────

/// Width of a note created without an explicit size.
pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;

/// Height of a note created without an explicit size.
pub const DEFAULT_NOTE_HEIGHT: f64 = 150.0;

/// Stored z-index for a note created without one.
pub const DEFAULT_Z_INDEX: i64 = 1;

/// Render-time z-index of the active note; it always draws above the rest.
pub const ACTIVE_Z_INDEX: i64 = 999;

/// Default resize floor in canvas units.
pub const DEFAULT_MIN_NOTE_SIZE: f64 = 60.0;

/// New notes land up to this many canvas units up/left of the viewport center.
pub const SPAWN_JITTER: f64 = 40.0;

/// Prefix that marks note content as an embedded image.
pub const IMAGE_CONTENT_PREFIX: &str = "data:image";

/// Content of a freshly added blank note.
pub const PLACEHOLDER_CONTENT: &str = "type something...";

// ── Hit-testing ─────────────────────────────────────────────────

/// Height of the drag strip along the top edge of a note, in canvas units.
pub const DRAG_HANDLE_HEIGHT: f64 = 32.0;

/// Side of the square resize handle in the bottom-right corner, in canvas units.
pub const RESIZE_HANDLE_SIZE: f64 = 16.0;

/// Radius of the rotate handle hit area, in screen pixels.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 12.0;

/// Distance of the rotate handle above the note's top-right corner, in canvas units.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;

// ── Pinch ───────────────────────────────────────────────────────

/// Two touches closer than this (screen pixels) can't start a pinch.
pub const MIN_PINCH_DISTANCE_PX: f64 = 10.0;

// ── Guide ───────────────────────────────────────────────────────

/// Width of the first-visit guide note.
pub const GUIDE_NOTE_WIDTH: f64 = 500.0;

/// Height of the first-visit guide note.
pub const GUIDE_NOTE_HEIGHT: f64 = 300.0;
