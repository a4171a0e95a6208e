//! Headless event replay.
//!
//! A script is JSON lines, one input event per line, tagged by `type`:
//!
//! ```text
//! {"type":"pointer_down","x":410,"y":310}
//! {"type":"pointer_move","x":460,"y":330}
//! {"type":"pointer_up","x":460,"y":330,"at_ms":16}
//! {"type":"wheel","dy":-100,"at_ms":20}
//! {"type":"key_down","key":"v","modifiers":{"ctrl":true},"clipboard":[{"mime":"text/plain","text":"hi"}]}
//! {"type":"tick","at_ms":400}
//! ```
//!
//! The whole script is parsed before the first event runs, so a typo on
//! line 40 never leaves the board half-replayed. Blank lines and lines
//! starting with `#` are skipped.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use canvas::camera::Point;
use canvas::engine::Action;
use canvas::input::{Button, Focus, Key, Modifiers, Pointer, PointerId, PointerKind, WheelDelta};
use serde::Deserialize;
use tracing::{debug, info};

use crate::services::clipboard::ClipboardItem;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSpec {
    #[default]
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSpec {
    #[default]
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerSpec {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pointer_id")]
    pub id: i32,
    #[serde(default)]
    pub kind: KindSpec,
    #[serde(default = "default_true")]
    pub primary: bool,
    #[serde(default)]
    pub button: ButtonSpec,
    #[serde(default)]
    pub at_ms: f64,
}

impl PointerSpec {
    #[must_use]
    pub fn pointer(&self) -> Pointer {
        let kind = match self.kind {
            KindSpec::Mouse => PointerKind::Mouse,
            KindSpec::Pen => PointerKind::Pen,
            KindSpec::Touch => PointerKind::Touch,
        };
        let button = match self.button {
            ButtonSpec::Primary => Button::Primary,
            ButtonSpec::Middle => Button::Middle,
            ButtonSpec::Secondary => Button::Secondary,
        };
        Pointer { id: PointerId(self.id), kind, is_primary: self.primary, button, screen: Point::new(self.x, self.y) }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModifierSpec {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Clipboard item as written in a script: `text` or base64 `data`.
#[derive(Debug, Deserialize)]
struct ClipSpec {
    mime: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// A decoded clipboard item carried by a `key_down` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ClipSpec")]
pub struct ClipItem(pub ClipboardItem);

impl TryFrom<ClipSpec> for ClipItem {
    type Error = base64::DecodeError;

    fn try_from(spec: ClipSpec) -> Result<Self, Self::Error> {
        let data = match (spec.text, spec.data) {
            (Some(text), _) => text.into_bytes(),
            (None, Some(encoded)) => STANDARD.decode(encoded.trim())?,
            (None, None) => Vec::new(),
        };
        Ok(Self(ClipboardItem::new(spec.mime, data)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeySpec {
    pub key: String,
    #[serde(default)]
    pub modifiers: ModifierSpec,
    /// A text-editing control has focus.
    #[serde(default)]
    pub editing: bool,
    /// What the clipboard holds if this key triggers a paste.
    #[serde(default)]
    pub clipboard: Vec<ClipItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    PointerDown(PointerSpec),
    PointerMove(PointerSpec),
    PointerUp(PointerSpec),
    PointerCancel {
        #[serde(default = "default_pointer_id")]
        id: i32,
        #[serde(default)]
        at_ms: f64,
    },
    Wheel {
        #[serde(default)]
        dx: f64,
        dy: f64,
        #[serde(default)]
        at_ms: f64,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    KeyDown(KeySpec),
    Tick {
        at_ms: f64,
    },
}

fn default_pointer_id() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// Tally of what a replay did to the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub camera_changes: usize,
}

impl ReplaySummary {
    fn count(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::NoteCreated(_) => self.created += 1,
                Action::NoteUpdated(_) => self.updated += 1,
                Action::NoteDeleted { .. } => self.deleted += 1,
                Action::CameraChanged(_) => self.camera_changes += 1,
                _ => {}
            }
        }
    }
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns [`ReplayError::Parse`] with the 1-based line of the first bad event.
pub fn parse_script(raw: &str) -> Result<Vec<ReplayEvent>, ReplayError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| serde_json::from_str(line).map_err(|source| ReplayError::Parse { line: idx + 1, source }))
        .collect()
}

/// Feed events through the engine in order, carrying out every action.
pub async fn run_script(state: &AppState, events: Vec<ReplayEvent>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for event in events {
        debug!(?event, "replay event");
        let actions = apply_event(state, event).await;
        summary.events += 1;
        summary.count(&actions);
    }
    info!(
        events = summary.events,
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "replay finished"
    );
    summary
}

/// Read, parse, and run a script file.
///
/// # Errors
///
/// Returns a [`ReplayError`] if the file can't be read or any line is invalid.
pub async fn run_file(state: &AppState, path: &Path) -> Result<ReplaySummary, ReplayError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let events = parse_script(&raw)?;
    Ok(run_script(state, events).await)
}

async fn apply_event(state: &AppState, event: ReplayEvent) -> Vec<Action> {
    match event {
        ReplayEvent::PointerDown(spec) => state.drive(|engine| engine.on_pointer_down(spec.pointer())).await,
        ReplayEvent::PointerMove(spec) => state.drive(|engine| engine.on_pointer_move(spec.pointer())).await,
        ReplayEvent::PointerUp(spec) => state.drive(|engine| engine.on_pointer_up(spec.pointer(), spec.at_ms)).await,
        ReplayEvent::PointerCancel { id, at_ms } => {
            state.drive(|engine| engine.on_pointer_cancel(PointerId(id), at_ms)).await
        }
        ReplayEvent::Wheel { dx, dy, at_ms } => state.drive(|engine| engine.on_wheel(WheelDelta { dx, dy }, at_ms)).await,
        ReplayEvent::DoubleClick { x, y } => state.drive(|engine| engine.on_double_click(Point::new(x, y))).await,
        ReplayEvent::KeyDown(spec) => apply_key(state, spec).await,
        ReplayEvent::Tick { at_ms } => state.drive(|engine| engine.tick(at_ms)).await,
    }
}

async fn apply_key(state: &AppState, spec: KeySpec) -> Vec<Action> {
    let key = Key::new(&spec.key);
    let modifiers = Modifiers {
        shift: spec.modifiers.shift,
        ctrl: spec.modifiers.ctrl,
        alt: spec.modifiers.alt,
        meta: spec.modifiers.meta,
    };
    let focus = if spec.editing { Focus::TextEditing } else { Focus::Board };

    let mut actions = state.drive(|engine| engine.on_key_down(&key, modifiers, focus)).await;
    if actions.contains(&Action::PasteRequested) {
        let items: Vec<ClipboardItem> = spec.clipboard.into_iter().map(|clip| clip.0).collect();
        if let Some(id) = state.paste(&items, focus).await {
            if let Some(note) = state.engine.read().await.note(&id) {
                actions.push(Action::NoteCreated(note.to_record()));
            }
        }
    }
    actions
}

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;
