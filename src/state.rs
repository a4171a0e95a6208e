//! Shared application state and the engine-to-storage bridge.
//!
//! DESIGN
//! ======
//! `AppState` owns the engine behind an async `RwLock` together with the
//! note repository, the settings store, and the writer queue. Every engine
//! call goes through [`AppState::drive`]: the write lock is held only while
//! the engine runs, and the returned actions are carried out after it is
//! released.

use std::path::Path;
use std::sync::Arc;

use canvas::doc::NoteId;
use canvas::engine::{Action, EngineCore};
use canvas::input::Focus;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info, warn};

use crate::services::clipboard::{self, ClipboardError, ClipboardItem, PasteContent};
use crate::services::persistence::{PersistOp, enqueue, settle};
use crate::services::repository::{NoteRepository, StoreError};
use crate::services::settings::Settings;
use crate::services::transfer::{self, TransferError};

/// What [`AppState::load`] restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub notes: usize,
    pub guide_added: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<EngineCore>>,
    pub repo: Arc<dyn NoteRepository>,
    pub settings: Settings,
    /// Background writer queue. `None` writes nothing until the next autosave.
    pub persist_tx: Option<mpsc::Sender<PersistOp>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        engine: EngineCore,
        repo: Arc<dyn NoteRepository>,
        settings: Settings,
        persist_tx: Option<mpsc::Sender<PersistOp>>,
    ) -> Self {
        Self { engine: Arc::new(RwLock::new(engine)), repo, settings, persist_tx }
    }

    /// Hydrate the engine from storage and settings.
    ///
    /// A failed read leaves the board empty rather than failing startup. On
    /// the first visit the guide note is added and the visit recorded.
    pub async fn load(&self) -> LoadSummary {
        let records = match self.repo.get_all().await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to load notes; starting empty");
                Vec::new()
            }
        };
        let notes = records.len();
        let camera = self.settings.load_camera().await;
        let lock_decor = self.settings.load_lock_decor().await;

        {
            let mut engine = self.engine.write().await;
            engine.load_snapshot(records);
            engine.set_camera(camera);
            engine.set_lock_decor(lock_decor);
        }
        info!(notes, scale = camera.zoom, lock_decor, "board loaded");

        let guide_added = !self.settings.has_visited().await;
        if guide_added {
            self.drive(EngineCore::add_guide_note).await;
            if let Err(e) = self.settings.mark_visited().await {
                warn!(error = %e, "failed to record first visit");
            }
        }

        LoadSummary { notes, guide_added }
    }

    /// Run one engine operation and carry out the actions it returns.
    pub async fn drive<F>(&self, op: F) -> Vec<Action>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = {
            let mut engine = self.engine.write().await;
            op(&mut engine)
        };
        self.dispatch(&actions).await;
        actions
    }

    /// Forward actions to their collaborators. Note writes are queued;
    /// camera changes are saved before returning.
    pub async fn dispatch(&self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::NoteCreated(record) | Action::NoteUpdated(record) => {
                    enqueue(self, PersistOp::Put(record.clone()));
                }
                Action::NoteDeleted { id } => enqueue(self, PersistOp::Delete(*id)),
                Action::CameraChanged(camera) => {
                    if let Err(e) = self.settings.save_camera(*camera).await {
                        warn!(error = %e, "failed to save camera");
                    }
                }
                Action::Notify(message) => info!(%message, "notice"),
                Action::ActiveChanged(id) => debug!(?id, "active note changed"),
                Action::SetCursor(mode) => debug!(?mode, "cursor"),
                Action::PasteRequested => debug!("paste requested"),
                Action::RenderNeeded => {}
            }
        }
    }

    /// Create a note from clipboard items. Returns the new note's id, or
    /// `None` if text editing has focus or nothing on the clipboard is usable.
    pub async fn paste(&self, items: &[ClipboardItem], focus: Focus) -> Option<NoteId> {
        if focus.is_editing() {
            return None;
        }
        match clipboard::extract(items) {
            Ok(content) => {
                let kind = if matches!(content, PasteContent::Image(_)) { "image" } else { "text" };
                let id = created_id(&self.drive(|engine| engine.add_note(content.into_draft())).await);
                info!(kind, ?id, "pasted note");
                id
            }
            Err(e) => {
                info!(items = items.len(), reason = %e, "paste ignored");
                None
            }
        }
    }

    /// Create an image note from a file.
    ///
    /// # Errors
    ///
    /// Returns a [`ClipboardError`] if the file isn't a readable image.
    pub async fn add_image(&self, path: &Path, focus: Focus) -> Result<Option<NoteId>, ClipboardError> {
        if focus.is_editing() {
            return Ok(None);
        }
        let uri = clipboard::read_image_file(path).await?;
        let actions = self.drive(|engine| engine.add_note(PasteContent::Image(uri).into_draft())).await;
        Ok(created_id(&actions))
    }

    /// Replace the board with the contents of an export file.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`]; on error neither storage nor the engine changes.
    pub async fn import(&self, path: &Path) -> Result<usize, TransferError> {
        // No new writes while the board swaps; queued ones land first.
        let mut engine = self.engine.write().await;
        settle(self).await;
        let records = transfer::import_from(path, self.repo.as_ref()).await?;
        let count = records.len();
        engine.load_snapshot(records);
        drop(engine);
        info!(count, path = %path.display(), "board imported");
        Ok(count)
    }

    /// Write the current board to an export file.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the file can't be written.
    pub async fn export(&self, path: &Path) -> Result<usize, TransferError> {
        let records = self.engine.read().await.records();
        transfer::export_to(path, &records).await?;
        info!(count = records.len(), path = %path.display(), "board exported");
        Ok(records.len())
    }

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the setting can't be saved.
    pub async fn set_lock_decor(&self, locked: bool) -> Result<(), StoreError> {
        self.engine.write().await.set_lock_decor(locked);
        self.settings.save_lock_decor(locked).await
    }
}

/// Id of the first note created by `actions`.
#[must_use]
pub fn created_id(actions: &[Action]) -> Option<NoteId> {
    actions.iter().find_map(|action| match action {
        Action::NoteCreated(record) => Some(record.id),
        _ => None,
    })
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
