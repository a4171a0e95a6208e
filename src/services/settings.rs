//! Board settings stored as JSON strings in a key-value table.
//!
//! Every reader tolerates a missing or malformed value by returning the
//! default and logging a warning; settings never block startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use canvas::camera::Camera;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::warn;

use super::repository::StoreError;

pub const PAN_ZOOM_KEY: &str = "noteboard-pan-zoom";
pub const LOCK_DECOR_KEY: &str = "noteboard-lock-decor";
pub const BOARD_SETTINGS_KEY: &str = "noteboard-settings";
pub const HAS_VISITED_KEY: &str = "noteboard-has-visited";

pub const DEFAULT_BG_COLOR: &str = "#f1f5f9";

#[async_trait]
pub trait KvStore: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store can't be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// STORED SHAPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pan {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Camera as stored: `{"pan":{"x":..,"y":..},"scale":..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanZoom {
    #[serde(default)]
    pub pan: Pan,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for PanZoom {
    fn default() -> Self {
        Self { pan: Pan::default(), scale: default_scale() }
    }
}

impl From<Camera> for PanZoom {
    fn from(camera: Camera) -> Self {
        Self { pan: Pan { x: camera.pan_x, y: camera.pan_y }, scale: camera.zoom }
    }
}

impl From<PanZoom> for Camera {
    fn from(stored: PanZoom) -> Self {
        Camera::new(stored.pan.x, stored.pan.y, stored.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSettings {
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
}

fn default_bg_color() -> String {
    DEFAULT_BG_COLOR.to_owned()
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self { bg_color: default_bg_color() }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Typed access to the board's settings keys.
#[derive(Clone)]
pub struct Settings {
    kv: Arc<dyn KvStore>,
}

impl Settings {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn load_camera(&self) -> Camera {
        self.read_json::<PanZoom>(PAN_ZOOM_KEY).await.into()
    }

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn save_camera(&self, camera: Camera) -> Result<(), StoreError> {
        self.write_json(PAN_ZOOM_KEY, &PanZoom::from(camera)).await
    }

    pub async fn load_lock_decor(&self) -> bool {
        self.read_json::<bool>(LOCK_DECOR_KEY).await
    }

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn save_lock_decor(&self, locked: bool) -> Result<(), StoreError> {
        self.write_json(LOCK_DECOR_KEY, &locked).await
    }

    pub async fn load_board(&self) -> BoardSettings {
        self.read_json(BOARD_SETTINGS_KEY).await
    }

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn save_board(&self, board: &BoardSettings) -> Result<(), StoreError> {
        self.write_json(BOARD_SETTINGS_KEY, board).await
    }

    /// Whether the guide note has already been shown. Read failures count as visited.
    pub async fn has_visited(&self) -> bool {
        match self.kv.get(HAS_VISITED_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "has-visited flag unreadable; skipping guide note");
                true
            }
        }
    }

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub async fn mark_visited(&self) -> Result<(), StoreError> {
        self.kv.set(HAS_VISITED_KEY, "true").await
    }

    async fn read_json<T>(&self, key: &str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "setting unreadable; using default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "malformed setting; using default");
                T::default()
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
