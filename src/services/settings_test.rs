#![allow(clippy::float_cmp)]

use super::*;
use crate::db::memory_pool;

fn memory_settings() -> (Settings, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    (Settings::new(kv.clone()), kv)
}

// =============================================================================
// camera
// =============================================================================

#[tokio::test]
async fn camera_defaults_when_missing() {
    let (settings, _) = memory_settings();
    assert_eq!(settings.load_camera().await, Camera::default());
}

#[tokio::test]
async fn camera_round_trips_in_stored_shape() {
    let (settings, kv) = memory_settings();
    settings.save_camera(Camera::new(12.5, -40.0, 1.5)).await.unwrap();

    let raw = kv.get(PAN_ZOOM_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["pan"]["x"], 12.5);
    assert_eq!(value["pan"]["y"], -40.0);
    assert_eq!(value["scale"], 1.5);

    assert_eq!(settings.load_camera().await, Camera::new(12.5, -40.0, 1.5));
}

#[tokio::test]
async fn camera_malformed_falls_back() {
    let (settings, kv) = memory_settings();
    kv.set(PAN_ZOOM_KEY, "{\"pan\":").await.unwrap();
    assert_eq!(settings.load_camera().await, Camera::default());
}

#[tokio::test]
async fn camera_out_of_range_scale_is_clamped() {
    let (settings, kv) = memory_settings();
    kv.set(PAN_ZOOM_KEY, r#"{"pan":{"x":1,"y":2},"scale":9}"#).await.unwrap();
    let camera = settings.load_camera().await;
    assert_eq!(camera.zoom, 2.0);
    assert_eq!((camera.pan_x, camera.pan_y), (1.0, 2.0));
}

#[tokio::test]
async fn camera_partial_object_fills_defaults() {
    let (settings, kv) = memory_settings();
    kv.set(PAN_ZOOM_KEY, r#"{"pan":{"x":5}}"#).await.unwrap();
    assert_eq!(settings.load_camera().await, Camera::new(5.0, 0.0, 1.0));
}

// =============================================================================
// flags and board settings
// =============================================================================

#[tokio::test]
async fn lock_decor_round_trip() {
    let (settings, _) = memory_settings();
    assert!(!settings.load_lock_decor().await);
    settings.save_lock_decor(true).await.unwrap();
    assert!(settings.load_lock_decor().await);
}

#[tokio::test]
async fn lock_decor_malformed_is_unlocked() {
    let (settings, kv) = memory_settings();
    kv.set(LOCK_DECOR_KEY, "yes please").await.unwrap();
    assert!(!settings.load_lock_decor().await);
}

#[tokio::test]
async fn board_settings_default_bg() {
    let (settings, kv) = memory_settings();
    assert_eq!(settings.load_board().await.bg_color, DEFAULT_BG_COLOR);

    settings.save_board(&BoardSettings { bg_color: "#000".into() }).await.unwrap();
    assert_eq!(kv.get(BOARD_SETTINGS_KEY).await.unwrap().as_deref(), Some(r##"{"bgColor":"#000"}"##));
    assert_eq!(settings.load_board().await.bg_color, "#000");
}

#[tokio::test]
async fn has_visited_flag() {
    let (settings, kv) = memory_settings();
    assert!(!settings.has_visited().await);
    settings.mark_visited().await.unwrap();
    assert!(settings.has_visited().await);
    assert_eq!(kv.get(HAS_VISITED_KEY).await.unwrap().as_deref(), Some("true"));
}

// =============================================================================
// sqlite
// =============================================================================

#[tokio::test]
async fn sqlite_kv_upserts() {
    let kv = SqliteKvStore::new(memory_pool().await);
    assert_eq!(kv.get("k").await.unwrap(), None);
    kv.set("k", "one").await.unwrap();
    kv.set("k", "two").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("two"));
}

#[tokio::test]
async fn sqlite_backed_settings() {
    let settings = Settings::new(Arc::new(SqliteKvStore::new(memory_pool().await)));
    settings.save_camera(Camera::new(-3.0, 4.0, 0.75)).await.unwrap();
    assert_eq!(settings.load_camera().await, Camera::new(-3.0, 4.0, 0.75));
}
