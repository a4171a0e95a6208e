//! Application configuration parsed from environment variables.
//!
//! Every value has a default; a variable that is missing or fails to parse
//! falls back to it. `.env` is loaded by `main` before this runs.

use canvas::consts::{CURSOR_RESET_MS, DEFAULT_MIN_NOTE_SIZE};
use canvas::engine::EngineConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://noteboard.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PERSIST_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Period of the full-collection flush.
    pub autosave_interval_secs: u64,
    /// Bound of the background writer queue.
    pub persist_queue_capacity: usize,
    pub min_note_size: f64,
    pub cursor_reset_ms: f64,
    /// Viewport assumed for headless placement and wheel anchoring.
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            persist_queue_capacity: DEFAULT_PERSIST_QUEUE_CAPACITY,
            min_note_size: DEFAULT_MIN_NOTE_SIZE,
            cursor_reset_ms: CURSOR_RESET_MS,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// - `DATABASE_URL`: default `sqlite://noteboard.db?mode=rwc`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `AUTOSAVE_INTERVAL_SECS`: default 300
    /// - `PERSIST_QUEUE_CAPACITY`: default 1024
    /// - `MIN_NOTE_SIZE`: default 60
    /// - `CURSOR_RESET_MS`: default 300
    /// - `VIEWPORT_WIDTH` / `VIEWPORT_HEIGHT`: default 800 / 600
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            autosave_interval_secs: env_parse("AUTOSAVE_INTERVAL_SECS", defaults.autosave_interval_secs).max(1),
            persist_queue_capacity: env_parse("PERSIST_QUEUE_CAPACITY", defaults.persist_queue_capacity).max(1),
            min_note_size: env_parse_positive("MIN_NOTE_SIZE", defaults.min_note_size),
            cursor_reset_ms: env_parse_positive("CURSOR_RESET_MS", defaults.cursor_reset_ms),
            viewport_width: env_parse_positive("VIEWPORT_WIDTH", defaults.viewport_width),
            viewport_height: env_parse_positive("VIEWPORT_HEIGHT", defaults.viewport_height),
        }
    }

    #[must_use]
    pub fn engine(&self) -> EngineConfig {
        EngineConfig { min_note_size: self.min_note_size, cursor_reset_ms: self.cursor_reset_ms }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`env_parse`], but rejects values that aren't finite and positive.
fn env_parse_positive(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if value.is_finite() && value > 0.0 { value } else { default }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
