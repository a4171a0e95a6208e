//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to open the shared SQLx pool and bring the
//! schema up to date before any note or setting is read.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Open the SQLite connection pool and run migrations.
///
/// `sqlite::memory:` gives every connection its own database, so callers
/// using it should pass `max_connections = 1`.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    init_pool("sqlite::memory:", 1).await.expect("in-memory sqlite")
}
