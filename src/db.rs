use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.db.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db.max_connections)
        .acquire_timeout(config.db.acquire_timeout())
        .connect_with(options)
        .await?;

    tracing::debug!(path = %db_path.display(), "connected to product database");
    Ok(pool)
}

/// Open a database that must already exist.
///
/// Unlike [`connect`] this never creates the file or its parent
/// directories, so a mistyped `[db].path` fails instead of leaving an
/// empty database behind. The journal mode is left as `init` set it.
pub async fn connect_existing(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let db_path = &config.db.path;

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .busy_timeout(config.db.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db.max_connections)
        .acquire_timeout(config.db.acquire_timeout())
        .connect_with(options)
        .await?;

    tracing::debug!(path = %db_path.display(), "opened existing product database");
    Ok(pool)
}
