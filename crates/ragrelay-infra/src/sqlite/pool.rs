//! SQLite connection handling.
//!
//! One writer connection and a small pool of readers, both in WAL
//! journal mode. WAL lets reads proceed while a chat turn is being
//! persisted, and the single writer serializes inserts so concurrent
//! sends never contend on the write lock.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Read connections for concurrent SELECTs. A chat turn issues only a
/// handful of lookups, so a small pool is plenty.
const MAX_READERS: u32 = 4;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired reader/writer pools over one SQLite database file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database, apply pending migrations, and return the
    /// pool pair.
    ///
    /// The writer connects and migrates first; readers are opened
    /// read-only afterwards so they never observe a partially migrated
    /// schema. Foreign keys are enforced on every connection.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(MAX_READERS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Returns the data directory from `RAGRELAY_DATA_DIR`, falling back to
/// `~/.ragrelay`.
pub fn default_data_dir() -> std::path::PathBuf {
    std::env::var("RAGRELAY_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            std::path::PathBuf::from(home).join(".ragrelay")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("relay.db").display()
        );
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_schema() {
        let pool = open_pool().await;

        for table in ["users", "conversations", "messages"] {
            let found: Option<(String,)> = sqlx::query_as(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_optional(&pool.reader)
            .await
            .unwrap();
            assert!(found.is_some(), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_wal_and_foreign_keys_enabled() {
        let pool = open_pool().await;

        let journal: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(journal.0.to_lowercase(), "wal");

        let fk: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(fk.0, 1);
    }

    #[tokio::test]
    async fn test_reader_pool_rejects_writes() {
        let pool = open_pool().await;

        let result = sqlx::query(
            r#"INSERT INTO users (id, username, password_hash, created_at)
               VALUES ('u1', 'alice', 'hash', '2026-01-01T00:00:00Z')"#,
        )
        .execute(&pool.reader)
        .await;
        assert!(result.is_err(), "reader connections must be read-only");
    }

    #[test]
    fn test_default_data_dir_fallback() {
        if std::env::var("RAGRELAY_DATA_DIR").is_err() {
            assert!(default_data_dir().ends_with(".ragrelay"));
        }
    }
}
