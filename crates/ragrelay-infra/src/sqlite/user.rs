//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `ragrelay-core` using sqlx with the
//! split read/write pool. Registration relies on the UNIQUE constraint
//! on `username`: the duplicate case is detected from the constraint
//! violation of a single INSERT, not a prior lookup.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use ragrelay_core::identity::repository::UserRepository;
use ragrelay_types::error::RepositoryError;
use ragrelay_types::identity::{User, UserRole};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    roles: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            roles: row.try_get("roles")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = parse_uuid(&self.id)?;
        let roles: Vec<UserRole> = serde_json::from_str(&self.roles)
            .map_err(|e| RepositoryError::Query(format!("invalid roles JSON: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            roles,
            created_at,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    s.parse::<Uuid>()
        .map_err(|e| RepositoryError::Query(format!("invalid UUID: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

// ---------------------------------------------------------------------------
// UserRepository impl
// ---------------------------------------------------------------------------

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        let roles_json = serde_json::to_string(&user.roles)
            .map_err(|e| RepositoryError::Query(format!("serialize roles: {e}")))?;

        let result = sqlx::query(
            r#"INSERT INTO users (id, username, password_hash, roles, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&roles_json)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("username '{}' already exists", user.username)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            UserRow::from_row(&r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_user()
        })
        .transpose()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
