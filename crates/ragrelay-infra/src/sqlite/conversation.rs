//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `ragrelay-core` using sqlx
//! with split read/write pools: raw queries, private Row structs,
//! reader for SELECTs, writer for INSERTs.
//!
//! Conversation ids are storage-assigned (AUTOINCREMENT) and exposed as
//! the numeric conversation identifier in the HTTP contract. Message
//! order is creation order: `created_at` with the time-sortable message
//! id as tiebreaker.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use ragrelay_core::chat::repository::ConversationRepository;
use ragrelay_types::chat::{Citation, Conversation, Message, MessageRole, NewConversation};
use ragrelay_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: i64,
    user_id: String,
    title: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            user_id: parse_uuid(&self.user_id)?,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: i64,
    role: String,
    content: String,
    citation: Option<String>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            citation: row.try_get("citation")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        let citation: Option<Citation> = self
            .citation
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid citation JSON: {e}")))?;

        Ok(Message {
            id: parse_uuid(&self.id)?,
            conversation_id: self.conversation_id,
            role,
            content: self.content,
            citation,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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
// ConversationRepository impl
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO conversations (user_id, title, created_at) VALUES (?, ?, ?)",
        )
        .bind(conversation.user_id.to_string())
        .bind(&conversation.title)
        .bind(conversation.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_id: conversation.user_id,
            title: conversation.title.clone(),
            created_at: conversation.created_at,
        })
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            ConversationRow::from_row(&r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_conversation()
        })
        .transpose()
    }

    async fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(r.into_conversation()?);
        }
        Ok(conversations)
    }

    async fn save_message(&self, message: &Message) -> Result<(), RepositoryError> {
        let citation_json = message
            .citation
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("serialize citation: {e}")))?;

        sqlx::query(
            r#"INSERT INTO messages (id, conversation_id, role, content, citation, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(&citation_json)
        .bind(message.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use ragrelay_core::identity::repository::UserRepository;
    use ragrelay_types::identity::{User, UserRole};

    use crate::sqlite::user::SqliteUserRepository;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    /// Insert a user row to satisfy the conversations FK.
    async fn seed_user(pool: &DatabasePool) -> Uuid {
        let user = User {
            id: Uuid::now_v7(),
            username: format!("user-{}", Uuid::now_v7().simple()),
            password_hash: "hash".to_string(),
            roles: vec![UserRole::User],
            created_at: Utc::now(),
        };
        SqliteUserRepository::new(pool.clone())
            .create_user(&user)
            .await
            .unwrap();
        user.id
    }

    fn make_message(conversation_id: i64, role: MessageRole, content: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            content: content.to_string(),
            citation: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_conversation_assigns_id() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteConversationRepository::new(pool);

        let created = repo
            .create_conversation(&NewConversation {
                user_id,
                title: "Hello".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        assert!(created.id >= 1);

        let fetched = repo.get_conversation(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hello");
        assert_eq!(fetched.user_id, user_id);
    }

    #[tokio::test]
    async fn test_get_unknown_conversation() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        assert!(repo.get_conversation(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_conversations_scoped_to_user() {
        let pool = test_pool().await;
        let alice = seed_user(&pool).await;
        let bob = seed_user(&pool).await;
        let repo = SqliteConversationRepository::new(pool);

        for title in ["one", "two"] {
            repo.create_conversation(&NewConversation {
                user_id: alice,
                title: title.to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }
        repo.create_conversation(&NewConversation {
            user_id: bob,
            title: "other".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let alices = repo.list_conversations(&alice).await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|c| c.user_id == alice));

        let bobs = repo.list_conversations(&bob).await.unwrap();
        assert_eq!(bobs.len(), 1);
    }

    #[tokio::test]
    async fn test_messages_returned_in_creation_order() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteConversationRepository::new(pool);

        let conversation = repo
            .create_conversation(&NewConversation {
                user_id,
                title: "ordering".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        for i in 0..3 {
            repo.save_message(&make_message(
                conversation.id,
                MessageRole::User,
                &format!("q{i}"),
            ))
            .await
            .unwrap();
            repo.save_message(&make_message(
                conversation.id,
                MessageRole::Assistant,
                &format!("a{i}"),
            ))
            .await
            .unwrap();
        }

        let messages = repo.get_messages(conversation.id).await.unwrap();
        assert_eq!(messages.len(), 6);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q0", "a0", "q1", "a1", "q2", "a2"]);
    }

    #[tokio::test]
    async fn test_citation_persists_and_roundtrips() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteConversationRepository::new(pool);

        let conversation = repo
            .create_conversation(&NewConversation {
                user_id,
                title: "cited".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut message = make_message(conversation.id, MessageRole::Assistant, "answer");
        message.citation = Some(Citation::placeholder());
        repo.save_message(&message).await.unwrap();

        let messages = repo.get_messages(conversation.id).await.unwrap();
        assert_eq!(messages[0].citation, Some(Citation::placeholder()));
    }

    #[tokio::test]
    async fn test_deleting_conversation_cascades_to_messages() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteConversationRepository::new(pool.clone());

        let conversation = repo
            .create_conversation(&NewConversation {
                user_id,
                title: "doomed".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        repo.save_message(&make_message(conversation.id, MessageRole::User, "hi"))
            .await
            .unwrap();

        // Administrative deletion path; exercised here only to verify
        // the ownership model's cascade.
        sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation.id)
            .execute(&pool.writer)
            .await
            .unwrap();

        assert!(repo.get_messages(conversation.id).await.unwrap().is_empty());
    }
}
