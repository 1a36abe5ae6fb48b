//! Conversation and message types.
//!
//! A conversation is a titled, append-only thread of messages owned by
//! one user. Messages are never edited or removed once persisted; their
//! order is defined by creation time (message ids are time-sortable
//! UUID v7 values, used as a tiebreaker).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Literal marker the provider embeds in answers that cite a source.
///
/// Matching is case-sensitive and substring-based.
pub const CITATION_MARKER: &str = "[Citation:";

/// Role of a message within a conversation.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A conversation between a user and the RAG provider.
///
/// The id is assigned by the storage layer on creation and doubles as
/// the numeric `conversationId` in the HTTP contract. The title is
/// derived from the first user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A conversation waiting to be persisted (no id yet).
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A single message within a conversation.
///
/// Messages belong to exactly one conversation for their lifetime.
/// `created_at` is assigned at persistence time and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: i64,
    pub role: MessageRole,
    pub content: String,
    /// Present only on assistant messages that carry a citation marker.
    pub citation: Option<Citation>,
    pub created_at: DateTime<Utc>,
}

/// Structured citation metadata attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub text: String,
}

impl Citation {
    /// The fixed placeholder payload attached whenever an answer
    /// contains [`CITATION_MARKER`]. The marker's bracket contents are
    /// deliberately not parsed.
    pub fn placeholder() -> Self {
        Self {
            source: "Document A".to_string(),
            text: "Original text...".to_string(),
        }
    }
}

/// Result of one orchestrated chat turn: the assistant's raw answer,
/// the resolved conversation id, and the citation payload (if any).
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub answer: String,
    pub conversation_id: i64,
    pub citation: Option<Citation>,
}
