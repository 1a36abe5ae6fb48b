//! ConversationRepository trait definition.
//!
//! Persistence operations for conversations and their ordered messages.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition);
//! implementations live in ragrelay-infra (e.g., `SqliteConversationRepository`).

use ragrelay_types::chat::{Conversation, Message, NewConversation};
use ragrelay_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
pub trait ConversationRepository: Send + Sync {
    /// Persist a new conversation and return it with its assigned id.
    fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, most recent first.
    fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Append a message to its conversation. Messages are never updated
    /// or removed afterwards.
    fn save_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get the messages of a conversation in creation order.
    fn get_messages(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
