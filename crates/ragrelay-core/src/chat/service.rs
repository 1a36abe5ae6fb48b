//! Chat orchestrator.
//!
//! `ChatService` drives one turn end to end: resolve or create the
//! conversation, persist the user message, call the RAG provider,
//! extract citation metadata from the raw answer, persist the assistant
//! message, and assemble the response.
//!
//! There is no transaction around the turn: a provider failure after
//! the user message is persisted leaves an orphaned user turn, which
//! callers must tolerate.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use ragrelay_types::chat::{
    ChatTurn, Citation, Conversation, Message, MessageRole, NewConversation, CITATION_MARKER,
};
use ragrelay_types::error::ChatError;
use ragrelay_types::identity::User;

use crate::chat::repository::ConversationRepository;
use crate::provider::RagProvider;

/// Maximum title length before truncation, in characters.
const TITLE_MAX_CHARS: usize = 20;

/// Derive a conversation title from the first user message.
///
/// The title is the text itself when it fits in [`TITLE_MAX_CHARS`]
/// characters, otherwise the first twenty characters with `...` appended.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.chars();
    let title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{title}...")
    } else {
        title
    }
}

/// Scan a raw provider answer for the citation marker.
///
/// The payload is a fixed placeholder, independent of what appears
/// inside the brackets. Matching is case-sensitive.
pub fn extract_citation(answer: &str) -> Option<Citation> {
    answer.contains(CITATION_MARKER).then(Citation::placeholder)
}

/// Orchestrates the conversation lifecycle and the per-turn flow.
///
/// Generic over `ConversationRepository` and `RagProvider` to maintain
/// clean architecture (ragrelay-core never depends on ragrelay-infra).
pub struct ChatService<C: ConversationRepository, P: RagProvider> {
    conversations: C,
    provider: P,
}

impl<C: ConversationRepository, P: RagProvider> ChatService<C, P> {
    /// Create a new chat service with the given repository and provider.
    pub fn new(conversations: C, provider: P) -> Self {
        Self {
            conversations,
            provider,
        }
    }

    /// Handle one chat turn for an authenticated user.
    ///
    /// With no `conversation_id`, a new conversation is created (its
    /// title derived from `text`). With an id that does not resolve, or
    /// that resolves to another user's conversation, fails with
    /// [`ChatError::ConversationNotFound`] before anything is persisted.
    pub async fn send(
        &self,
        user: &User,
        text: &str,
        conversation_id: Option<i64>,
    ) -> Result<ChatTurn, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let conversation = self.resolve_conversation(user, text, conversation_id).await?;

        let user_message = Message {
            id: Uuid::now_v7(),
            conversation_id: conversation.id,
            role: MessageRole::User,
            content: text.to_string(),
            citation: None,
            created_at: Utc::now(),
        };
        self.conversations.save_message(&user_message).await?;

        let answer = match self
            .provider
            .ask(text, &conversation.id.to_string())
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                // The user message stays; the turn is simply missing
                // its assistant half.
                warn!(
                    conversation_id = conversation.id,
                    provider = self.provider.name(),
                    error = %e,
                    "provider call failed"
                );
                return Err(e.into());
            }
        };

        let citation = extract_citation(&answer);

        let assistant_message = Message {
            id: Uuid::now_v7(),
            conversation_id: conversation.id,
            role: MessageRole::Assistant,
            content: answer.clone(),
            citation: citation.clone(),
            created_at: Utc::now(),
        };
        self.conversations.save_message(&assistant_message).await?;

        info!(
            conversation_id = conversation.id,
            cited = citation.is_some(),
            "chat turn completed"
        );

        Ok(ChatTurn {
            answer,
            conversation_id: conversation.id,
            citation,
        })
    }

    /// List the caller's conversations, most recent first.
    pub async fn history(&self, user: &User) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.conversations.list_conversations(&user.id).await?)
    }

    /// Get the ordered messages of one of the caller's conversations.
    ///
    /// A conversation that does not exist, or that belongs to another
    /// user, fails with [`ChatError::ConversationNotFound`].
    pub async fn messages(
        &self,
        user: &User,
        conversation_id: i64,
    ) -> Result<Vec<Message>, ChatError> {
        let conversation = self
            .conversations
            .get_conversation(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        if conversation.user_id != user.id {
            return Err(ChatError::ConversationNotFound);
        }

        Ok(self.conversations.get_messages(conversation_id).await?)
    }

    async fn resolve_conversation(
        &self,
        user: &User,
        text: &str,
        conversation_id: Option<i64>,
    ) -> Result<Conversation, ChatError> {
        match conversation_id {
            Some(id) => {
                let conversation = self
                    .conversations
                    .get_conversation(id)
                    .await?
                    .ok_or(ChatError::ConversationNotFound)?;
                if conversation.user_id != user.id {
                    return Err(ChatError::ConversationNotFound);
                }
                Ok(conversation)
            }
            None => {
                let conversation = self
                    .conversations
                    .create_conversation(&NewConversation {
                        user_id: user.id,
                        title: derive_title(text),
                        created_at: Utc::now(),
                    })
                    .await?;
                info!(conversation_id = conversation.id, "conversation created");
                Ok(conversation)
            }
        }
    }
}
