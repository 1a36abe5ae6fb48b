//! Chat endpoints: send a message, list conversations, read messages.
//!
//! The send contract echoes the conversation id back as a JSON number
//! (`conversationId`) but tolerates clients that send it as a numeric
//! string. The `citation` field of the response is the serialized
//! citation object, or `null` when the answer carried no marker.

use axum::extract::{Path, State};
use serde::{Deserialize, Deserializer, Serialize};

use ragrelay_types::chat::{Citation, Conversation, Message};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::json::Json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
    #[serde(
        rename = "conversationId",
        default,
        deserialize_with = "deserialize_conversation_id"
    )]
    pub conversation_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub response: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: i64,
    pub citation: Option<String>,
}

/// Accept the conversation id as a JSON number, a numeric string, or
/// null/absent.
fn deserialize_conversation_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(i64),
        Text(String),
    }

    match Option::<IdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdRepr::Number(id)) => Ok(Some(id)),
        Some(IdRepr::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<i64>().map(Some).map_err(|_| {
                serde::de::Error::custom(format!("conversationId is not numeric: '{s}'"))
            })
        }
    }
}

/// Formatter that writes a space after `:` and `,`, so the rendered
/// citation matches the upstream contract's fixed literal byte for byte.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render a citation as the wire string carried in the send response.
fn citation_wire_string(citation: &Citation) -> Result<String, AppError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    citation
        .serialize(&mut serializer)
        .map_err(|e| AppError::Internal(format!("citation serialization: {e}")))?;
    String::from_utf8(buf).map_err(|e| AppError::Internal(format!("citation serialization: {e}")))
}

/// POST /api/chat/send - Run one chat turn against the RAG provider.
pub async fn send(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SendRequest>,
) -> Result<axum::Json<SendResponse>, AppError> {
    let turn = state
        .chat_service
        .send(&user, &request.message, request.conversation_id)
        .await?;

    let citation = turn
        .citation
        .as_ref()
        .map(citation_wire_string)
        .transpose()?;

    Ok(axum::Json(SendResponse {
        response: turn.answer,
        conversation_id: turn.conversation_id,
        citation,
    }))
}

/// GET /api/chat/history - List the caller's conversations, newest first.
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<axum::Json<Vec<Conversation>>, AppError> {
    let conversations = state.chat_service.history(&user).await?;
    Ok(axum::Json(conversations))
}

/// GET /api/chat/{id}/messages - Ordered messages of one conversation.
///
/// Returns 404 for conversations that do not exist or belong to
/// another user; the two cases are indistinguishable to the caller.
pub async fn messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<i64>,
) -> Result<axum::Json<Vec<Message>>, AppError> {
    let messages = state.chat_service.messages(&user, conversation_id).await?;
    Ok(axum::Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_id_as_number() {
        let request: SendRequest =
            serde_json::from_str(r#"{"message": "hi", "conversationId": 42}"#).unwrap();
        assert_eq!(request.conversation_id, Some(42));
    }

    #[test]
    fn test_send_request_id_as_numeric_string() {
        let request: SendRequest =
            serde_json::from_str(r#"{"message": "hi", "conversationId": "42"}"#).unwrap();
        assert_eq!(request.conversation_id, Some(42));
    }

    #[test]
    fn test_send_request_id_absent_or_null() {
        let absent: SendRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(absent.conversation_id, None);

        let null: SendRequest =
            serde_json::from_str(r#"{"message": "hi", "conversationId": null}"#).unwrap();
        assert_eq!(null.conversation_id, None);

        let empty: SendRequest =
            serde_json::from_str(r#"{"message": "hi", "conversationId": ""}"#).unwrap();
        assert_eq!(empty.conversation_id, None);
    }

    #[test]
    fn test_send_request_rejects_non_numeric_string() {
        let result = serde_json::from_str::<SendRequest>(
            r#"{"message": "hi", "conversationId": "forty-two"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_citation_wire_string_matches_contract_literal() {
        let rendered = citation_wire_string(&Citation::placeholder()).unwrap();
        assert_eq!(
            rendered,
            r#"{"source": "Document A", "text": "Original text..."}"#
        );
    }

    #[test]
    fn test_send_response_shape() {
        let response = SendResponse {
            response: "answer".to_string(),
            conversation_id: 7,
            citation: Some(r#"{"source": "Document A", "text": "Original text..."}"#.to_string()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "answer");
        assert_eq!(json["conversationId"], 7);
        assert!(json["citation"].is_string());
    }

    #[test]
    fn test_send_response_citation_null_when_absent() {
        let response = SendResponse {
            response: "answer".to_string(),
            conversation_id: 7,
            citation: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["citation"].is_null());
    }
}
