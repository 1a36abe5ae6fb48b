//! Request/response shapes for the RAGFlow completion API.

use serde::{Deserialize, Serialize};

/// Body of a completion request.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub question: &'a str,
    pub conversation_id: &'a str,
    pub stream: bool,
}

/// Response envelope: `code` is zero on success.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<CompletionData>,
}

/// Payload of a successful completion.
#[derive(Debug, Deserialize)]
pub struct CompletionData {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = CompletionRequest {
            question: "What is WAL mode?",
            conversation_id: "42",
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "What is WAL mode?");
        assert_eq!(json["conversation_id"], "42");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_success_response_parses() {
        let body = r#"{"code": 0, "data": {"answer": "WAL is write-ahead logging. [Citation: Document A, Page 1]"}}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 0);
        assert!(parsed.data.unwrap().answer.contains("[Citation:"));
    }

    #[test]
    fn test_error_response_parses_without_data() {
        let body = r#"{"code": 102, "message": "dataset not found"}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, 102);
        assert_eq!(parsed.message.as_deref(), Some("dataset not found"));
        assert!(parsed.data.is_none());
    }
}
