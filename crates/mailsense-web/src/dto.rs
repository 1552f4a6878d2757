//! Request and response DTOs for the REST surface.

use serde::{Deserialize, Serialize};

/// Name reported in every response envelope.
pub const ASSISTANT_NAME: &str = "Mailsense";

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Free-text instruction in natural language.
    #[serde(default)]
    pub message: String,
}

impl ChatBody {
    /// A chat request is valid when the message is non-blank.
    pub fn is_valid(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Body of `POST /send`.
#[derive(Debug, Deserialize)]
pub struct SendBody {
    /// Recipient address.
    #[serde(default)]
    pub to: String,
    /// Email subject.
    #[serde(default)]
    pub subject: String,
    /// Plain-text email body.
    #[serde(default)]
    pub body: String,
}

impl SendBody {
    /// A send request is valid when all three fields are non-blank.
    pub fn is_valid(&self) -> bool {
        !self.to.trim().is_empty()
            && !self.subject.trim().is_empty()
            && !self.body.trim().is_empty()
    }
}

/// The response envelope every endpoint returns.
///
/// `data` and `error` are mutually exclusive: exactly one of them is set,
/// matching the `success` flag.
#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub success: bool,
    pub assistant: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub question: String,
    pub data: Option<String>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl AssistantResponse {
    /// Envelope for a successful call.
    pub fn success(question: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            success: true,
            assistant: ASSISTANT_NAME,
            kind: "chat",
            question: question.into(),
            data: Some(data.into()),
            error: None,
            timestamp: now(),
        }
    }

    /// Envelope for a failed call.
    pub fn error(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            assistant: ASSISTANT_NAME,
            kind: "error",
            question: question.into(),
            data: None,
            error: Some(error.into()),
            timestamp: now(),
        }
    }
}

/// Local time without offset, e.g. `2026-08-06T15:30:00`.
fn now() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_rejects_blank_messages() {
        let blank: ChatBody = serde_json::from_str(r#"{"message": "   "}"#).unwrap();
        assert!(!blank.is_valid());

        let missing: ChatBody = serde_json::from_str("{}").unwrap();
        assert!(!missing.is_valid());

        let ok: ChatBody = serde_json::from_str(r#"{"message": "list my emails"}"#).unwrap();
        assert!(ok.is_valid());
    }

    #[test]
    fn send_body_requires_all_three_fields() {
        let missing_subject: SendBody =
            serde_json::from_str(r#"{"to": "a@b.c", "subject": " ", "body": "hi"}"#).unwrap();
        assert!(!missing_subject.is_valid());

        let ok: SendBody =
            serde_json::from_str(r#"{"to": "a@b.c", "subject": "Hi", "body": "hello"}"#).unwrap();
        assert!(ok.is_valid());
    }

    #[test]
    fn envelope_sides_are_mutually_exclusive() {
        let ok = AssistantResponse::success("q", "answer");
        assert!(ok.success);
        assert_eq!(ok.kind, "chat");
        assert_eq!(ok.data.as_deref(), Some("answer"));
        assert!(ok.error.is_none());

        let err = AssistantResponse::error("q", "boom");
        assert!(!err.success);
        assert_eq!(err.kind, "error");
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("boom"));
    }

    #[test]
    fn envelope_serializes_type_field() {
        let v = serde_json::to_value(AssistantResponse::success("q", "a")).unwrap();
        assert_eq!(v["type"], "chat");
        assert_eq!(v["assistant"], "Mailsense");
        assert!(v["timestamp"].as_str().unwrap().contains('T'));
    }
}
