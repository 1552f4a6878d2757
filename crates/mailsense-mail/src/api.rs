//! Serde types mirroring the Gmail REST API wire format.

use serde::{Deserialize, Serialize};

/// Answer to `GET /users/me/messages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    /// Matching message references; absent when nothing matched.
    pub messages: Option<Vec<MessageRef>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub result_size_estimate: Option<u32>,
}

/// Reference to a message (id and thread id only).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// Full message resource (`format=full`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub label_ids: Option<Vec<String>>,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub internal_date: Option<String>,
    pub payload: Option<MessagePayload>,
}

impl GmailMessage {
    /// Whether a given label id is attached to this message.
    pub fn has_label(&self, label: &str) -> bool {
        self.label_ids
            .as_ref()
            .is_some_and(|labels| labels.iter().any(|l| l == label))
    }
}

/// Message payload carrying headers, body, and MIME parts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<MessageBody>,
    pub parts: Option<Vec<MessagePart>>,
}

/// A single RFC 822 header.
#[derive(Debug, Deserialize, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Body of a payload or part; `data` is base64url-encoded.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub size: Option<u32>,
    pub data: Option<String>,
}

/// One MIME part of a multipart message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub part_id: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<MessageBody>,
    pub parts: Option<Vec<MessagePart>>,
}

/// Body of `POST /users/me/messages/send`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    /// Base64url-encoded RFC 2822 message.
    pub raw: String,
}

/// Answer to the send endpoint (the created message resource).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// Body of `POST /users/me/messages/{id}/modify`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMessageRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_label_ids: Vec<String>,
}

impl ModifyMessageRequest {
    /// Request that attaches one label.
    pub fn add(label: &str) -> Self {
        Self {
            add_label_ids: vec![label.to_owned()],
            remove_label_ids: Vec::new(),
        }
    }

    /// Request that detaches one label.
    pub fn remove(label: &str) -> Self {
        Self {
            add_label_ids: Vec::new(),
            remove_label_ids: vec![label.to_owned()],
        }
    }
}
