//! Gmail REST API client.
//!
//! Thin typed wrapper over the `gmail/v1` endpoints the toolbox needs.
//! Every response status is classified into the [`MailError`] taxonomy here,
//! so callers never inspect status codes or error strings themselves.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::{
    GmailMessage, ListMessagesResponse, ModifyMessageRequest, SendMessageRequest, SentMessage,
};
use crate::auth::{GmailCredentials, TokenProvider};
use crate::error::{MailError, Result};

/// Gmail API base URL.
const BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Hard cap the API enforces on `maxResults`.
const MAX_RESULTS_CAP: usize = 500;

/// Request timeout for mail calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The "unread" label id.
pub const LABEL_UNREAD: &str = "UNREAD";

/// The "important" label id.
pub const LABEL_IMPORTANT: &str = "IMPORTANT";

/// The "starred" label id.
pub const LABEL_STARRED: &str = "STARRED";

/// Typed client for the Gmail REST API.
pub struct GmailClient {
    tokens: TokenProvider,
    http: reqwest::Client,
}

impl GmailClient {
    /// Create a client for the given credentials.
    ///
    /// Construction never touches the network; the first token exchange
    /// happens on the first operation.
    pub fn new(credentials: GmailCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("Mailsense/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MailError::Transport {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            tokens: TokenProvider::new(credentials, http.clone()),
            http,
        })
    }

    /// Whether credentials were supplied at construction.
    pub fn is_configured(&self) -> bool {
        self.tokens.credentials().is_configured()
    }

    /// List message references matching a Gmail query.
    pub async fn list_messages(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<ListMessagesResponse> {
        let url = format!(
            "{BASE_URL}/users/me/messages?maxResults={}&q={}",
            max_results.min(MAX_RESULTS_CAP),
            urlencoding::encode(query),
        );
        tracing::debug!(query, max_results, "listing messages");
        self.get_json(&url).await
    }

    /// Fetch one message with full payload.
    pub async fn get_message(&self, id: &str) -> Result<GmailMessage> {
        let url = format!("{BASE_URL}/users/me/messages/{id}?format=full");
        tracing::debug!(id, "fetching message");
        self.get_json(&url).await
    }

    /// Submit a base64url-encoded RFC 2822 message for delivery.
    pub async fn send_message(&self, raw: String) -> Result<SentMessage> {
        let url = format!("{BASE_URL}/users/me/messages/send");
        tracing::debug!("sending message");

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&SendMessageRequest { raw })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Add and/or remove labels on a message.
    pub async fn modify_labels(&self, id: &str, request: &ModifyMessageRequest) -> Result<()> {
        let url = format!("{BASE_URL}/users/me/messages/{id}/modify");
        tracing::debug!(id, "modifying labels");

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(request)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Permanently delete a message.
    pub async fn delete_message(&self, id: &str) -> Result<()> {
        let url = format!("{BASE_URL}/users/me/messages/{id}");
        tracing::debug!(id, "deleting message");

        let token = self.tokens.access_token().await?;
        let response = self.http.delete(&url).bearer_auth(&token).send().await?;
        Self::check(response).await
    }

    /// Move a message to the trash.
    pub async fn trash_message(&self, id: &str) -> Result<()> {
        let url = format!("{BASE_URL}/users/me/messages/{id}/trash");
        tracing::debug!(id, "trashing message");

        let token = self.tokens.access_token().await?;
        let response = self.http.post(&url).bearer_auth(&token).send().await?;
        Self::check(response).await
    }

    /// GET a URL and decode the JSON answer.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.tokens.access_token().await?;
        let response = self.http.get(url).bearer_auth(&token).send().await?;
        Self::decode(response).await
    }

    /// Verify a response succeeded and decode its JSON body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let body = Self::check_body(response).await?;
        serde_json::from_str(&body).map_err(|e| MailError::Malformed {
            reason: format!("invalid JSON from provider: {e}"),
        })
    }

    /// Verify a response succeeded, discarding the body.
    async fn check(response: reqwest::Response) -> Result<()> {
        Self::check_body(response).await.map(|_| ())
    }

    /// Classify a non-success status into the error taxonomy, otherwise
    /// return the body text.
    async fn check_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(|e| MailError::Transport {
            reason: format!("failed to read response body: {e}"),
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_status(status, &body))
        }
    }
}

/// Map a non-success status to the taxonomy, pulling the provider's own
/// message out of the standard `{"error": {"message": ...}}` envelope.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> MailError {
    let message = provider_message(body);
    match status {
        StatusCode::UNAUTHORIZED => MailError::Auth { reason: message },
        StatusCode::FORBIDDEN => MailError::Permission { reason: message },
        StatusCode::NOT_FOUND => MailError::NotFound { reason: message },
        other => MailError::Provider {
            status: other.as_u16(),
            message,
        },
    }
}

/// Extract `error.message` from a Gmail error body, falling back to the
/// raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_the_taxonomy() {
        let body = r#"{"error": {"code": 401, "message": "Invalid Credentials"}}"#;
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, body),
            MailError::Auth { reason } if reason == "Invalid Credentials"
        ));

        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "{}"),
            MailError::Permission { .. }
        ));

        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "gone"),
            MailError::NotFound { reason } if reason == "gone"
        ));
    }

    #[test]
    fn unrecognized_status_falls_through_to_provider_error() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        match err {
            MailError::Provider { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn provider_message_prefers_the_error_envelope() {
        let body = r#"{"error": {"message": "Requested entity was not found."}}"#;
        assert_eq!(provider_message(body), "Requested entity was not found.");
        assert_eq!(provider_message("plain text"), "plain text");
    }
}
