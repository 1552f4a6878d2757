//! The nine mail tools exposed to the LLM.
//!
//! [`MailToolbox`] implements the dispatcher's [`ToolAdapter`] seam.  Every
//! tool validates its parameters, runs the typed operation, and renders the
//! outcome as text — including every error category.  Tools never surface a
//! structured fault to the dispatcher; the only hard error is a tool name no
//! definition covers.

use async_trait::async_trait;
use serde_json::{Value, json};

use mailsense_agent::{AgentError, ToolAdapter, ToolDefinition};

use crate::api::{ModifyMessageRequest, SentMessage};
use crate::client::{GmailClient, LABEL_UNREAD};
use crate::error::{MailError, Result};
use crate::message::MailMessage;
use crate::{mime, render};

/// Listing size when the model omits the count or sends a non-positive one.
const DEFAULT_LIST_COUNT: usize = 10;

/// Gmail operations packaged as LLM tools.
pub struct MailToolbox {
    client: GmailClient,
}

impl MailToolbox {
    /// Wrap a Gmail client.
    pub fn new(client: GmailClient) -> Self {
        Self { client }
    }

    /// Whether the underlying client has credentials.
    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    // -----------------------------------------------------------------------
    // Typed operations
    // -----------------------------------------------------------------------

    /// List messages matching `query`, fetching full detail for each.
    async fn fetch_listing(&self, query: &str, limit: usize) -> Result<Vec<MailMessage>> {
        let listing = self.client.list_messages(query, limit).await?;
        let refs = listing.messages.unwrap_or_default();

        let mut messages = Vec::with_capacity(refs.len());
        for r in &refs {
            let full = self.client.get_message(&r.id).await?;
            messages.push(MailMessage::from(&full));
        }
        Ok(messages)
    }

    /// Fetch one message with full detail.
    async fn fetch_message(&self, id: &str) -> Result<MailMessage> {
        let full = self.client.get_message(id).await?;
        Ok(MailMessage::from(&full))
    }

    /// Build, encode, and submit a plain-text message.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<SentMessage> {
        let raw = mime::encode_raw(&mime::build_text_message(to, subject, body));
        self.client.send_message(raw).await
    }

    // -----------------------------------------------------------------------
    // Tool runners (always produce text)
    // -----------------------------------------------------------------------

    async fn run_list_emails(&self, args: &Value) -> String {
        let limit = effective_limit(args.get("max_results").and_then(Value::as_i64));
        tracing::info!(limit, "listing inbox emails");

        match self.fetch_listing("in:inbox", limit).await {
            Ok(messages) => render::inbox_listing(&messages),
            Err(e) => fail("list_emails", &e),
        }
    }

    async fn run_list_unread(&self, args: &Value) -> String {
        let limit = effective_limit(args.get("max_results").and_then(Value::as_i64));
        tracing::info!(limit, "listing unread emails");

        match self.fetch_listing("is:unread in:inbox", limit).await {
            Ok(messages) => render::unread_listing(&messages),
            Err(e) => fail("list_unread_emails", &e),
        }
    }

    async fn run_search(&self, args: &Value) -> String {
        let query = match require_str(args, "query", "search_emails") {
            Ok(q) => q,
            Err(e) => return fail("search_emails", &e),
        };
        let limit = effective_limit(args.get("max_results").and_then(Value::as_i64));
        tracing::info!(query = %query, limit, "searching emails");

        match self.fetch_listing(&query, limit).await {
            Ok(messages) => render::search_listing(&query, &messages),
            Err(e) => fail("search_emails", &e),
        }
    }

    async fn run_get_content(&self, args: &Value) -> String {
        let id = match require_str(args, "email_id", "get_email_content") {
            Ok(id) => id,
            Err(e) => return fail("get_email_content", &e),
        };
        tracing::info!(id = %id, "reading email");

        match self.fetch_message(&id).await {
            Ok(message) => render::email_detail(&message),
            Err(e) => fail("get_email_content", &e),
        }
    }

    async fn run_send(&self, args: &Value) -> String {
        let to = match require_str(args, "to", "send_email") {
            Ok(v) => v,
            Err(e) => return fail("send_email", &e),
        };
        let subject = match require_str(args, "subject", "send_email") {
            Ok(v) => v,
            Err(e) => return fail("send_email", &e),
        };
        let body = match require_str(args, "body", "send_email") {
            Ok(v) => v,
            Err(e) => return fail("send_email", &e),
        };
        tracing::info!(to = %to, "sending email");

        match self.send(&to, &subject, &body).await {
            Ok(sent) => {
                tracing::info!(id = %sent.id, "email sent");
                render::send_receipt(&sent.id, &to, &subject, &body)
            }
            Err(e) => fail("send_email", &e),
        }
    }

    async fn run_mark_read(&self, args: &Value) -> String {
        let id = match require_str(args, "email_id", "mark_as_read") {
            Ok(id) => id,
            Err(e) => return fail("mark_as_read", &e),
        };
        tracing::info!(id = %id, "marking as read");

        match self
            .client
            .modify_labels(&id, &ModifyMessageRequest::remove(LABEL_UNREAD))
            .await
        {
            Ok(()) => render::marked_read(&id),
            Err(e) => fail("mark_as_read", &e),
        }
    }

    async fn run_mark_unread(&self, args: &Value) -> String {
        let id = match require_str(args, "email_id", "mark_as_unread") {
            Ok(id) => id,
            Err(e) => return fail("mark_as_unread", &e),
        };
        tracing::info!(id = %id, "marking as unread");

        match self
            .client
            .modify_labels(&id, &ModifyMessageRequest::add(LABEL_UNREAD))
            .await
        {
            Ok(()) => render::marked_unread(&id),
            Err(e) => fail("mark_as_unread", &e),
        }
    }

    async fn run_delete(&self, args: &Value) -> String {
        let id = match require_str(args, "email_id", "delete_email") {
            Ok(id) => id,
            Err(e) => return fail("delete_email", &e),
        };
        tracing::info!(id = %id, "deleting email");

        match self.client.delete_message(&id).await {
            Ok(()) => render::deleted(&id),
            Err(e) => fail("delete_email", &e),
        }
    }

    async fn run_trash(&self, args: &Value) -> String {
        let id = match require_str(args, "email_id", "trash_email") {
            Ok(id) => id,
            Err(e) => return fail("trash_email", &e),
        };
        tracing::info!(id = %id, "trashing email");

        match self.client.trash_message(&id).await {
            Ok(()) => render::trashed(&id),
            Err(e) => fail("trash_email", &e),
        }
    }
}

#[async_trait]
impl ToolAdapter for MailToolbox {
    fn adapter_id(&self) -> &str {
        "gmail"
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    async fn execute(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> mailsense_agent::Result<String> {
        let text = match tool_name {
            "list_emails" => self.run_list_emails(&arguments).await,
            "list_unread_emails" => self.run_list_unread(&arguments).await,
            "search_emails" => self.run_search(&arguments).await,
            "get_email_content" => self.run_get_content(&arguments).await,
            "send_email" => self.run_send(&arguments).await,
            "mark_as_read" => self.run_mark_read(&arguments).await,
            "mark_as_unread" => self.run_mark_unread(&arguments).await,
            "delete_email" => self.run_delete(&arguments).await,
            "trash_email" => self.run_trash(&arguments).await,
            other => {
                return Err(AgentError::UnknownTool {
                    tool_name: other.to_owned(),
                });
            }
        };
        Ok(text)
    }
}

/// Log a failed operation and render its category text.
fn fail(tool: &str, err: &MailError) -> String {
    tracing::warn!(tool, error = %err, "mail operation failed");
    render::error_text(err)
}

/// Treat absent or non-positive counts as the default.
fn effective_limit(raw: Option<i64>) -> usize {
    match raw {
        Some(n) if n > 0 => n as usize,
        _ => DEFAULT_LIST_COUNT,
    }
}

/// Extract a required, non-blank string parameter.
fn require_str(args: &Value, key: &str, tool: &str) -> Result<String> {
    match args.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        _ => Err(MailError::InvalidParams {
            tool_name: tool.to_owned(),
            reason: format!("missing required string field `{key}`"),
        }),
    }
}

/// The parameter schema for tools that only take a message id.
fn id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "email_id": {
                "type": "string",
                "description": "The ID of the email, as returned by a listing tool"
            }
        },
        "required": ["email_id"]
    })
}

/// The nine tool definitions handed to the LLM.
fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_emails".into(),
            description: "List the most recent emails in the inbox".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of emails to list (default 10)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "list_unread_emails".into(),
            description: "List unread emails in the inbox".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of emails to list (default 10)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "search_emails".into(),
            description: "Search emails by keyword in the subject or body".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Gmail search query, e.g. a keyword or from:someone"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of matches to list (default 10)"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "get_email_content".into(),
            description: "Get the full content of a specific email by its ID".into(),
            parameters: id_schema(),
        },
        ToolDefinition {
            name: "send_email".into(),
            description: "Send a new email".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "to": {"type": "string", "description": "Recipient address"},
                    "subject": {"type": "string", "description": "Email subject"},
                    "body": {"type": "string", "description": "Plain-text email body"}
                },
                "required": ["to", "subject", "body"]
            }),
        },
        ToolDefinition {
            name: "mark_as_read".into(),
            description: "Mark an email as read".into(),
            parameters: id_schema(),
        },
        ToolDefinition {
            name: "mark_as_unread".into(),
            description: "Mark an email as unread".into(),
            parameters: id_schema(),
        },
        ToolDefinition {
            name: "delete_email".into(),
            description: "Delete an email permanently (irreversible)".into(),
            parameters: id_schema(),
        },
        ToolDefinition {
            name: "trash_email".into(),
            description: "Move an email to the trash (reversible)".into(),
            parameters: id_schema(),
        },
    ]
}
