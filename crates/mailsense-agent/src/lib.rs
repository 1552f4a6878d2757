//! Conversation dispatcher for Mailsense.
//!
//! This crate holds everything between the HTTP boundary and the mail
//! toolbox: a provider-agnostic LLM client with tool calling, the
//! [`ToolAdapter`] seam that the mail crate implements, and the
//! [`Dispatcher`] that runs the tool loop for a single stateless request.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmConfig, LlmProvider};
pub use dispatch::{CompletionBackend, Dispatcher, ToolAdapter};
pub use error::{AgentError, Result};
pub use types::{ChatMessage, LlmReply, Role, ToolCall, ToolDefinition, ToolResult};
