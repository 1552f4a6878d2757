//! The conversation dispatcher and its tool loop.
//!
//! [`Dispatcher::process_message`] is the single entry point: it sends the
//! user's instruction to the LLM together with the registered tool
//! definitions, executes whatever tool calls the model requests, feeds the
//! results back, and repeats until the model produces a final text answer.
//! Each call is stateless; no conversation memory persists between calls.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::LlmClient;
use crate::error::{AgentError, Result};
use crate::prompt;
use crate::types::{ChatMessage, LlmReply, ToolCall, ToolDefinition, ToolResult};

/// Upper bound on LLM round trips per request.
const DEFAULT_MAX_TURNS: u32 = 10;

/// Trait for components that can execute tool calls on behalf of the model.
///
/// The mail toolbox implements this so the dispatcher can invoke its
/// operations uniformly.
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// The unique identifier for this adapter.
    fn adapter_id(&self) -> &str;

    /// The tool definitions this adapter exposes to the LLM.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Execute a named tool with the given arguments.
    ///
    /// Returns the result as text suitable for feeding back to the LLM.
    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String>;
}

/// Seam between the dispatcher and the LLM client, so the tool loop can be
/// exercised against a scripted backend in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one completion turn.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply>;
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply> {
        LlmClient::complete(self, messages, tools).await
    }
}

/// Routes a free-text instruction through the LLM and the registered tools.
pub struct Dispatcher {
    llm: Arc<dyn CompletionBackend>,
    adapters: Vec<Arc<dyn ToolAdapter>>,
    system_prompt: String,
    max_turns: u32,
}

impl Dispatcher {
    /// Create a dispatcher with the default system prompt and turn cap.
    pub fn new(llm: Arc<dyn CompletionBackend>, adapters: Vec<Arc<dyn ToolAdapter>>) -> Self {
        Self {
            llm,
            adapters,
            system_prompt: prompt::SYSTEM_PROMPT.to_owned(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Override the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Override the turn cap.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Process one chat instruction and return the assistant's answer.
    ///
    /// Never fails: any error in the round trip is rendered into the
    /// returned text instead of being propagated.
    pub async fn process_message(&self, text: &str) -> String {
        let preview: String = text.chars().take(80).collect();
        tracing::info!(preview = %preview, "processing chat message");

        match self.run(text).await {
            Ok(reply) => {
                tracing::info!("response generated");
                reply
            }
            Err(e) => {
                tracing::error!(error = %e, "chat round trip failed");
                format!("Error processing request: {e}")
            }
        }
    }

    /// Run the tool loop until the model answers with text.
    async fn run(&self, text: &str) -> Result<String> {
        let tools = self.tool_definitions();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(text),
        ];

        for turn in 0..self.max_turns {
            let reply = self.llm.complete(&messages, &tools).await?;

            match reply {
                LlmReply::Text(answer) => {
                    tracing::debug!(turns = turn + 1, "tool loop finished");
                    return Ok(answer);
                }
                LlmReply::ToolCalls(calls) => {
                    tracing::info!(
                        turn,
                        count = calls.len(),
                        tools = ?calls.iter().map(|c| &c.name).collect::<Vec<_>>(),
                        "model requested tool calls"
                    );

                    messages.push(ChatMessage::assistant_tool_calls(calls.clone()));
                    for call in &calls {
                        let result = self.execute_call(call).await;
                        messages.push(ChatMessage::tool_result(
                            &result.tool_call_id,
                            &result.content,
                        ));
                    }
                }
            }
        }

        Err(AgentError::MaxTurnsExceeded {
            max_turns: self.max_turns,
        })
    }

    /// Execute a single tool call, turning failures into error-marked
    /// results the model can react to.
    async fn execute_call(&self, call: &ToolCall) -> ToolResult {
        let Some(adapter) = self.adapter_for(&call.name) else {
            tracing::warn!(tool = %call.name, "model requested an unregistered tool");
            return ToolResult {
                tool_call_id: call.id.clone(),
                content: format!("Error: unknown tool `{}`", call.name),
                is_error: true,
            };
        };

        tracing::debug!(tool = %call.name, id = %call.id, "executing tool");
        match adapter.execute(&call.name, call.arguments.clone()).await {
            Ok(content) => ToolResult {
                tool_call_id: call.id.clone(),
                content,
                is_error: false,
            },
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool execution failed");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    content: format!("Error: {e}"),
                    is_error: true,
                }
            }
        }
    }

    /// Collect tool definitions from all registered adapters.
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.adapters
            .iter()
            .flat_map(|a| a.tool_definitions())
            .collect()
    }

    /// Find the adapter that owns a given tool name.
    fn adapter_for(&self, tool_name: &str) -> Option<&Arc<dyn ToolAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.tool_definitions().iter().any(|td| td.name == tool_name))
    }
}
