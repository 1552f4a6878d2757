//! Provider-agnostic LLM client.
//!
//! Supports the **OpenAI Chat Completions API** (including OpenAI-compatible
//! endpoints such as Gemini's `/v1beta/openai` surface) and the **Anthropic
//! Messages API**, non-streaming only.  Tool definitions and tool-call
//! parsing follow each provider's wire format.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::{AgentError, Result};
use crate::types::{ChatMessage, LlmReply, Role, ToolCall, ToolDefinition};

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Anthropic API base URL.
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Default maximum tokens per completion.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Identifies which LLM provider the client should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI Chat Completions API, or any compatible endpoint.
    OpenAiCompatible,
    /// Anthropic Messages API.
    Anthropic,
}

/// Configuration for connecting to a single LLM provider endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider this configuration targets.
    pub provider: LlmProvider,
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature, if any.
    pub temperature: Option<f32>,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Configuration for an OpenAI-compatible endpoint.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider: LlmProvider::OpenAiCompatible,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Configuration for the OpenAI API itself.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::openai_compatible(api_key, model, OPENAI_BASE_URL)
    }

    /// Configuration for the Anthropic Claude API.
    pub fn anthropic(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_owned(),
            model: model.into(),
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A non-streaming LLM client.
///
/// The API key is validated at construction so a misconfigured deployment
/// fails at startup rather than on the first chat request.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingApiKey`] if the key is empty.
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            let provider = match config.provider {
                LlmProvider::OpenAiCompatible => "openai",
                LlmProvider::Anthropic => "anthropic",
            };
            return Err(AgentError::MissingApiKey {
                provider: provider.into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one completion turn and return the model's reply.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply> {
        match self.config.provider {
            LlmProvider::OpenAiCompatible => self.complete_openai(messages, tools).await,
            LlmProvider::Anthropic => self.complete_anthropic(messages, tools).await,
        }
    }

    async fn complete_openai(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut body = json!({
            "model": self.config.model,
            "messages": messages_to_openai(messages),
            "max_tokens": self.config.max_tokens,
        });
        if let Some(temp) = self.config.temperature {
            body["temperature"] = json!(temp);
        }
        if !tools.is_empty() {
            body["tools"] = tools_to_openai(tools);
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|e| AgentError::RequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let v = self.post_json(&url, headers, &body, "openai").await?;
        parse_openai_reply(&v)
    }

    async fn complete_anthropic(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmReply> {
        let url = format!(
            "{}/v1/messages",
            self.config.base_url.trim_end_matches('/')
        );

        let (system, wire_messages) = messages_to_anthropic(messages);
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": wire_messages,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }
        if let Some(temp) = self.config.temperature {
            body["temperature"] = json!(temp);
        }
        if !tools.is_empty() {
            body["tools"] = tools_to_anthropic(tools);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| {
                AgentError::RequestFailed {
                    reason: format!("invalid API key header: {e}"),
                }
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let v = self.post_json(&url, headers, &body, "anthropic").await?;
        parse_anthropic_reply(&v)
    }

    /// POST a JSON body and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &Value,
        provider: &str,
    ) -> Result<Value> {
        tracing::debug!(url = %url, model = %self.config.model, provider, "sending LLM request");

        let response = self
            .http
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AgentError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(AgentError::RequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        serde_json::from_str(&text).map_err(|e| AgentError::ParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })
    }
}

// ===========================================================================
// OpenAI format conversion (free functions)
// ===========================================================================

/// Convert internal messages to the OpenAI Chat Completions wire format.
///
/// System messages are part of the `messages` array, tool calls live in
/// `assistant.tool_calls` with stringified arguments, and tool results use
/// `role: "tool"` with a `tool_call_id`.
pub fn messages_to_openai(messages: &[ChatMessage]) -> Value {
    let mut wire: Vec<Value> = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role {
            Role::System => wire.push(json!({
                "role": "system",
                "content": msg.content,
            })),
            Role::User => wire.push(json!({
                "role": "user",
                "content": msg.content,
            })),
            Role::Assistant => {
                if msg.tool_calls.is_empty() {
                    wire.push(json!({
                        "role": "assistant",
                        "content": msg.content,
                    }));
                } else {
                    let tool_calls: Vec<Value> = msg
                        .tool_calls
                        .iter()
                        .map(|tc| {
                            json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": tc.arguments.to_string(),
                                }
                            })
                        })
                        .collect();

                    let mut m = json!({
                        "role": "assistant",
                        "tool_calls": tool_calls,
                    });
                    if !msg.content.is_empty() {
                        m["content"] = json!(msg.content);
                    }
                    wire.push(m);
                }
            }
            Role::Tool => wire.push(json!({
                "role": "tool",
                "tool_call_id": msg.tool_call_id,
                "content": msg.content,
            })),
        }
    }

    json!(wire)
}

/// Convert tool definitions into the OpenAI format, which wraps each tool
/// in `{"type": "function", "function": {...}}`.
pub fn tools_to_openai(tools: &[ToolDefinition]) -> Value {
    let wire: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "type": "function",
                "function": {
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                }
            })
        })
        .collect();
    json!(wire)
}

/// Parse an OpenAI Chat Completions response into an [`LlmReply`].
pub fn parse_openai_reply(v: &Value) -> Result<LlmReply> {
    let message = &v["choices"][0]["message"];

    if message.is_null() {
        return Err(AgentError::ParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    if let Some(tool_calls) = message["tool_calls"].as_array()
        && !tool_calls.is_empty()
    {
        let calls: Result<Vec<ToolCall>> = tool_calls
            .iter()
            .map(|tc| {
                let func = &tc["function"];
                let name = func["name"].as_str().unwrap_or_default().to_owned();
                let args_str = func["arguments"].as_str().unwrap_or("{}");
                let arguments: Value =
                    serde_json::from_str(args_str).map_err(|e| AgentError::ParseFailed {
                        reason: format!("invalid JSON in tool call `{name}` arguments: {e}"),
                    })?;

                Ok(ToolCall {
                    id: tc["id"].as_str().unwrap_or_default().to_owned(),
                    name,
                    arguments,
                })
            })
            .collect();

        return Ok(LlmReply::ToolCalls(calls?));
    }

    let content = message["content"].as_str().unwrap_or_default();
    Ok(LlmReply::Text(content.to_owned()))
}

// ===========================================================================
// Anthropic format conversion (free functions)
// ===========================================================================

/// Split the system message out (Anthropic expects it as a top-level field)
/// and convert the remaining messages to the Anthropic wire format.
pub fn messages_to_anthropic(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
    let mut system: Option<String> = None;
    let mut wire: Vec<Value> = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role {
            Role::System => match &mut system {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(&msg.content);
                }
                None => system = Some(msg.content.clone()),
            },
            Role::User => wire.push(json!({
                "role": "user",
                "content": msg.content,
            })),
            Role::Assistant => {
                if msg.tool_calls.is_empty() {
                    wire.push(json!({
                        "role": "assistant",
                        "content": msg.content,
                    }));
                } else {
                    let mut content: Vec<Value> = Vec::new();
                    if !msg.content.is_empty() {
                        content.push(json!({
                            "type": "text",
                            "text": msg.content,
                        }));
                    }
                    for tc in &msg.tool_calls {
                        content.push(json!({
                            "type": "tool_use",
                            "id": tc.id,
                            "name": tc.name,
                            "input": tc.arguments,
                        }));
                    }
                    wire.push(json!({
                        "role": "assistant",
                        "content": content,
                    }));
                }
            }
            Role::Tool => wire.push(json!({
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": msg.tool_call_id,
                    "content": msg.content,
                }],
            })),
        }
    }

    (system, wire)
}

/// Convert tool definitions into the Anthropic API format.
pub fn tools_to_anthropic(tools: &[ToolDefinition]) -> Value {
    let wire: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "input_schema": t.parameters,
            })
        })
        .collect();
    json!(wire)
}

/// Parse an Anthropic Messages API response into an [`LlmReply`].
pub fn parse_anthropic_reply(v: &Value) -> Result<LlmReply> {
    let content = v["content"]
        .as_array()
        .ok_or_else(|| AgentError::ParseFailed {
            reason: "missing `content` array in response".into(),
        })?;

    let mut text_parts: Vec<String> = Vec::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for block in content {
        match block["type"].as_str() {
            Some("text") => {
                if let Some(t) = block["text"].as_str() {
                    text_parts.push(t.to_owned());
                }
            }
            Some("tool_use") => tool_calls.push(ToolCall {
                id: block["id"].as_str().unwrap_or_default().to_owned(),
                name: block["name"].as_str().unwrap_or_default().to_owned(),
                arguments: block["input"].clone(),
            }),
            _ => {}
        }
    }

    if tool_calls.is_empty() {
        Ok(LlmReply::Text(text_parts.join("")))
    } else {
        Ok(LlmReply::ToolCalls(tool_calls))
    }
}
