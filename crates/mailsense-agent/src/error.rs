//! Dispatcher error types.
//!
//! All agent subsystems surface errors through [`AgentError`].  Note that
//! errors never cross the dispatcher boundary as structured faults: the
//! [`crate::Dispatcher`] renders them into plain text before returning.

/// Unified error type for the conversation dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An HTTP request to the LLM provider failed.
    #[error("llm request failed: {reason}")]
    RequestFailed { reason: String },

    /// The LLM response could not be parsed into the expected format.
    #[error("llm response parse error: {reason}")]
    ParseFailed { reason: String },

    /// The API key is missing for a provider that requires one.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    /// The tool loop exceeded the maximum number of allowed turns.
    #[error("tool loop exceeded max turns ({max_turns})")]
    MaxTurnsExceeded { max_turns: u32 },

    /// The LLM requested a tool that no registered adapter exposes.
    #[error("unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    /// A tool invocation failed inside an adapter.
    #[error("tool execution failed for `{tool_name}`: {reason}")]
    ToolFailed { tool_name: String, reason: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}
