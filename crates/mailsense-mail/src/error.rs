//! Mail adapter error types.
//!
//! Provider failures are classified by HTTP status code into the four
//! user-facing categories (authentication, permission, not-found, generic
//! provider error); transport and input problems get their own variants.

/// Unified error type for the mail adapter.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The provider rejected the stored credentials (401, or the refresh
    /// token exchange itself failed).
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// The credentials lack the scope for the attempted operation (403).
    #[error("permission denied: {reason}")]
    Permission { reason: String },

    /// The referenced message does not exist (404).
    #[error("not found: {reason}")]
    NotFound { reason: String },

    /// Any other non-success answer from the provider.
    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The HTTP request never produced a provider answer.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// A provider response could not be decoded.
    #[error("malformed provider response: {reason}")]
    Malformed { reason: String },

    /// The parameters supplied to a tool are invalid.
    #[error("invalid parameters for `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },
}

/// Convenience alias used throughout the mail crate.
pub type Result<T> = std::result::Result<T, MailError>;

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            reason: err.to_string(),
        }
    }
}
