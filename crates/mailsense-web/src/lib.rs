//! HTTP boundary for Mailsense.
//!
//! A thin axum server with three routes: `POST /chat`, `POST /send`, and
//! `GET /health`.  Request-shape validation happens here; everything else is
//! delegated to the dispatcher, and results come back in the standard
//! assistant response envelope.

pub mod api;
pub mod dto;
pub mod server;
pub mod state;

pub use dto::AssistantResponse;
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 8082,
        }
    }
}
