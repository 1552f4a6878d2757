//! Shared application state for the web server.

use std::sync::Arc;

use mailsense_agent::Dispatcher;

/// State accessible from every axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The conversation dispatcher shared across all requests.
    pub dispatcher: Arc<Dispatcher>,
}
