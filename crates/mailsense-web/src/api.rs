//! REST route handlers.
//!
//! Only request-shape validation can produce a 400 here, and only an aborted
//! pipeline produces a 500; every mail or LLM failure deeper in the stack
//! has already been rendered into the assistant's text by then.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{AssistantResponse, ChatBody, SendBody};
use crate::state::AppState;

/// `POST /chat` — forward a natural-language instruction to the assistant.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> (StatusCode, Json<AssistantResponse>) {
    tracing::info!("chat request received");

    if !body.is_valid() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AssistantResponse::error(
                body.message,
                "Message must not be empty",
            )),
        );
    }

    run_dispatch(&state, body.message.clone(), body.message).await
}

/// `POST /send` — send an email.
///
/// The request is phrased as a natural-language instruction for the
/// dispatcher rather than calling the send tool directly, mirroring the
/// chat flow.
pub async fn send(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendBody>,
) -> (StatusCode, Json<AssistantResponse>) {
    tracing::info!(to = %body.to, "send request received");

    if !body.is_valid() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AssistantResponse::error(
                "Send email",
                "All fields are required",
            )),
        );
    }

    let instruction = format!(
        "Send an email to {} with subject '{}' and body '{}'",
        body.to, body.subject, body.body
    );
    run_dispatch(&state, instruction, "Send email".to_owned()).await
}

/// `GET /health` — plain-text liveness probe.
pub async fn health() -> &'static str {
    "Mailsense Assistant online"
}

/// Run the dispatcher on its own task so a panic anywhere in the agent
/// pipeline surfaces as a 500 envelope instead of tearing down the
/// connection.
async fn run_dispatch(
    state: &AppState,
    instruction: String,
    question: String,
) -> (StatusCode, Json<AssistantResponse>) {
    let dispatcher = Arc::clone(&state.dispatcher);
    let outcome =
        tokio::spawn(async move { dispatcher.process_message(&instruction).await }).await;

    match outcome {
        Ok(reply) => (
            StatusCode::OK,
            Json(AssistantResponse::success(question, reply)),
        ),
        Err(e) => {
            tracing::error!(error = %e, "agent pipeline aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AssistantResponse::error(
                    question,
                    format!("Error processing message: {e}"),
                )),
            )
        }
    }
}
