//! Gmail client adapter for Mailsense.
//!
//! This crate wraps the Gmail REST API behind a typed client and exposes the
//! mail operations as LLM-invocable tools:
//!
//! - [`auth`] — refresh-token credential exchange with a cached access token.
//! - [`api`] — serde types mirroring the Gmail wire format.
//! - [`client`] — the HTTP client with structured error classification.
//! - [`message`] — the domain model and header/body normalization.
//! - [`toolbox`] — the nine tools the dispatcher hands to the LLM.
//! - [`render`] — presentation of structured results as assistant-facing text.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod message;
pub mod mime;
pub mod render;
pub mod toolbox;

pub use auth::GmailCredentials;
pub use client::GmailClient;
pub use error::{MailError, Result};
pub use message::{MailMessage, Sender};
pub use toolbox::MailToolbox;
