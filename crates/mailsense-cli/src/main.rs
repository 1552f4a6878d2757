//! CLI entry point for the Mailsense assistant.
//!
//! `mailsense serve` wires the Gmail toolbox, the LLM dispatcher, and the
//! web server together and runs until shut down.  `mailsense check` prints
//! the configuration status without starting anything.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mailsense_agent::{Dispatcher, LlmClient, ToolAdapter};
use mailsense_mail::{GmailClient, MailToolbox};
use mailsense_web::WebServer;

use crate::config::Config;

/// Mailsense — an AI assistant for Gmail.
#[derive(Parser)]
#[command(
    name = "mailsense",
    version,
    about = "Mailsense — AI assistant for Gmail",
    long_about = "A REST service that routes natural-language instructions to an LLM \
                  with Gmail operations as invocable tools."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (the default).
    Serve,

    /// Print the configuration status and exit.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve().await,
        Commands::Check => cmd_check(),
    }
}

async fn cmd_serve() -> Result<()> {
    init_tracing("info");

    info!("starting Mailsense");

    let config = Config::from_env().context("configuration error")?;

    let llm = LlmClient::new(config.llm).context("failed to create LLM client")?;
    info!(model = %llm.model(), "LLM client ready");

    if !config.gmail.is_configured() {
        warn!("Gmail credentials are not configured; mail operations will fail until they are set");
    }
    let gmail = GmailClient::new(config.gmail)?;
    let adapters: Vec<Arc<dyn ToolAdapter>> = vec![Arc::new(MailToolbox::new(gmail))];

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(llm), adapters));

    let server = WebServer::new(config.web, dispatcher);
    info!(addr = %server.addr(), "Mailsense assistant ready");

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

fn cmd_check() -> Result<()> {
    init_tracing("warn");

    let set = |name: &str| std::env::var(name).is_ok_and(|v| !v.trim().is_empty());

    println!();
    println!("  Mailsense Status");
    println!("  ================");
    println!();

    if set("LLM_API_KEY") {
        println!("  LLM API key:        CONFIGURED");
    } else {
        println!("  LLM API key:        NOT SET (required)");
    }

    let model =
        std::env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash (default)".to_owned());
    println!("  LLM model:          {model}");

    let gmail_ready =
        set("GMAIL_CLIENT_ID") && set("GMAIL_CLIENT_SECRET") && set("GMAIL_REFRESH_TOKEN");
    if gmail_ready {
        println!("  Gmail credentials:  CONFIGURED");
    } else {
        println!("  Gmail credentials:  NOT SET (mail operations will fail)");
    }

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8082".to_owned());
    println!("  Bind address:       {bind}:{port}");

    println!();
    Ok(())
}

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
