//! Newsdesk application binary - composition root.
//!
//! Ties the Newsdesk crates into a terminal assistant:
//! 1. Load configuration from TOML, then apply env and CLI overrides
//! 2. Build the news and knowledge source clients
//! 3. Open an assistant session
//! 4. Render session events as they arrive
//! 5. Read commands and messages from stdin until EOF or `/quit`

mod cli;
mod command;
mod render;

use std::sync::Arc;

use clap::Parser;
use newsdesk_assistant::{AssistantOrchestrator, SessionEvent, TracingSpeechSink, VoiceOutput};
use newsdesk_core::NewsdeskConfig;
use newsdesk_sources::{GeminiKnowledgeClient, NewsApiClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::CliArgs;
use crate::command::{parse_line, Command, HELP};

/// Print session events until the channel closes.
async fn render_loop(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(text) = render::render_event(&event) {
                    println!("{}", text);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind; some events were not shown");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Resolve `/action` input to an action key: a number picks a quick action
/// of the latest assistant message, anything else is taken as a key.
fn resolve_action(assistant: &AssistantOrchestrator, input: &str) -> String {
    if input.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(actions) = assistant.current_actions() {
            if let Some(action) = actions.iter().find(|a| a.id == input) {
                return action.action_key.clone();
            }
        }
    }
    input.to_string()
}

/// Run one inbound event in the background so the prompt stays responsive
/// and a newer message can supersede an older one.
fn dispatch(assistant: &Arc<AssistantOrchestrator>, command: Command) {
    let assistant = Arc::clone(assistant);
    tokio::spawn(async move {
        let result = match command {
            Command::Say(text) => assistant.submit_text(&text).await,
            Command::Action(input) => {
                let key = resolve_action(&assistant, &input);
                assistant.select_action(&key).await
            }
            _ => return,
        };
        match result {
            Ok(outcome) => tracing::debug!(?outcome, "Round trip finished"),
            Err(e) => eprintln!("! {}", e),
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = NewsdeskConfig::load_or_default(&config_file);
    config.apply_env_overrides();
    args.apply(&mut config);

    // Tracing. Logs go to stderr so they do not interleave with the chat.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Newsdesk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Sources.
    if config.news.credential().is_none() {
        tracing::warn!("No news API key configured; news requests will fail");
    }
    let news = Arc::new(NewsApiClient::new(config.news.clone())?);
    let knowledge = Arc::new(GeminiKnowledgeClient::new(config.knowledge.clone())?);
    if !config.knowledge.has_credential() {
        tracing::warn!("No knowledge API key configured; open questions are unavailable");
    }

    // Assistant.
    let voice = VoiceOutput::new(&config.voice, Arc::new(TracingSpeechSink));
    let assistant = Arc::new(AssistantOrchestrator::new(
        config.assistant.clone(),
        news,
        knowledge,
        voice,
    ));

    // The first session opened before anyone subscribed, so show its
    // greeting directly.
    let renderer = tokio::spawn(render_loop(assistant.subscribe()));
    for message in assistant.history()? {
        println!("{}", render::render_message(&message));
    }
    println!("(type /help for commands)");

    // Input loop.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_line(&line) else {
            continue;
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Voice => {
                let enabled = assistant.voice().toggle();
                println!("(voice {})", if enabled { "on" } else { "off" });
            }
            Command::Reset => {
                assistant.reset()?;
            }
            command @ (Command::Say(_) | Command::Action(_)) => dispatch(&assistant, command),
        }
    }

    tracing::info!("Newsdesk shutting down");
    renderer.abort();
    Ok(())
}
