//! Plain-text rendering of session events.

use newsdesk_assistant::{AttachedResult, Message, SessionEvent};

/// Render a session event for the terminal. Events with nothing to show
/// yield `None`.
pub fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended(message) if message.is_assistant() => {
            Some(render_message(message))
        }
        SessionEvent::MessageAppended(_) => None,
        SessionEvent::BusyChanged(true) => Some("  ... assistant is typing".to_string()),
        SessionEvent::BusyChanged(false) => None,
        SessionEvent::Opened { .. } => Some("--- new conversation ---".to_string()),
    }
}

/// Render an assistant message with its results, attribution, and quick
/// actions.
pub fn render_message(message: &Message) -> String {
    let mut out = format!(
        "[{}] Assistant: {}",
        message.created_at.format("%H:%M"),
        message.text
    );

    for (i, result) in message.attached_results.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, result.title()));
        if let AttachedResult::Article(article) = result {
            out.push_str(&format!(" ({})", article.source_name));
        }
        out.push_str(&format!("\n     {}", result.link()));
        if let Some(summary) = result.summary() {
            out.push_str(&format!("\n     {}", summary));
        }
    }

    if let Some(attribution) = &message.attribution {
        out.push_str(&format!("\n  Source: {}", attribution));
    }

    if !message.quick_actions.is_empty() {
        let actions: Vec<String> = message
            .quick_actions
            .iter()
            .map(|a| format!("[{}] {}", a.id, a.label))
            .collect();
        out.push_str(&format!("\n  {}", actions.join("  ")));
    }

    out
}
