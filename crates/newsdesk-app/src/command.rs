//! Parsing of terminal input lines.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for the assistant.
    Say(String),
    /// Tap a quick action, by its number on the latest message or its key.
    Action(String),
    /// Toggle spoken replies.
    Voice,
    /// Start a fresh conversation.
    Reset,
    Help,
    Quit,
}

/// Parse an input line. Blank lines yield `None`.
///
/// Lines starting with `/` are commands; anything else is said to the
/// assistant. An unknown command is said as-is so nothing typed is lost.
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Say(line.to_string()));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let command = match name.as_str() {
        "action" | "a" if !arg.is_empty() => Command::Action(arg.to_string()),
        "voice" => Command::Voice,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) && arg.is_empty() => {
            Command::Action(name)
        }
        _ => Command::Say(line.to_string()),
    };
    Some(command)
}

pub const HELP: &str = "\
Type a message to talk to the assistant.
  /action <n|key>  tap quick action n of the latest reply, or by key
  /<n>             shorthand for /action <n>
  /voice           toggle spoken replies
  /reset           start a new conversation
  /quit            leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_said() {
        assert_eq!(
            parse_line("  latest tech news "),
            Some(Command::Say("latest tech news".to_string()))
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(
            parse_line("/action tech_news"),
            Some(Command::Action("tech_news".to_string()))
        );
        assert_eq!(parse_line("/a 2"), Some(Command::Action("2".to_string())));
        assert_eq!(parse_line("/3"), Some(Command::Action("3".to_string())));
    }

    #[test]
    fn test_action_without_argument_is_said() {
        assert_eq!(
            parse_line("/action"),
            Some(Command::Say("/action".to_string()))
        );
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(parse_line("/voice"), Some(Command::Voice));
        assert_eq!(parse_line("/RESET"), Some(Command::Reset));
        assert_eq!(parse_line("/help"), Some(Command::Help));
        assert_eq!(parse_line("/quit"), Some(Command::Quit));
        assert_eq!(parse_line("/exit"), Some(Command::Quit));
    }

    #[test]
    fn test_unknown_command_is_said() {
        assert_eq!(
            parse_line("/shrug ok"),
            Some(Command::Say("/shrug ok".to_string()))
        );
    }
}
