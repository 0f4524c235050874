//! Slash commands understood by the interactive chat.

use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  /critique <file>   Run a structured critique from an intake file
  /example           Run a structured critique on the example intake
  /bring-last        Add the last critique to the chat
  /clear             Clear the chat (notes and last critique are kept)
  /reset             Forget the last intake and critique (notes are kept)
  /notes             Show saved critiques, newest first
  /export [path]     Write saved critiques to a Markdown file
  /help              Show this help
  /quit              Leave the session
Anything else is sent as a follow-up message.";

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Critique(PathBuf),
    Example,
    BringLast,
    Clear,
    Reset,
    Notes,
    Export(Option<PathBuf>),
    Help,
    Quit,
    /// A slash command that was not recognised, or was missing its argument.
    Invalid(String),
    Message(String),
    Empty,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (command, None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("critique", Some(path)) => Self::Critique(PathBuf::from(path)),
            ("critique", None) => Self::Invalid("/critique needs an intake file".to_string()),
            ("example", _) => Self::Example,
            ("bring-last", _) => Self::BringLast,
            ("clear", _) => Self::Clear,
            ("reset", _) => Self::Reset,
            ("notes", _) => Self::Notes,
            ("export", path) => Self::Export(path.map(PathBuf::from)),
            ("help", _) | ("?", _) => Self::Help,
            ("quit", _) | ("exit", _) => Self::Quit,
            _ => Self::Invalid(format!("Unknown command /{name}. Type /help.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            ChatCommand::parse("  What should I test first?  "),
            ChatCommand::Message("What should I test first?".to_string())
        );
        assert_eq!(ChatCommand::parse("   "), ChatCommand::Empty);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            ChatCommand::parse("/critique  intake.toml"),
            ChatCommand::Critique(PathBuf::from("intake.toml"))
        );
        assert_eq!(ChatCommand::parse("/export"), ChatCommand::Export(None));
        assert_eq!(
            ChatCommand::parse("/export out/notes.md"),
            ChatCommand::Export(Some(PathBuf::from("out/notes.md")))
        );
        assert_eq!(ChatCommand::parse("/QUIT"), ChatCommand::Quit);
        assert_eq!(ChatCommand::parse("/bring-last"), ChatCommand::BringLast);
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        let incomplete = ChatCommand::parse("/critique");
        assert!(matches!(incomplete, ChatCommand::Invalid(_)));
        match ChatCommand::parse("/frobnicate now") {
            ChatCommand::Invalid(text) => assert!(text.contains("/frobnicate")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
