//! critique-session: Per-user conversational state.
//!
//! One [`context::ConversationContext`] exists per user session and is
//! threaded explicitly through every call; nothing here is global. It owns
//! the append-only turn log, the last intake and critique used to ground
//! follow-ups, and the notes accumulated from every structured critique.
//! Notes live only as long as the session, apart from the on-demand
//! Markdown export in [`export`].

pub mod context;
pub mod export;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use context::{ConversationContext, CHAT_GREETING};
pub use export::{ExportError, MarkdownNoteExporter, NoteExporter};

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a user session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Longest focus summary kept on a note before it is cut.
pub const FOCUS_SUMMARY_CHARS: usize = 80;

/// Separator placed between notes in the export document.
pub const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// One completed structured critique, kept for the rest of the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    /// When the critique was recorded.
    pub timestamp: DateTime<Utc>,
    /// Design stage of the triggering intake.
    pub stage: String,
    /// Focus areas, cut to [`FOCUS_SUMMARY_CHARS`] characters.
    pub focus: String,
    /// Full critique text (or the inline error text that replaced it).
    pub result: String,
}

impl Note {
    /// Timestamp as ISO-8601 UTC with second precision, e.g. `2025-03-01T09:30:00Z`.
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// `[<timestamp>] <stage> • <focus>` followed by a blank line and the result.
    pub fn render(&self) -> String {
        format!(
            "[{}] {} • {}\n\n{}",
            self.timestamp_label(),
            self.stage,
            self.focus,
            self.result
        )
    }
}

/// Cut focus text to [`FOCUS_SUMMARY_CHARS`] characters, marking the cut with `…`.
pub fn summarize_focus(focus: &str) -> String {
    if focus.chars().count() > FOCUS_SUMMARY_CHARS {
        let head: String = focus.chars().take(FOCUS_SUMMARY_CHARS).collect();
        format!("{head}…")
    } else {
        focus.to_string()
    }
}

/// Join rendered notes, oldest first, into one Markdown document.
pub fn render_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(Note::render)
        .collect::<Vec<_>>()
        .join(NOTE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note(stage: &str, result: &str) -> Note {
        Note {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
            stage: stage.to_string(),
            focus: "hierarchy".to_string(),
            result: result.to_string(),
        }
    }

    #[test]
    fn note_render_format() {
        assert_eq!(
            note("Mid-fidelity", "## Intent check").render(),
            "[2025-03-01T09:30:00Z] Mid-fidelity • hierarchy\n\n## Intent check"
        );
    }

    #[test]
    fn notes_joined_with_separator() {
        let notes = [note("Early ideation", "first"), note("Late stage", "second")];
        let rendered = render_notes(&notes);
        assert_eq!(rendered.matches(NOTE_SEPARATOR).count(), 1);
        let first = rendered.find("first").unwrap();
        assert!(first < rendered.find("second").unwrap());
        assert_eq!(render_notes(&[]), "");
    }

    #[test]
    fn focus_summary_cut_at_eighty_chars() {
        let short = "a".repeat(80);
        assert_eq!(summarize_focus(&short), short);

        let long = "é".repeat(81);
        let summary = summarize_focus(&long);
        assert_eq!(summary.chars().count(), 81);
        assert!(summary.ends_with('…'));
        assert_eq!(summary.chars().filter(|c| *c == 'é').count(), 80);
    }
}
