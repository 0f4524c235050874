//! Conversation context for one user session.
//!
//! Records turns and critique results incrementally as the session runs:
//!
//! ```
//! # use critique_core::{IntakeRecord, Role};
//! # use critique_session::ConversationContext;
//! let mut ctx = ConversationContext::new();
//! ctx.record_result(IntakeRecord::example(), "## Intent check\n- ...");
//! ctx.append_turn(Role::User, "Which lens should I try first?");
//! ctx.append_turn(Role::Assistant, "What would you like to learn from it?");
//! assert_eq!(ctx.recent_window(10).count(), 2);
//! assert_eq!(ctx.notes().len(), 1);
//! ```

use chrono::{DateTime, Utc};
use critique_core::{ConversationTurn, IntakeRecord, Role};

use crate::{render_notes, summarize_focus, Note, SessionId};

/// The assistant's opening line when the chat log is empty.
pub const CHAT_GREETING: &str = "If you want, tell me what you’re uncertain about (intent, \
audience, tradeoffs, constraints), and I’ll help you think through it.";

/// Session-scoped state: turn log, follow-up grounding, and notes.
///
/// The turn log and the notes have separate lifecycles: [`clear`](Self::clear)
/// empties turns only, [`reset_intake`](Self::reset_intake) drops the
/// grounding pointers only, and notes are never removed.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    id: SessionId,
    turns: Vec<ConversationTurn>,
    last_intake: Option<IntakeRecord>,
    last_result: Option<String>,
    notes: Vec<Note>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Append one turn. Turns are never reordered, merged, or deduplicated.
    pub fn append_turn(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, text));
    }

    /// All turns in append order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The last `n` turns in append order (all of them if fewer exist).
    ///
    /// The returned iterator borrows the log and can be cloned to restart it.
    pub fn recent_window(&self, n: usize) -> std::slice::Iter<'_, ConversationTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns[skip..].iter()
    }

    /// Seed the assistant greeting if the log is empty. Returns whether it was added.
    pub fn seed_greeting(&mut self) -> bool {
        if self.turns.is_empty() {
            self.append_turn(Role::Assistant, CHAT_GREETING);
            true
        } else {
            false
        }
    }

    /// Record a completed structured critique.
    ///
    /// Replaces the last intake and last result, and appends a note.
    pub fn record_result(&mut self, intake: IntakeRecord, result: impl Into<String>) {
        self.record_result_at(intake, result, Utc::now());
    }

    /// [`record_result`](Self::record_result) with an explicit timestamp.
    pub fn record_result_at(
        &mut self,
        intake: IntakeRecord,
        result: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        let result = result.into();
        let note = Note {
            timestamp,
            stage: intake.stage.clone(),
            focus: summarize_focus(&intake.focus_text()),
            result: result.clone(),
        };

        tracing::debug!(
            session_id = %self.id,
            stage = %note.stage,
            result_chars = result.len(),
            notes = self.notes.len() + 1,
            "Critique recorded"
        );

        self.notes.push(note);
        self.last_intake = Some(intake);
        self.last_result = Some(result);
    }

    pub fn last_intake(&self) -> Option<&IntakeRecord> {
        self.last_intake.as_ref()
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Empty the turn log. Notes and the last intake/result are kept.
    pub fn clear(&mut self) {
        tracing::debug!(session_id = %self.id, cleared = self.turns.len(), "Chat cleared");
        self.turns.clear();
    }

    /// Forget the last intake and result. Notes and turns are kept.
    pub fn reset_intake(&mut self) {
        self.last_intake = None;
        self.last_result = None;
    }

    /// Add the last critique to the chat as an assistant turn.
    ///
    /// Returns false (and changes nothing) when no critique exists yet.
    pub fn bring_last_critique_into_chat(&mut self) -> bool {
        match self.last_result.clone() {
            Some(result) => {
                self.append_turn(Role::Assistant, result);
                true
            }
            None => false,
        }
    }

    /// Notes in the order they were recorded.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes most recent first, for display.
    pub fn notes_newest_first(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().rev()
    }

    /// All notes, oldest first, as one Markdown document.
    pub fn export_notes(&self) -> String {
        render_notes(&self.notes)
    }
}
