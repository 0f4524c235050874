//! Line-based interactive session.
//!
//! Reads commands and follow-up messages from any async line source and
//! writes replies to any [`Write`] sink, streaming follow-up fragments as
//! they arrive.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use critique_core::IntakeRecord;
use critique_gateway::GenerationGateway;
use critique_session::{
    ConversationContext, MarkdownNoteExporter, NoteExporter, CHAT_GREETING, NOTE_SEPARATOR,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{ChatCommand, HELP};
use crate::intake::load_intake_file;
use crate::runner::CritiqueRunner;

const PROMPT: &str = "you> ";

/// Run the chat until `/quit` or end of input.
///
/// `default_export` is used by `/export` when no path is given.
pub async fn run_chat<G, R, W>(
    runner: &CritiqueRunner<G>,
    ctx: &mut ConversationContext,
    input: R,
    out: &mut W,
    default_export: &Path,
) -> io::Result<()>
where
    G: GenerationGateway,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if ctx.seed_greeting() {
        writeln!(out, "{CHAT_GREETING}\n")?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Empty => {}
            ChatCommand::Quit => break,
            ChatCommand::Help => writeln!(out, "{HELP}\n")?,
            ChatCommand::Invalid(reason) => writeln!(out, "{reason}\n")?,
            ChatCommand::Critique(path) => match load_intake_file(&path) {
                Ok(intake) => structured_critique(runner, ctx, intake, out).await?,
                Err(e) => writeln!(out, "Could not read intake: {e}\n")?,
            },
            ChatCommand::Example => {
                structured_critique(runner, ctx, IntakeRecord::example(), out).await?
            }
            ChatCommand::BringLast => {
                if ctx.bring_last_critique_into_chat() {
                    writeln!(out, "Added the last critique to the chat.\n")?;
                } else {
                    writeln!(out, "No critique yet. Try /example or /critique <file>.\n")?;
                }
            }
            ChatCommand::Clear => {
                ctx.clear();
                ctx.seed_greeting();
                writeln!(out, "Chat cleared.\n\n{CHAT_GREETING}\n")?;
            }
            ChatCommand::Reset => {
                ctx.reset_intake();
                writeln!(out, "Intake and last critique cleared. Notes are kept.\n")?;
            }
            ChatCommand::Notes => {
                let rendered: Vec<String> = ctx.notes_newest_first().map(|n| n.render()).collect();
                if rendered.is_empty() {
                    writeln!(out, "No saved critiques yet.\n")?;
                } else {
                    writeln!(out, "{}\n", rendered.join(NOTE_SEPARATOR))?;
                }
            }
            ChatCommand::Export(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(default_export));
                match MarkdownNoteExporter::new(path).export(ctx.notes()) {
                    Ok(written) => writeln!(out, "Notes written to {}\n", written.display())?,
                    Err(e) => writeln!(out, "{e}\n")?,
                }
            }
            ChatCommand::Message(message) => {
                let mut write_error = None;
                runner
                    .follow_up(ctx, &message, |fragment| {
                        if write_error.is_none() {
                            if let Err(e) = write!(out, "{fragment}").and_then(|_| out.flush()) {
                                write_error = Some(e);
                            }
                        }
                    })
                    .await;
                if let Some(e) = write_error {
                    return Err(e);
                }
                writeln!(out, "\n")?;
            }
        }
    }

    tracing::debug!(session_id = %ctx.id(), turns = ctx.turns().len(), "Chat ended");
    Ok(())
}

async fn structured_critique<G, W>(
    runner: &CritiqueRunner<G>,
    ctx: &mut ConversationContext,
    intake: IntakeRecord,
    out: &mut W,
) -> io::Result<()>
where
    G: GenerationGateway,
    W: Write,
{
    let result = runner.critique(ctx, intake).await;
    writeln!(out, "{result}\n")?;
    writeln!(out, "Saved to notes. Use /bring-last to discuss it here.\n")
}
