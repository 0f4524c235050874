//! Prompt builders for structured critiques and follow-up turns.
//!
//! Both builders are pure: identical inputs always produce identical text.
//! Section order is fixed: identity preamble, hard constraints, user
//! context, then either the required output format (structured critique)
//! or the conversation so far and the new message (follow-up).

use critique_core::{ConversationTurn, CritiqueFormat, IdentityDocument, IntakeRecord};

use crate::schema;

/// Number of most recent turns rendered into a follow-up prompt. Older turns
/// are dropped, not summarized.
pub const FOLLOWUP_HISTORY_TURNS: usize = 10;

/// Behavioural constraints stated in every prompt.
pub const HARD_CONSTRAINTS: [&str; 4] = [
    "Do NOT use evaluative language (avoid \"good/bad/better/worse\").",
    "Do NOT prescribe final solutions. Offer lenses, questions, tradeoffs, and directions.",
    "Prioritize questions over statements.",
    "Preserve user authorship: the user decides.",
];

/// Stands in for the last intake when no structured critique has been requested.
pub const NO_INTAKE_MARKER: &str = "No structured intake provided yet.";

/// Stands in for the last critique when none has been generated.
pub const NO_CRITIQUE_MARKER: &str = "No prior critique yet.";

const CLOSING_INSTRUCTION: &str = "Respond in Markdown. Keep it concise and reflective. \
If the user asks for the Rules/identity, briefly explain your role and stop.";

fn constraint_lines() -> String {
    HARD_CONSTRAINTS
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt for a structured critique of one intake.
pub fn build_intake_prompt(
    identity: &IdentityDocument,
    intake: &IntakeRecord,
    format: CritiqueFormat,
) -> String {
    format!(
        "SYSTEM IDENTITY & GUIDELINES:\n\
{preamble}\n\
\n\
TASK:\n\
You are Critique. Provide a reflective design critique that strengthens the user's judgment.\n\
Follow the Rules and Guidelines strictly:\n\
{constraints}\n\
\n\
USER CONTEXT (structured intake):\n\
Design stage: {stage}\n\
Artifact type: {artifact}\n\
Audience/users: {audience}\n\
Primary goal of the work: {goal}\n\
Key constraints: {intake_constraints}\n\
What the user wants critique on: {focus}\n\
Work description (what exists so far):\n\
{work}\n\
\n\
OUTPUT FORMAT (Markdown):\n\
Use exactly these sections and headings:\n\
\n\
{schema}\n",
        preamble = identity.behavioural_preamble(),
        constraints = constraint_lines(),
        stage = intake.stage,
        artifact = intake.artifact,
        audience = intake.audience,
        goal = intake.goal,
        intake_constraints = intake.constraints,
        focus = intake.focus,
        work = intake.work,
        schema = schema::render(format),
    )
}

/// The last intake as compact labelled lines for follow-up grounding.
fn intake_summary(intake: &IntakeRecord) -> String {
    [
        format!("Design stage: {}", intake.stage),
        format!("Artifact type: {}", intake.artifact),
        format!("Audience/users: {}", intake.audience),
        format!("Goal: {}", intake.goal),
        format!("Constraints: {}", intake.constraints),
        format!("Critique focus: {}", intake.focus),
    ]
    .join("\n")
}

/// Render the trailing [`FOLLOWUP_HISTORY_TURNS`] turns, oldest first.
fn history_lines<'a>(history: impl IntoIterator<Item = &'a ConversationTurn>) -> String {
    let turns: Vec<&ConversationTurn> = history.into_iter().collect();
    let skip = turns.len().saturating_sub(FOLLOWUP_HISTORY_TURNS);

    turns[skip..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt for a follow-up message in the critique dialogue.
///
/// `history` may be longer than [`FOLLOWUP_HISTORY_TURNS`]; only the most
/// recent turns are included.
pub fn build_followup_prompt<'a>(
    identity: &IdentityDocument,
    history: impl IntoIterator<Item = &'a ConversationTurn>,
    last_intake: Option<&IntakeRecord>,
    last_result: Option<&str>,
    message: &str,
) -> String {
    let intake_text = last_intake
        .map(intake_summary)
        .unwrap_or_else(|| NO_INTAKE_MARKER.to_string());
    let critique_text = last_result
        .filter(|result| !result.is_empty())
        .unwrap_or(NO_CRITIQUE_MARKER);

    format!(
        "SYSTEM IDENTITY & GUIDELINES:\n\
{preamble}\n\
\n\
CONTEXT:\n\
You are continuing an ongoing critique dialogue.\n\
Rules to enforce:\n\
{constraints}\n\
\n\
LAST INTAKE (if any):\n\
{intake_text}\n\
\n\
LAST CRITIQUE (if any):\n\
{critique_text}\n\
\n\
CONVERSATION HISTORY:\n\
{history}\n\
\n\
USER MESSAGE:\n\
{message}\n\
\n\
{closing}\n",
        preamble = identity.behavioural_preamble(),
        constraints = constraint_lines(),
        history = history_lines(history),
        closing = CLOSING_INSTRUCTION,
    )
}
