//! Core value types shared by the prompt assembler, session context, and gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Intake ────────────────────────────────────────────────────────

/// Design stages offered by the front end. Advisory only: the core accepts
/// any stage string.
pub const DESIGN_STAGES: [&str; 3] = ["Early ideation", "Mid-fidelity", "Late stage"];

/// Artifact types offered by the front end. Advisory only.
pub const ARTIFACT_TYPES: [&str; 5] = [
    "App concept / feature",
    "Wireframe / layout",
    "Prototype flow",
    "Copy / content",
    "Other",
];

/// What the user wants critique on: a single free-text answer or a list of areas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FocusAreas {
    Text(String),
    List(Vec<String>),
}

impl Default for FocusAreas {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FocusAreas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FocusAreas {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// One structured critique request, as submitted from the intake form.
///
/// Every field is free text. `stage` and `artifact` are picked from fixed
/// lists by the front end ([`DESIGN_STAGES`], [`ARTIFACT_TYPES`]) but are not
/// validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntakeRecord {
    pub stage: String,
    #[serde(alias = "platform")]
    pub artifact: String,
    pub audience: String,
    #[serde(alias = "primary_goal")]
    pub goal: String,
    pub constraints: String,
    pub focus: FocusAreas,
    #[serde(alias = "work_description")]
    pub work: String,
}

impl IntakeRecord {
    /// The sample intake used by "try an example".
    pub fn example() -> Self {
        Self {
            stage: "Early ideation".to_string(),
            artifact: "App concept / feature".to_string(),
            audience: "Design students submitting project pitches".to_string(),
            goal: "Help students get reflective critique quickly while preserving authorship"
                .to_string(),
            constraints:
                "Must avoid prescriptive 'fixes' and evaluative language; keep responses structured"
                    .to_string(),
            focus: FocusAreas::Text(
                "How to structure the critique so it stays reflective".to_string(),
            ),
            work: "I’m building a bot called Critique that asks reflective questions and applies \
                   design lenses. I want the feedback to adapt by stage (early/mid/late) and \
                   emphasize tradeoffs and iteration."
                .to_string(),
        }
    }

    /// The focus areas rendered as one line of text.
    pub fn focus_text(&self) -> String {
        self.focus.to_string()
    }
}

// ── Conversation ──────────────────────────────────────────────────

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used when a turn is rendered into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One message in the conversational log. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

// ── Generation ────────────────────────────────────────────────────

/// Bounded options passed to the generation endpoint with every prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2000,
        }
    }
}

/// Which output structure the structured critique prompt demands.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CritiqueFormat {
    /// Six sections: intent check, questions, lenses, tradeoffs, directions, next questions.
    #[default]
    Reflective,
    /// Five sections separating what is observed from how it may be interpreted.
    Observational,
}
