//! critique-prompt: Prompt assembly for the Critique assistant.
//!
//! Combines the identity document, a structured intake, and (for follow-ups)
//! the recent conversation into a single instruction payload. Behavioural
//! constraints are conveyed only as prose inside that payload; nothing here
//! verifies that the endpoint obeys them. [`review`] offers an advisory check
//! of generated text but never rejects or rewrites it.

pub mod assembler;
pub mod review;
pub mod schema;

pub use assembler::{
    build_followup_prompt, build_intake_prompt, FOLLOWUP_HISTORY_TURNS, HARD_CONSTRAINTS,
    NO_CRITIQUE_MARKER, NO_INTAKE_MARKER,
};
pub use review::{review_output, ComplianceReport};
pub use schema::{sections, SchemaSection};
