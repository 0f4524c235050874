//! critique-cli: Session orchestration and a terminal front end for Critique.
//!
//! [`runner::CritiqueRunner`] ties the identity document, prompt assembler,
//! generation gateway, and a caller-owned conversation context together.
//! [`chat`] drives an interactive session over any line-based input, standing
//! in for the browser UI of the hosted deployment.

pub mod chat;
pub mod commands;
pub mod intake;
pub mod runner;

pub use runner::CritiqueRunner;
