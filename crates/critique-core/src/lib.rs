//! critique-core: Shared types, configuration, and error handling for the Critique assistant.
//!
//! This crate provides the foundational pieces every other Critique crate builds on:
//! - The identity document (the assistant's behavioural contract) and its store
//! - The intake record describing one critique request
//! - Conversation turn and generation option value types
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::CritiqueConfig;
pub use error::CoreError;
pub use identity::{IdentityDocument, IdentityStore, DEVELOPER_NAME_PLACEHOLDER};
pub use types::{
    ConversationTurn, CritiqueFormat, FocusAreas, GenerationOptions, IntakeRecord, Role,
};
