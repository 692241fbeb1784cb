//! Domain layer for roundtable
//!
//! This crate contains the core conversation model: messages, the
//! append-only transcript, per-source message filters and termination
//! conditions. It has no dependencies on async runtimes, infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! Every run owns one [`Transcript`]. Participants never mutate it; they
//! return [`MessageDraft`]s and the coordinator appends them, assigning
//! sequence numbers in insertion order.
//!
//! ## Message filter
//!
//! A [`MessageFilter`] built from a [`FilterSpec`] decides which messages a
//! wrapped participant may see: up to N messages per allowed source, in
//! ascending sequence order.
//!
//! ## Termination
//!
//! A [`TerminationCondition`] is evaluated after every turn and can be
//! composed with `|` and `&`.

pub mod config;
pub mod conversation;
pub mod core;
pub mod filter;
pub mod run;
pub mod termination;

// Re-export commonly used types
pub use config::{
    OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use conversation::{
    message::{Message, MessageDraft},
    transcript::Transcript,
};
pub use core::{error::ConfigError, source::SourceId};
pub use filter::{
    message_filter::MessageFilter,
    spec::{FilterSpec, Position, SourceRule},
};
pub use run::{
    outcome::{RunOutcome, RunStatus},
    state::CoordinatorState,
};
pub use termination::condition::{TerminationCondition, TerminationContext};
