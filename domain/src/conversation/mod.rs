//! Conversation domain.
//!
//! - [`message::MessageDraft`]: output of a participant's turn
//! - [`message::Message`]: an appended, numbered, immutable message
//! - [`transcript::Transcript`]: the append-only history shared by one run

pub mod message;
pub mod transcript;
