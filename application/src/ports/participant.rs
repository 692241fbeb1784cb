//! Participant port
//!
//! Defines the capability every conversation participant offers: given the
//! messages it may see, produce the messages of its next turn. Model-backed
//! assistants, scripted responders and filtering decorators all plug in here.

use async_trait::async_trait;
use roundtable_domain::{Message, MessageDraft, SourceId};
use std::time::Duration;
use thiserror::Error;

/// Errors a participant can report from its turn
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Turn failed: {0}")]
    Failed(String),

    #[error("Turn timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TurnError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TurnError::TimedOut(_))
    }
}

/// A conversation participant
///
/// `take_turn` receives the visible context (the full transcript for a plain
/// participant) and returns zero or more drafts. The coordinator appends the
/// drafts atomically, so a participant that fails leaves no trace in the
/// transcript. Not having enough information is ordinary content, not an
/// error.
#[async_trait]
pub trait Participant: Send + Sync {
    /// Registration name; unique within one coordinator
    fn name(&self) -> &SourceId;

    /// Source the participant's messages are attributed to
    fn output_source(&self) -> &SourceId {
        self.name()
    }

    /// Short human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Produce the messages of the next turn
    async fn take_turn(&self, context: &[Message]) -> Result<Vec<MessageDraft>, TurnError>;
}
