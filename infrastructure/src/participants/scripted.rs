//! Participant that replays a fixed list of replies.

use async_trait::async_trait;
use roundtable_application::{Participant, TurnError};
use roundtable_domain::{Message, MessageDraft, SourceId};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers every turn with the next reply, wrapping around at the end.
///
/// With no replies every turn produces no messages.
pub struct ScriptedParticipant {
    name: SourceId,
    description: String,
    replies: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedParticipant {
    pub fn new(name: SourceId, replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name,
            description: String::new(),
            replies: replies.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }
}

#[async_trait]
impl Participant for ScriptedParticipant {
    fn name(&self) -> &SourceId {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn take_turn(&self, _context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
        if self.replies.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        Ok(vec![MessageDraft::new(
            self.name.clone(),
            self.replies[index].clone(),
        )])
    }
}
