//! Append-only conversation transcript

use super::message::{Message, MessageDraft};
use crate::core::source::SourceId;
use serde::Serialize;

/// Ordered, append-only record of a conversation (Entity)
///
/// Sequence numbers start at 1 and grow by one per appended message, so
/// insertion order and sequence order always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single draft, returning the stored message
    pub fn append(&mut self, draft: MessageDraft) -> &Message {
        let sequence_number = self.next_sequence_number();
        self.messages.push(Message::from_draft(draft, sequence_number));
        &self.messages[self.messages.len() - 1]
    }

    /// Append every draft of one turn, returning the newly stored messages
    pub fn append_all(&mut self, drafts: impl IntoIterator<Item = MessageDraft>) -> &[Message] {
        let start = self.messages.len();
        for draft in drafts {
            self.append(draft);
        }
        &self.messages[start..]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Messages from a given source, oldest first
    pub fn from_source<'a>(&'a self, source: &'a SourceId) -> impl Iterator<Item = &'a Message> {
        self.messages.iter().filter(move |m| m.source() == source)
    }

    /// Messages appended at or after the given index
    pub fn since(&self, index: usize) -> &[Message] {
        &self.messages[index.min(self.messages.len())..]
    }

    fn next_sequence_number(&self) -> u64 {
        self.messages
            .last()
            .map_or(1, |m| m.sequence_number() + 1)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
