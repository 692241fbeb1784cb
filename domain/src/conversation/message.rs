//! Conversation messages

use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};

/// A message produced by a participant but not yet part of a transcript.
///
/// The coordinator turns drafts into [`Message`]s when it appends them, which
/// is where the sequence number is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub source: SourceId,
    pub content: String,
}

impl MessageDraft {
    pub fn new(source: SourceId, content: impl Into<String>) -> Self {
        Self {
            source,
            content: content.into(),
        }
    }

    /// Re-attribute the draft to another source
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }
}

/// A message in a transcript (Entity)
///
/// Immutable once appended: fields are only readable through accessors, and
/// only a transcript assigns sequence numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    source: SourceId,
    content: String,
    sequence_number: u64,
}

impl Message {
    pub(crate) fn from_draft(draft: MessageDraft, sequence_number: u64) -> Self {
        Self {
            source: draft.source,
            content: draft.content,
            sequence_number,
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Short single-line preview of the content
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        let truncated: String = first_line.chars().take(max_chars).collect();
        if truncated.len() < self.content.len() {
            format!("{}...", truncated)
        } else {
            truncated
        }
    }
}
