//! Per-source message filter
//!
//! [`MessageFilter`] computes the slice of a conversation a wrapped
//! participant is allowed to see. Selection is per source: for every rule,
//! up to `count` messages of that source are kept from the chosen end of
//! its history. The result is always ordered by ascending sequence number.

use super::spec::{FilterSpec, Position, SourceRule};
use crate::conversation::message::Message;
use crate::core::source::SourceId;
use std::collections::HashMap;

/// Predicate + buffer over a transcript
#[derive(Debug, Clone)]
pub struct MessageFilter {
    rules: HashMap<SourceId, SourceRule>,
}

impl MessageFilter {
    pub fn new(spec: FilterSpec) -> Self {
        let rules = spec
            .rules()
            .iter()
            .map(|rule| (rule.source().clone(), rule.clone()))
            .collect();
        Self { rules }
    }

    /// A filter that admits nothing
    pub fn allow_none() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Whether messages from `source` can ever pass this filter
    pub fn admits(&self, source: &SourceId) -> bool {
        self.rules.contains_key(source)
    }

    /// Compute the visible subset of `messages`.
    ///
    /// Never fails: no qualifying messages yields an empty result.
    pub fn visible(&self, messages: &[Message]) -> Vec<Message> {
        if self.rules.is_empty() || messages.is_empty() {
            return Vec::new();
        }

        let mut keep = vec![false; messages.len()];
        let mut taken: HashMap<&SourceId, usize> = HashMap::new();

        // Last rules scan from the newest message backwards
        for (index, message) in messages.iter().enumerate().rev() {
            self.select(message, Position::Last, index, &mut keep, &mut taken);
        }
        // First rules scan from the oldest message forwards
        for (index, message) in messages.iter().enumerate() {
            self.select(message, Position::First, index, &mut keep, &mut taken);
        }

        let mut visible: Vec<Message> = messages
            .iter()
            .zip(keep)
            .filter(|(_, kept)| *kept)
            .map(|(message, _)| message.clone())
            .collect();
        visible.sort_by_key(|m| m.sequence_number());
        visible
    }

    fn select<'a>(
        &self,
        message: &'a Message,
        position: Position,
        index: usize,
        keep: &mut [bool],
        taken: &mut HashMap<&'a SourceId, usize>,
    ) {
        let Some(rule) = self.rules.get(message.source()) else {
            return;
        };
        if rule.position() != position {
            return;
        }

        let count = taken.entry(message.source()).or_default();
        if *count < rule.count() {
            *count += 1;
            keep[index] = true;
        }
    }
}

impl From<FilterSpec> for MessageFilter {
    fn from(spec: FilterSpec) -> Self {
        Self::new(spec)
    }
}
