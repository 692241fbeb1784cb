//! Participant that answers with a regex match from its visible messages.

use async_trait::async_trait;
use regex::Regex;
use roundtable_application::{Participant, TurnError};
use roundtable_domain::{Message, MessageDraft, SourceId};
use tracing::trace;

/// Searches the visible messages, newest first, for `pattern`.
///
/// The first match is rendered through the reply template, which may refer
/// to capture groups (`${1}`, `${name}`). When nothing matches the fallback
/// reply is sent instead; lacking information is an answer, not a failure.
pub struct ExtractorParticipant {
    name: SourceId,
    description: String,
    pattern: Regex,
    template: String,
    fallback: String,
}

impl ExtractorParticipant {
    pub const DEFAULT_FALLBACK: &'static str = "No matching information found";

    /// The default template is the first capture group, or the whole match
    /// when the pattern has no groups.
    pub fn new(name: SourceId, pattern: Regex) -> Self {
        let template = if pattern.captures_len() > 1 {
            "${1}"
        } else {
            "${0}"
        };
        Self {
            name,
            description: String::new(),
            pattern,
            template: template.to_string(),
            fallback: Self::DEFAULT_FALLBACK.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The reply for `context`, if any visible message matches
    pub fn extract(&self, context: &[Message]) -> Option<String> {
        let captures = context
            .iter()
            .rev()
            .find_map(|m| self.pattern.captures(m.content()))?;
        let mut reply = String::new();
        captures.expand(&self.template, &mut reply);
        Some(reply)
    }
}

#[async_trait]
impl Participant for ExtractorParticipant {
    fn name(&self) -> &SourceId {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn take_turn(&self, context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
        let reply = match self.extract(context) {
            Some(reply) => reply,
            None => {
                trace!(
                    "{}: no match for /{}/ in {} messages",
                    self.name,
                    self.pattern,
                    context.len()
                );
                self.fallback.clone()
            }
        };
        Ok(vec![MessageDraft::new(self.name.clone(), reply)])
    }
}
