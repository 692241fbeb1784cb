//! Termination conditions for a round-robin conversation
//!
//! Conditions are evaluated by the coordinator after every turn. They can be
//! combined with `|` (any) and `&` (all):
//!
//! ```
//! use roundtable_domain::TerminationCondition;
//!
//! let stop = TerminationCondition::text_mention("APPROVE") | TerminationCondition::MaxMessages(8);
//! assert_eq!(stop.to_string(), "text mention 'APPROVE' or 8 messages");
//! ```

use crate::conversation::transcript::Transcript;
use crate::core::source::SourceId;
use std::time::Duration;

/// State a termination condition is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct TerminationContext<'a> {
    /// The full transcript, task messages included
    pub transcript: &'a Transcript,
    /// Participant turns taken so far
    pub turns_taken: usize,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
}

impl<'a> TerminationContext<'a> {
    pub fn new(transcript: &'a Transcript) -> Self {
        Self {
            transcript,
            turns_taken: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_turns_taken(mut self, turns_taken: usize) -> Self {
        self.turns_taken = turns_taken;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

/// Predicate deciding when a conversation is over
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationCondition {
    /// Stop once this many participant turns have been taken
    MaxTurns(usize),
    /// Stop once the transcript holds this many messages (task included)
    MaxMessages(usize),
    /// Stop once any message, task included, contains the text
    ContainsText(String),
    /// Stop once any of these sources appears in the transcript
    SourceMatch(Vec<SourceId>),
    /// Stop once the run has lasted this long
    Timeout(Duration),
    /// Stop when any inner condition holds (empty: never)
    Or(Vec<TerminationCondition>),
    /// Stop when every inner condition holds (empty: never)
    And(Vec<TerminationCondition>),
}

impl TerminationCondition {
    pub fn text_mention(text: impl Into<String>) -> Self {
        TerminationCondition::ContainsText(text.into())
    }

    pub fn source_match(sources: impl IntoIterator<Item = SourceId>) -> Self {
        TerminationCondition::SourceMatch(sources.into_iter().collect())
    }

    /// A condition that never holds; the step bound alone ends the run
    pub fn never() -> Self {
        TerminationCondition::Or(Vec::new())
    }

    /// Evaluate the condition, returning the stop reason when it holds
    pub fn check(&self, ctx: &TerminationContext<'_>) -> Option<String> {
        match self {
            TerminationCondition::MaxTurns(n) => (ctx.turns_taken >= *n)
                .then(|| format!("Maximum number of turns {} reached", n)),
            TerminationCondition::MaxMessages(n) => (ctx.transcript.len() >= *n)
                .then(|| format!("Maximum number of messages {} reached", n)),
            TerminationCondition::ContainsText(text) => ctx
                .transcript
                .iter()
                .find(|m| m.content().contains(text.as_str()))
                .map(|m| format!("Text '{}' mentioned by {}", text, m.source())),
            TerminationCondition::SourceMatch(sources) => ctx
                .transcript
                .iter()
                .find(|m| sources.contains(m.source()))
                .map(|m| format!("'{}' answered", m.source())),
            TerminationCondition::Timeout(limit) => (ctx.elapsed >= *limit)
                .then(|| format!("Timeout of {:.1}s reached", limit.as_secs_f64())),
            TerminationCondition::Or(conditions) => {
                conditions.iter().find_map(|c| c.check(ctx))
            }
            TerminationCondition::And(conditions) => {
                if conditions.is_empty() {
                    return None;
                }
                let reasons = conditions
                    .iter()
                    .map(|c| c.check(ctx))
                    .collect::<Option<Vec<_>>>()?;
                Some(reasons.join("; "))
            }
        }
    }

    pub fn is_met(&self, ctx: &TerminationContext<'_>) -> bool {
        self.check(ctx).is_some()
    }

    /// Human-readable description of the condition
    pub fn description(&self) -> String {
        match self {
            TerminationCondition::MaxTurns(n) => format!("{} turns", n),
            TerminationCondition::MaxMessages(n) => format!("{} messages", n),
            TerminationCondition::ContainsText(text) => format!("text mention '{}'", text),
            TerminationCondition::SourceMatch(sources) => format!(
                "reply from {}",
                sources
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" or ")
            ),
            TerminationCondition::Timeout(limit) => format!("{}s timeout", limit.as_secs()),
            TerminationCondition::Or(conditions) if conditions.is_empty() => "never".to_string(),
            TerminationCondition::Or(conditions) => Self::join(conditions, " or "),
            TerminationCondition::And(conditions) if conditions.is_empty() => "never".to_string(),
            TerminationCondition::And(conditions) => Self::join(conditions, " and "),
        }
    }

    fn join(conditions: &[TerminationCondition], separator: &str) -> String {
        conditions
            .iter()
            .map(|c| match c {
                TerminationCondition::Or(inner) | TerminationCondition::And(inner)
                    if inner.len() > 1 =>
                {
                    format!("({})", c.description())
                }
                _ => c.description(),
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Default for TerminationCondition {
    fn default() -> Self {
        Self::never()
    }
}

impl std::fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::ops::BitOr for TerminationCondition {
    type Output = TerminationCondition;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (TerminationCondition::Or(mut left), TerminationCondition::Or(right)) => {
                left.extend(right);
                TerminationCondition::Or(left)
            }
            (TerminationCondition::Or(mut left), rhs) => {
                left.push(rhs);
                TerminationCondition::Or(left)
            }
            (lhs, rhs) => TerminationCondition::Or(vec![lhs, rhs]),
        }
    }
}

impl std::ops::BitAnd for TerminationCondition {
    type Output = TerminationCondition;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (TerminationCondition::And(mut left), TerminationCondition::And(right)) => {
                left.extend(right);
                TerminationCondition::And(left)
            }
            (TerminationCondition::And(mut left), rhs) => {
                left.push(rhs);
                TerminationCondition::And(left)
            }
            (lhs, rhs) => TerminationCondition::And(vec![lhs, rhs]),
        }
    }
}
