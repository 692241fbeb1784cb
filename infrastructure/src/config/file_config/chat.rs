//! Chat configuration from TOML (`[chat]` section)
//!
//! ```toml
//! [chat]
//! max_steps = 10
//! turn_timeout_secs = 30
//!
//! [chat.termination]
//! source_match = ["age_agent"]
//! text_mention = "APPROVE"
//! ```
//!
//! Every entry under `[chat.termination]` is an alternative: the run stops as
//! soon as any of them holds.

use roundtable_application::CoordinatorConfig;
use roundtable_domain::{ConfigError, SourceId, TerminationCondition};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Maximum number of participant turns in one run
    pub max_steps: usize,
    /// Per-turn time limit in seconds
    pub turn_timeout_secs: Option<u64>,
    /// Source attributed to the task message
    pub task_source: String,
    /// Stop conditions
    pub termination: FileTerminationConfig,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            max_steps: CoordinatorConfig::DEFAULT_MAX_STEPS,
            turn_timeout_secs: None,
            task_source: SourceId::USER.to_string(),
            termination: FileTerminationConfig::default(),
        }
    }
}

impl FileChatConfig {
    /// Convert to [`CoordinatorConfig`], validating the step bound and source
    pub fn to_coordinator_config(&self) -> Result<CoordinatorConfig, ConfigError> {
        let config = CoordinatorConfig::default()
            .with_max_steps(self.max_steps)
            .with_turn_timeout(self.turn_timeout_secs.map(Duration::from_secs))
            .with_task_source(SourceId::new(self.task_source.clone())?);
        config.validate()?;
        Ok(config)
    }
}

/// Raw termination configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTerminationConfig {
    /// Stop once any of these sources has answered
    pub source_match: Vec<String>,
    /// Stop once a reply contains this text
    pub text_mention: Option<String>,
    /// Stop once the transcript holds this many messages
    pub max_messages: Option<usize>,
    /// Stop after this many turns
    pub max_turns: Option<usize>,
    /// Stop once the run has lasted this many seconds
    pub timeout_secs: Option<u64>,
}

impl FileTerminationConfig {
    /// Whether no stop condition is configured
    pub fn is_empty(&self) -> bool {
        self.source_match.is_empty()
            && self.text_mention.is_none()
            && self.max_messages.is_none()
            && self.max_turns.is_none()
            && self.timeout_secs.is_none()
    }

    /// Entries that would stop every run at once, as `(entry, reason)`
    pub fn degenerate_entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries = Vec::new();
        if self.text_mention.as_deref() == Some("") {
            entries.push(("text_mention", "empty text matches every message"));
        }
        if self.max_messages == Some(0) {
            entries.push(("max_messages", "must be at least 1"));
        }
        if self.max_turns == Some(0) {
            entries.push(("max_turns", "must be at least 1"));
        }
        if self.timeout_secs == Some(0) {
            entries.push(("timeout_secs", "must be at least 1"));
        }
        entries
    }

    /// Build the combined condition.
    ///
    /// A single entry is returned as is; several are OR-ed; none yields a
    /// condition that never holds.
    pub fn to_condition(&self) -> Result<TerminationCondition, ConfigError> {
        let mut conditions = Vec::new();

        if !self.source_match.is_empty() {
            let sources = self
                .source_match
                .iter()
                .map(|s| SourceId::new(s.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            conditions.push(TerminationCondition::source_match(sources));
        }
        if let Some(text) = &self.text_mention {
            conditions.push(TerminationCondition::text_mention(text.as_str()));
        }
        if let Some(n) = self.max_messages {
            conditions.push(TerminationCondition::MaxMessages(n));
        }
        if let Some(n) = self.max_turns {
            conditions.push(TerminationCondition::MaxTurns(n));
        }
        if let Some(secs) = self.timeout_secs {
            conditions.push(TerminationCondition::Timeout(Duration::from_secs(secs)));
        }

        Ok(match conditions.len() {
            1 => conditions.remove(0),
            _ => TerminationCondition::Or(conditions),
        })
    }
}
