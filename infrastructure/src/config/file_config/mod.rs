//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod chat;
mod logging;
mod output;
mod participants;

pub use chat::{FileChatConfig, FileTerminationConfig};
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use participants::{
    FileFilterConfig, FileParticipantConfig, FileSourceRuleConfig, ParticipantKind,
};

use roundtable_domain::{ConfigIssue, ConfigIssueCode, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Run loop and termination settings
    pub chat: FileChatConfig,
    /// Participants in turn order
    pub participants: Vec<FileParticipantConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation and diagnostic log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The roster: at least one participant, valid and unique names
    /// 2. Each participant's kind-specific settings and filter
    /// 3. Sources referenced by filters and termination rules
    /// 4. Termination entries that would stop every run at once
    /// 5. The run loop bound
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Roster
        if self.participants.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoParticipants,
                "no participants configured; add at least one [[participants]] entry",
            ));
        }

        let mut names = HashSet::new();
        for (index, participant) in self.participants.iter().enumerate() {
            if SourceId::new(participant.name.as_str()).is_err() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidName { index },
                    format!(
                        "participants[{}]: name '{}' is empty or has surrounding whitespace",
                        index, participant.name
                    ),
                ));
                continue;
            }

            let mut claimed = vec![participant.name.clone()];
            if participant.filter.is_some() {
                claimed.push(participant.registration_name());
            }
            for name in claimed {
                if !names.insert(name.clone()) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::DuplicateName { name: name.clone() },
                        format!("participant name '{}' is used more than once", name),
                    ));
                }
            }
        }

        // 2. Per-participant settings
        for participant in &self.participants {
            issues.extend(Self::validate_participant(participant));
        }

        // 3. Referenced sources
        let produced: HashSet<String> = self
            .participants
            .iter()
            .map(FileParticipantConfig::produced_source)
            .chain(std::iter::once(self.chat.task_source.clone()))
            .collect();

        for participant in &self.participants {
            let Some(filter) = &participant.filter else {
                continue;
            };
            for rule in &filter.sources {
                if !rule.source.is_empty() && !produced.contains(&rule.source) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownFilterSource {
                            participant: participant.name.clone(),
                            source: rule.source.clone(),
                        },
                        format!(
                            "participant '{}': filter source '{}' is not produced by anyone in this chat",
                            participant.name, rule.source
                        ),
                    ));
                }
            }
        }

        for source in &self.chat.termination.source_match {
            if !produced.contains(source) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownTerminationSource {
                        source: source.clone(),
                    },
                    format!(
                        "chat.termination.source_match: '{}' is not produced by anyone in this chat",
                        source
                    ),
                ));
            }
        }

        // 4. Termination entries
        for (entry, reason) in self.chat.termination.degenerate_entries() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidTermination {
                    entry: entry.to_string(),
                    reason: reason.to_string(),
                },
                format!("chat.termination.{}: {}", entry, reason),
            ));
        }

        if self.chat.termination.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoTermination,
                format!(
                    "no [chat.termination] entries; runs end after max_steps ({}) turns",
                    self.chat.max_steps
                ),
            ));
        }

        // 5. Run loop bound
        if self.chat.max_steps == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidMaxSteps,
                "chat.max_steps must be at least 1",
            ));
        }

        issues
    }

    /// Whether `validate` reports any error-severity issue
    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(ConfigIssue::is_error)
    }

    fn validate_participant(participant: &FileParticipantConfig) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let name = &participant.name;

        match participant.kind {
            ParticipantKind::Extract => match participant.pattern.as_deref() {
                None => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidPattern {
                        participant: name.clone(),
                        error: "missing".to_string(),
                    },
                    format!("participant '{}': extract participants need a pattern", name),
                )),
                Some(pattern) => {
                    if let Err(e) = regex::Regex::new(pattern) {
                        issues.push(ConfigIssue::error(
                            ConfigIssueCode::InvalidPattern {
                                participant: name.clone(),
                                error: e.to_string(),
                            },
                            format!("participant '{}': invalid pattern: {}", name, e),
                        ));
                    }
                }
            },
            ParticipantKind::Scripted => {
                if participant.replies.is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::EmptyReplies {
                            participant: name.clone(),
                        },
                        format!("participant '{}': scripted participants need replies", name),
                    ));
                }
            }
        }

        if let Some(filter) = &participant.filter
            && let Err(e) = filter.to_filter_spec()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidFilter {
                    participant: name.clone(),
                    reason: e.to_string(),
                },
                format!("participant '{}': invalid filter: {}", name, e),
            ));
        }

        issues
    }
}
