//! Chat assembly from configuration
//!
//! Turns a validated [`FileConfig`] into a ready-to-run
//! [`RoundRobinCoordinator`]: every `[[participants]]` entry becomes a
//! rule-based participant, wrapped in a [`FilteredParticipant`] when it has a
//! filter, registered in file order.

use crate::config::{FileConfig, FileParticipantConfig, ParticipantKind};
use crate::participants::{ExtractorParticipant, ScriptedParticipant};
use regex::Regex;
use roundtable_application::{FilteredParticipant, Participant, RoundRobinCoordinator};
use roundtable_domain::{ConfigError, ConfigIssue, SourceId};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building a chat from configuration
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Configuration has {} error(s):\n{}", .0.len(), format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error("Participant '{participant}' needs a pattern")]
    MissingPattern { participant: String },

    #[error("Participant '{participant}' has an invalid pattern: {source}")]
    InvalidPattern {
        participant: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a coordinator from configuration.
///
/// Error-severity issues from [`FileConfig::validate`] abort assembly;
/// warnings are logged and otherwise ignored.
pub fn build_coordinator(config: &FileConfig) -> Result<RoundRobinCoordinator, AssemblyError> {
    let (errors, warnings): (Vec<_>, Vec<_>) =
        config.validate().into_iter().partition(ConfigIssue::is_error);
    for issue in &warnings {
        warn!("{}", issue.message);
    }
    if !errors.is_empty() {
        return Err(AssemblyError::Invalid(errors));
    }

    let participants = config
        .participants
        .iter()
        .map(build_participant)
        .collect::<Result<Vec<_>, _>>()?;
    let termination = config.chat.termination.to_condition()?;
    debug!("Assembled {} participants, stop on {}", participants.len(), termination);

    let coordinator = RoundRobinCoordinator::new(participants, termination)?
        .with_config(config.chat.to_coordinator_config()?)?;
    Ok(coordinator)
}

/// Build one participant, wrapping it in a filter when configured
pub fn build_participant(
    config: &FileParticipantConfig,
) -> Result<Box<dyn Participant>, AssemblyError> {
    let name = SourceId::new(config.name.as_str())?;
    let description = config.description.clone().unwrap_or_default();

    let inner: Box<dyn Participant> = match config.kind {
        ParticipantKind::Scripted => Box::new(
            ScriptedParticipant::new(name, config.replies.iter().cloned())
                .with_description(description),
        ),
        ParticipantKind::Extract => {
            let pattern = config
                .pattern
                .as_deref()
                .ok_or_else(|| AssemblyError::MissingPattern {
                    participant: config.name.clone(),
                })?;
            let regex = Regex::new(pattern).map_err(|source| AssemblyError::InvalidPattern {
                participant: config.name.clone(),
                source,
            })?;

            let mut participant =
                ExtractorParticipant::new(name, regex).with_description(description);
            if let Some(template) = &config.template {
                participant = participant.with_template(template.as_str());
            }
            if let Some(fallback) = &config.fallback {
                participant = participant.with_fallback(fallback.as_str());
            }
            Box::new(participant)
        }
    };

    let Some(filter) = &config.filter else {
        return Ok(inner);
    };

    let spec = filter.to_filter_spec()?;
    let wrapper_name = SourceId::new(config.registration_name())?;
    debug!("{} sees {} as {}", config.name, spec, wrapper_name);
    Ok(Box::new(
        FilteredParticipant::new(wrapper_name, inner, spec).with_attribution(filter.attribution),
    ))
}
