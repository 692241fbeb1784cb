//! Domain error types

use thiserror::Error;

/// Construction-time configuration errors.
///
/// Raised eagerly when a filter, participant roster or coordinator is built,
/// never while a conversation is running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Source identifier cannot be empty")]
    EmptySourceId,

    #[error("Message filter must allow at least one source")]
    EmptyAllowedSources,

    #[error("Per-source limit must be at least 1 (got {0})")]
    InvalidPerSourceLimit(usize),

    #[error("Source '{0}' appears in more than one filter rule")]
    DuplicateFilterSource(String),

    #[error("Participant '{0}' is registered more than once")]
    DuplicateParticipant(String),

    #[error("At least one participant is required")]
    NoParticipants,

    #[error("Maximum step count must be at least 1")]
    InvalidMaxSteps,
}

impl ConfigError {
    /// Check if this error was caused by a participant roster problem
    pub fn is_roster_error(&self) -> bool {
        matches!(
            self,
            ConfigError::DuplicateParticipant(_) | ConfigError::NoParticipants
        )
    }
}
