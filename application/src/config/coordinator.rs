//! Coordinator parameters for the run loop.
//!
//! [`CoordinatorConfig`] groups the static parameters of a
//! [`RoundRobinCoordinator`](crate::use_cases::round_robin::RoundRobinCoordinator)
//! run. These are application-layer concerns, not domain policy.

use roundtable_domain::{ConfigError, SourceId};
use std::time::Duration;

/// Run loop control parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Maximum number of participant turns in one run.
    pub max_steps: usize,
    /// Per-turn time limit; expiry fails the turn.
    pub turn_timeout: Option<Duration>,
    /// Source attributed to task messages.
    pub task_source: SourceId,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_steps: Self::DEFAULT_MAX_STEPS,
            turn_timeout: None,
            task_source: SourceId::user(),
        }
    }
}

impl CoordinatorConfig {
    pub const DEFAULT_MAX_STEPS: usize = 10;

    // ==================== Builder Methods ====================

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_task_source(mut self, source: SourceId) -> Self {
        self.task_source = source;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.max_steps, 10);
        assert!(config.turn_timeout.is_none());
        assert_eq!(config.task_source, "user");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CoordinatorConfig::default()
            .with_max_steps(4)
            .with_turn_timeout(Some(Duration::from_secs(30)))
            .with_task_source("operator".parse().unwrap());
        assert_eq!(config.max_steps, 4);
        assert_eq!(config.turn_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.task_source, "operator");
    }

    #[test]
    fn test_zero_max_steps_is_invalid() {
        let config = CoordinatorConfig::default().with_max_steps(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxSteps));
    }
}
