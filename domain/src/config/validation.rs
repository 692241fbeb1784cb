//! Structured configuration issues.
//!
//! Configuration loaders report every problem they find instead of stopping
//! at the first one. Each issue carries a severity: errors prevent a chat
//! from being assembled, warnings only change how it behaves.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No participants are configured.
    NoParticipants,
    /// A participant has an empty or padded name.
    InvalidName { index: usize },
    /// Two participants (or a participant and a filter wrapper) share a name.
    DuplicateName { name: String },
    /// An extractor pattern does not compile.
    InvalidPattern { participant: String, error: String },
    /// A scripted participant has no replies.
    EmptyReplies { participant: String },
    /// A filter admits no sources, or a rule count is zero.
    InvalidFilter { participant: String, reason: String },
    /// A filter admits a source nobody in the chat produces.
    UnknownFilterSource { participant: String, source: String },
    /// A termination rule waits for a source nobody in the chat produces.
    UnknownTerminationSource { source: String },
    /// A termination entry would end the run before any turn.
    InvalidTermination { entry: String, reason: String },
    /// Only the step bound ends the run.
    NoTermination,
    /// `max_steps` is zero.
    InvalidMaxSteps,
}

/// A detected configuration issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let issue = ConfigIssue::error(ConfigIssueCode::NoParticipants, "no participants");
        assert!(issue.is_error());

        let issue = ConfigIssue::warning(ConfigIssueCode::NoTermination, "never stops early");
        assert!(!issue.is_error());
        assert_eq!(issue.to_string(), "warning: never stops early");
    }
}
