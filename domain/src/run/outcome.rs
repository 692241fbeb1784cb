//! Result of a finished run

use crate::conversation::message::Message;
use crate::conversation::transcript::Transcript;
use crate::core::source::SourceId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunStatus {
    /// The termination condition held
    Completed { reason: String },
    /// The step bound was hit first; not an error
    TerminationNotReached { steps: usize },
    /// Cancelled between turns
    Cancelled,
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed { .. })
    }

    pub fn description(&self) -> String {
        match self {
            RunStatus::Completed { reason } => reason.clone(),
            RunStatus::TerminationNotReached { steps } => format!(
                "Termination condition not reached after {} steps",
                steps
            ),
            RunStatus::Cancelled => "Run cancelled".to_string(),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Transcript and statistics of one conversation
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub transcript: Transcript,
    /// Number of task messages at the head of the transcript
    pub task_len: usize,
    /// Participant turns taken
    pub steps: usize,
    pub elapsed_ms: u64,
}

impl RunOutcome {
    /// Messages produced by participants
    pub fn replies(&self) -> &[Message] {
        self.transcript.since(self.task_len)
    }

    /// Number of messages each source contributed, task included
    pub fn message_counts(&self) -> BTreeMap<SourceId, usize> {
        let mut counts = BTreeMap::new();
        for message in &self.transcript {
            *counts.entry(message.source().clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Last message produced by a participant, if any
    pub fn final_reply(&self) -> Option<&Message> {
        self.replies().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::MessageDraft;

    fn outcome() -> RunOutcome {
        let mut transcript = Transcript::new();
        for (source, content) in [
            ("user", "我叫张伟，今年18岁"),
            ("name_agent", "张伟"),
            ("age_agent", "无法确定年龄"),
        ] {
            transcript.append(MessageDraft::new(source.parse().unwrap(), content));
        }
        RunOutcome {
            status: RunStatus::Completed {
                reason: "'age_agent' answered".to_string(),
            },
            transcript,
            task_len: 1,
            steps: 2,
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_replies_skip_task() {
        let outcome = outcome();
        assert_eq!(outcome.replies().len(), 2);
        assert_eq!(outcome.final_reply().unwrap().content(), "无法确定年龄");
    }

    #[test]
    fn test_message_counts() {
        let counts = outcome().message_counts();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&"user".parse::<SourceId>().unwrap()], 1);
    }

    #[test]
    fn test_status_description() {
        assert_eq!(
            RunStatus::TerminationNotReached { steps: 10 }.to_string(),
            "Termination condition not reached after 10 steps"
        );
        assert!(!RunStatus::Cancelled.is_completed());
        assert!(outcome().status.is_completed());
    }

    #[test]
    fn test_serialize_status_tag() {
        let json = serde_json::to_value(&outcome()).unwrap();
        assert_eq!(json["status"]["status"], "completed");
        assert_eq!(json["transcript"].as_array().unwrap().len(), 3);
    }
}
