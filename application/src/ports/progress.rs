//! Progress notification port
//!
//! Defines the interface for reporting progress while a conversation runs.

use crate::ports::participant::TurnError;
use roundtable_domain::{Message, RunStatus, SourceId};

/// Callback for progress updates during a round-robin run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console stream, spinner, etc.)
pub trait ChatProgressNotifier: Send + Sync {
    /// Called once the task is appended, before the first turn
    fn on_run_start(&self, _participants: &[SourceId]) {}

    /// Called when a participant's turn starts (`step` is 1-based)
    fn on_turn_start(&self, participant: &SourceId, step: usize);

    /// Called for every message appended to the transcript, task included
    fn on_message(&self, message: &Message);

    /// Called when a participant's turn completes successfully
    fn on_turn_complete(&self, participant: &SourceId, step: usize, produced: usize);

    /// Called when a participant's turn fails
    fn on_turn_failed(&self, _participant: &SourceId, _error: &TurnError) {}

    /// Called when the run reaches a terminal status
    fn on_run_complete(&self, _status: &RunStatus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ChatProgressNotifier for NoProgress {
    fn on_turn_start(&self, _participant: &SourceId, _step: usize) {}
    fn on_message(&self, _message: &Message) {}
    fn on_turn_complete(&self, _participant: &SourceId, _step: usize, _produced: usize) {}
}
