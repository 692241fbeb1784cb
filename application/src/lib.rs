//! Application layer for roundtable
//!
//! This crate contains the participant port, the filtering decorator and the
//! round-robin coordination use case. It depends only on the domain layer.

pub mod config;
pub mod participants;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CoordinatorConfig;
pub use participants::{Attribution, FilteredParticipant};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    participant::{Participant, TurnError},
    progress::{ChatProgressNotifier, NoProgress},
};
pub use use_cases::round_robin::{CoordinatorError, RoundRobinCoordinator, StepOutcome};
