//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, rule-based
//! participants, chat assembly and the JSONL conversation log.

pub mod assembly;
pub mod config;
pub mod logging;
pub mod participants;

// Re-export commonly used types
pub use assembly::{AssemblyError, build_coordinator, build_participant};
pub use config::{
    ConfigLoader, FileChatConfig, FileConfig, FileFilterConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileParticipantConfig, FileTerminationConfig,
    ParticipantKind,
};
pub use logging::JsonlConversationLogger;
pub use participants::{ExtractorParticipant, ScriptedParticipant};
