//! Rule-based participants
//!
//! Implementations of the [`Participant`](roundtable_application::Participant)
//! port that need no model backend: [`ScriptedParticipant`] replays fixed
//! replies and [`ExtractorParticipant`] answers with a regex match from the
//! messages it can see.

mod extractor;
mod scripted;

pub use extractor::ExtractorParticipant;
pub use scripted::ScriptedParticipant;
