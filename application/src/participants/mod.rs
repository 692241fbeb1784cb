//! Participant decorators built on the [`Participant`](crate::ports::participant::Participant) port.

pub mod filtered;

pub use filtered::{Attribution, FilteredParticipant};
