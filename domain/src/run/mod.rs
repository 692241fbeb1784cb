//! Run lifecycle.
//!
//! - [`state::CoordinatorState`]: `Running` with a cursor, or `Terminated`
//! - [`outcome::RunOutcome`]: transcript and status of a finished run

pub mod outcome;
pub mod state;
