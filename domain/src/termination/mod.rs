//! Termination domain.
//!
//! - [`condition::TerminationCondition`]: composable stop predicate
//! - [`condition::TerminationContext`]: what a predicate is evaluated against

pub mod condition;
