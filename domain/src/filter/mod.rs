//! Message filtering for wrapped participants.
//!
//! - [`spec::FilterSpec`]: validated set of per-source rules
//! - [`message_filter::MessageFilter`]: computes the visible subset of a transcript

pub mod message_filter;
pub mod spec;
