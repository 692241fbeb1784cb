//! Core domain concepts shared across all subdomains.
//!
//! - [`source::SourceId`]: identifier of a participant (or the task author)
//! - [`error::ConfigError`]: construction-time errors

pub mod error;
pub mod source;
