//! Application-level configuration.
//!
//! - [`CoordinatorConfig`]: run loop control (step bound, turn timeout, task source)

pub mod coordinator;

pub use coordinator::CoordinatorConfig;
