//! Live progress display while a run is going

pub mod reporter;
