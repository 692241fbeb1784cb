//! Presentation-level configuration
//!
//! Resolved settings for output formatting and progress display. The binary
//! builds this from the config file and command-line flags.

use roundtable_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// How the finished run is rendered
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Append per-source counts and timing to full output
    pub stats: bool,
    /// Show live progress while the run is going
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
            stats: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Whether messages are streamed to the terminal as they arrive.
    ///
    /// Only full output streams; transcript and JSON output stay clean for
    /// piping.
    pub fn streams_messages(&self) -> bool {
        self.show_progress && self.format == OutputFormat::Full
    }

    /// Force colors off process-wide when disabled
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
