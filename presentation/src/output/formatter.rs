//! Output formatter trait

use roundtable_domain::{OutputFormat, RunOutcome};

/// Trait for formatting run outcomes
pub trait OutputFormatter {
    /// Format the transcript with status and statistics
    fn format_full(&self, outcome: &RunOutcome) -> String;

    /// Format the transcript lines only
    fn format_transcript(&self, outcome: &RunOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &RunOutcome) -> String;

    /// Format according to the selected output format
    fn render(&self, outcome: &RunOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(outcome),
            OutputFormat::Transcript => self.format_transcript(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
