//! Console output formatter for run outcomes

use crate::output::formatter::OutputFormatter;
use colored::{Color, Colorize};
use roundtable_domain::{Message, RunOutcome, RunStatus, SourceId, Transcript};

const SOURCE_COLORS: [Color; 5] = [
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Green,
    Color::BrightRed,
];

/// Formats run outcomes for console display
pub struct ConsoleFormatter {
    show_transcript: bool,
    show_stats: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self {
            show_transcript: true,
            show_stats: true,
        }
    }

    /// Leave the transcript out of full output (it was streamed already)
    pub fn without_transcript(mut self) -> Self {
        self.show_transcript = false;
        self
    }

    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Format a run that stopped on a participant failure
    pub fn format_failure(&self, transcript: &Transcript, error: &dyn std::fmt::Display) -> String {
        let mut output = String::new();
        if self.show_transcript && !transcript.is_empty() {
            output.push_str(&Self::section_header("Partial Transcript"));
            for message in transcript {
                output.push_str(&Self::message_block(message));
            }
        }
        output.push_str(&format!("\n{} {}\n", "Failed:".red().bold(), error));
        output
    }

    /// A message as a labelled block, as printed while streaming
    pub fn message_block(message: &Message) -> String {
        format!(
            "\n{}\n{}\n",
            format!("── {} ──", message.source())
                .color(Self::source_color(message.source()))
                .bold(),
            message.content()
        )
    }

    /// Stable color per source; task author in cyan
    pub fn source_color(source: &SourceId) -> Color {
        if source.as_str() == SourceId::USER {
            return Color::Cyan;
        }
        let hash = source
            .as_str()
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        SOURCE_COLORS[hash % SOURCE_COLORS.len()]
    }

    pub fn status_line(status: &RunStatus) -> String {
        match status {
            RunStatus::Completed { reason } => {
                format!("{} {}", "Completed:".green().bold(), reason)
            }
            RunStatus::TerminationNotReached { .. } => {
                format!("{} {}", "Stopped:".yellow().bold(), status)
            }
            RunStatus::Cancelled => format!("{} {}", "Cancelled:".red().bold(), status),
        }
    }

    fn stats(outcome: &RunOutcome) -> String {
        let mut output = Self::section_header("Statistics");
        output.push_str(&format!("  {:<10} {}\n", "Turns:", outcome.steps));
        output.push_str(&format!(
            "  {:<10} {}\n",
            "Messages:",
            outcome.transcript.len()
        ));
        for (source, count) in outcome.message_counts() {
            output.push_str(&format!("    {:<20} {}\n", source.as_str(), count));
        }
        output.push_str(&format!(
            "  {:<10} {:.2}s\n",
            "Duration:",
            outcome.elapsed_ms as f64 / 1000.0
        ));
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent continuation lines of a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, outcome: &RunOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Roundtable Results"));
        output.push('\n');

        for task in &outcome.transcript.messages()[..outcome.task_len] {
            output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task.content()));
        }

        if self.show_transcript {
            output.push_str(&Self::section_header("Transcript"));
            for message in outcome.replies() {
                output.push_str(&Self::message_block(message));
            }
        }

        output.push('\n');
        output.push_str(&Self::status_line(&outcome.status));
        output.push('\n');

        if self.show_stats {
            output.push_str(&Self::stats(outcome));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_transcript(&self, outcome: &RunOutcome) -> String {
        let mut output = String::new();
        for message in &outcome.transcript {
            output.push_str(&format!(
                "{}: {}\n",
                message.source(),
                Self::indent(message.content(), "  ")
            ));
        }
        output
    }

    fn format_json(&self, outcome: &RunOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }
}
