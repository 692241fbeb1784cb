//! Progress reporting for round-robin runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtable_application::{ChatProgressNotifier, TurnError};
use roundtable_domain::{Message, RunStatus, SourceId};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner per turn, streaming messages above it
pub struct ProgressReporter {
    multi: MultiProgress,
    turn_bar: Mutex<Option<ProgressBar>>,
    max_steps: usize,
    stream_messages: bool,
}

impl ProgressReporter {
    pub fn new(max_steps: usize) -> Self {
        Self {
            multi: MultiProgress::new(),
            turn_bar: Mutex::new(None),
            max_steps,
            stream_messages: true,
        }
    }

    /// Only show the spinner; messages are printed after the run
    pub fn without_messages(mut self) -> Self {
        self.stream_messages = false;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.dim} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.turn_bar.lock().ok().and_then(|mut bar| bar.take())
    }
}

impl ChatProgressNotifier for ProgressReporter {
    fn on_run_start(&self, participants: &[SourceId]) {
        let names: Vec<&str> = participants.iter().map(|p| p.as_str()).collect();
        let _ = self.multi.println(format!(
            "{} {}",
            "Participants:".cyan().bold(),
            names.join(" -> ")
        ));
    }

    fn on_turn_start(&self, participant: &SourceId, step: usize) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("[{}/{}]", step, self.max_steps));
        pb.set_message(format!("{} is taking its turn...", participant));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bar) = self.turn_bar.lock()
            && let Some(previous) = bar.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_message(&self, message: &Message) {
        if self.stream_messages {
            let _ = self
                .multi
                .println(ConsoleFormatter::message_block(message).trim_end());
        }
    }

    fn on_turn_complete(&self, _participant: &SourceId, _step: usize, _produced: usize) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }
    }

    fn on_turn_failed(&self, participant: &SourceId, error: &TurnError) {
        if let Some(pb) = self.take_bar() {
            pb.abandon_with_message(format!("{} {} failed: {}", "x".red(), participant, error));
        }
    }

    fn on_run_complete(&self, status: &RunStatus) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }
        if self.stream_messages {
            let _ = self
                .multi
                .println(format!("\n{}", ConsoleFormatter::status_line(status)));
        }
    }
}

/// Plain line-based progress for when stderr is not a terminal
///
/// indicatif draws nothing without a terminal, so piped or redirected runs
/// use this reporter instead.
pub struct SimpleProgress {
    max_steps: usize,
    stream_messages: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl SimpleProgress {
    /// Report to stderr
    pub fn new(max_steps: usize) -> Self {
        Self::with_writer(max_steps, std::io::stderr())
    }

    pub fn with_writer(max_steps: usize, out: impl Write + Send + 'static) -> Self {
        Self {
            max_steps,
            stream_messages: true,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Only report turns; messages are printed after the run
    pub fn without_messages(mut self) -> Self {
        self.stream_messages = false;
        self
    }

    fn line(&self, text: impl std::fmt::Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", text);
        }
    }
}

impl ChatProgressNotifier for SimpleProgress {
    fn on_run_start(&self, participants: &[SourceId]) {
        let names: Vec<&str> = participants.iter().map(|p| p.as_str()).collect();
        self.line(format!("{} {}", "Participants:".cyan().bold(), names.join(" -> ")));
    }

    fn on_turn_start(&self, participant: &SourceId, step: usize) {
        self.line(format!(
            "{} [{}/{}] {}",
            "->".cyan(),
            step,
            self.max_steps,
            participant.as_str().bold()
        ));
    }

    fn on_message(&self, message: &Message) {
        if self.stream_messages {
            self.line(ConsoleFormatter::message_block(message).trim_end());
        }
    }

    fn on_turn_complete(&self, participant: &SourceId, _step: usize, produced: usize) {
        self.line(format!("  {} {} ({} messages)", "v".green(), participant, produced));
    }

    fn on_turn_failed(&self, participant: &SourceId, error: &TurnError) {
        self.line(format!("  {} {} ({})", "x".red(), participant, error));
    }

    fn on_run_complete(&self, status: &RunStatus) {
        if self.stream_messages {
            self.line(format!("\n{}", ConsoleFormatter::status_line(status)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use std::sync::Arc;

    /// Writer whose output stays readable after it is boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn hidden_reporter() -> ProgressReporter {
        let reporter = ProgressReporter::new(10);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    #[test]
    fn test_turn_bar_lifecycle() {
        let reporter = hidden_reporter();
        let critic: SourceId = "critic".parse().unwrap();

        reporter.on_turn_start(&critic, 1);
        assert!(reporter.turn_bar.lock().unwrap().is_some());

        reporter.on_turn_complete(&critic, 1, 1);
        assert!(reporter.turn_bar.lock().unwrap().is_none());

        reporter.on_turn_start(&critic, 2);
        reporter.on_turn_failed(&critic, &TurnError::Failed("boom".to_string()));
        assert!(reporter.turn_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_new_turn_replaces_stale_bar() {
        let reporter = hidden_reporter().without_messages();
        let a: SourceId = "a".parse().unwrap();

        reporter.on_turn_start(&a, 1);
        reporter.on_turn_start(&a, 2);
        reporter.on_run_complete(&RunStatus::Cancelled);
        assert!(reporter.turn_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_simple_progress_writes_plain_lines() {
        colored::control::set_override(false);
        let buffer = SharedBuffer::default();
        let progress = SimpleProgress::with_writer(2, buffer.clone());
        let critic: SourceId = "critic".parse().unwrap();

        progress.on_turn_start(&critic, 1);
        progress.on_turn_complete(&critic, 1, 1);
        progress.on_turn_failed(&critic, &TurnError::Failed("boom".to_string()));

        assert_eq!(
            buffer.contents(),
            "-> [1/2] critic\n  v critic (1 messages)\n  x critic (Turn failed: boom)\n"
        );
    }

    #[test]
    fn test_simple_progress_without_messages_skips_content() {
        colored::control::set_override(false);
        let buffer = SharedBuffer::default();
        let progress = SimpleProgress::with_writer(2, buffer.clone()).without_messages();

        progress.on_run_complete(&RunStatus::Cancelled);
        assert!(buffer.contents().is_empty());

        let streaming = SimpleProgress::with_writer(2, buffer.clone());
        streaming.on_run_complete(&RunStatus::Cancelled);
        assert!(buffer.contents().contains("Cancelled:"));
    }
}
