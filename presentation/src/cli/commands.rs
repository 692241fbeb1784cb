//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Transcript, status and statistics
    Full,
    /// Only the transcript lines
    Transcript,
    /// JSON output
    Json,
}

impl From<OutputFormat> for roundtable_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => roundtable_domain::OutputFormat::Full,
            OutputFormat::Transcript => roundtable_domain::OutputFormat::Transcript,
            OutputFormat::Json => roundtable_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Round-robin group chat - participants take turns on a shared task")]
#[command(long_about = r#"
Roundtable runs a round-robin group chat: the configured participants take
turns in order, each one seeing the shared transcript (or only what its
message filter lets through), until a termination condition holds or the
step bound is reached.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./roundtable.toml   Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "我叫张伟，今年18岁"
  roundtable --config review.toml --max-steps 6 -o transcript "Write a haiku"
  echo "我叫张伟" | roundtable -o json
"#)]
pub struct Cli {
    /// The task that opens the conversation (read from stdin when omitted)
    pub task: Option<String>,

    /// Output format [default: from config, else full]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Override the maximum number of turns
    #[arg(long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for daily rolling diagnostic logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write conversation events as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}
