//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished run is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Transcript, status and statistics (default)
    #[default]
    Full,
    /// Only the transcript lines
    Transcript,
    /// JSON output
    Json,
}
