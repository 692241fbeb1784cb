//! Participant configuration from TOML (`[[participants]]` array)
//!
//! Participants take turns in the order they appear in the file. A
//! participant with a `[participants.filter]` table is registered under a
//! filtering wrapper that only lets it see the configured sources.
//!
//! ```toml
//! [[participants]]
//! name = "age_agent"
//! kind = "extract"
//! pattern = "(\\d+)岁"
//! fallback = "无法确定年龄"
//!
//! [participants.filter]
//! wrapper_name = "filter_age_agent"
//! [[participants.filter.sources]]
//! source = "name_agent"
//! position = "last"
//! count = 1
//! ```

use roundtable_application::Attribution;
use roundtable_domain::{ConfigError, FilterSpec, Position, SourceId, SourceRule};
use serde::{Deserialize, Serialize};

/// How a configured participant produces its replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    /// Cycles through a fixed list of replies
    #[default]
    Scripted,
    /// Extracts a regex match from the visible messages
    Extract,
}

impl std::fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantKind::Scripted => write!(f, "scripted"),
            ParticipantKind::Extract => write!(f, "extract"),
        }
    }
}

/// Raw participant configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    /// Source name of the participant's messages
    pub name: String,
    pub kind: ParticipantKind,
    /// Short human-readable description
    pub description: Option<String>,
    /// Regex searched in the visible messages (extract)
    pub pattern: Option<String>,
    /// Reply template with `$1`-style capture references (extract)
    pub template: Option<String>,
    /// Reply when nothing matches (extract)
    pub fallback: Option<String>,
    /// Replies used in turn (scripted)
    pub replies: Vec<String>,
    /// Restrict what the participant sees
    pub filter: Option<FileFilterConfig>,
}

impl FileParticipantConfig {
    /// Name the coordinator registers this participant under
    pub fn registration_name(&self) -> String {
        match &self.filter {
            Some(filter) => filter.wrapper_name_for(&self.name),
            None => self.name.clone(),
        }
    }

    /// Source attributed to the messages this participant produces
    pub fn produced_source(&self) -> String {
        match &self.filter {
            Some(filter) if filter.attribution == Attribution::Wrapper => {
                filter.wrapper_name_for(&self.name)
            }
            _ => self.name.clone(),
        }
    }
}

/// Raw filter configuration from TOML (`[participants.filter]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilterConfig {
    /// Which name the wrapped participant's messages carry
    pub attribution: Attribution,
    /// Registration name of the wrapper (default: `filter_<name>`)
    pub wrapper_name: Option<String>,
    /// One rule per visible source
    pub sources: Vec<FileSourceRuleConfig>,
}

impl FileFilterConfig {
    pub fn wrapper_name_for(&self, inner: &str) -> String {
        self.wrapper_name
            .clone()
            .unwrap_or_else(|| format!("filter_{}", inner))
    }

    /// Convert to a domain [`FilterSpec`]
    pub fn to_filter_spec(&self) -> Result<FilterSpec, ConfigError> {
        let rules = self
            .sources
            .iter()
            .map(FileSourceRuleConfig::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        FilterSpec::from_rules(rules)
    }
}

/// Raw per-source rule from TOML (`[[participants.filter.sources]]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceRuleConfig {
    pub source: String,
    pub position: Position,
    pub count: usize,
}

impl Default for FileSourceRuleConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            position: Position::default(),
            count: FilterSpec::DEFAULT_PER_SOURCE_LIMIT,
        }
    }
}

impl FileSourceRuleConfig {
    pub fn to_rule(&self) -> Result<SourceRule, ConfigError> {
        SourceRule::new(SourceId::new(self.source.as_str())?, self.position, self.count)
    }
}
