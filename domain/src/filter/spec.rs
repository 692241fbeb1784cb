//! Filter specification: which sources a wrapped participant may see
//!
//! A [`FilterSpec`] is a list of [`SourceRule`]s, one per allowed source.
//! The common case is built with [`FilterSpec::new`], which keeps the most
//! recent `per_source_limit` messages of every allowed source:
//!
//! ```
//! use roundtable_domain::{FilterSpec, SourceId};
//!
//! let name_agent: SourceId = "name_agent".parse().unwrap();
//! let spec = FilterSpec::new([name_agent.clone()], 1).unwrap();
//! assert!(spec.allows(&name_agent));
//! assert!(!spec.allows(&SourceId::user()));
//! ```

use crate::core::error::ConfigError;
use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroUsize;

/// Which end of a source's history a rule keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// The earliest messages
    First,
    /// The most recent messages
    #[default]
    Last,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::First => "first",
            Position::Last => "last",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Position::First),
            "last" => Ok(Position::Last),
            _ => Err(format!("Unknown position: {}. Valid: first, last", s)),
        }
    }
}

/// Admits up to `count` messages of one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRule {
    source: SourceId,
    position: Position,
    count: NonZeroUsize,
}

impl SourceRule {
    pub fn new(source: SourceId, position: Position, count: usize) -> Result<Self, ConfigError> {
        let count = NonZeroUsize::new(count).ok_or(ConfigError::InvalidPerSourceLimit(count))?;
        Ok(Self {
            source,
            position,
            count,
        })
    }

    /// Keep the `count` most recent messages of `source`
    pub fn last(source: SourceId, count: usize) -> Result<Self, ConfigError> {
        Self::new(source, Position::Last, count)
    }

    /// Keep the `count` earliest messages of `source`
    pub fn first(source: SourceId, count: usize) -> Result<Self, ConfigError> {
        Self::new(source, Position::First, count)
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

/// Defines which messages a filtered participant may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    rules: Vec<SourceRule>,
}

impl FilterSpec {
    pub const DEFAULT_PER_SOURCE_LIMIT: usize = 1;

    /// Keep the `per_source_limit` most recent messages of every allowed source.
    ///
    /// Repeated sources collapse into one rule. Fails if no source is given or
    /// the limit is zero.
    pub fn new(
        allowed_sources: impl IntoIterator<Item = SourceId>,
        per_source_limit: usize,
    ) -> Result<Self, ConfigError> {
        let sources: BTreeSet<SourceId> = allowed_sources.into_iter().collect();
        if sources.is_empty() {
            return Err(ConfigError::EmptyAllowedSources);
        }

        let rules = sources
            .into_iter()
            .map(|source| SourceRule::last(source, per_source_limit))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Keep only the latest message of every allowed source
    pub fn latest_from(
        allowed_sources: impl IntoIterator<Item = SourceId>,
    ) -> Result<Self, ConfigError> {
        Self::new(allowed_sources, Self::DEFAULT_PER_SOURCE_LIMIT)
    }

    /// Build from explicit per-source rules; each source may appear once
    pub fn from_rules(rules: Vec<SourceRule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyAllowedSources);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.source()) {
                return Err(ConfigError::DuplicateFilterSource(rule.source().to_string()));
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[SourceRule] {
        &self.rules
    }

    pub fn allowed_sources(&self) -> impl Iterator<Item = &SourceId> {
        self.rules.iter().map(|r| r.source())
    }

    pub fn allows(&self, source: &SourceId) -> bool {
        self.rule_for(source).is_some()
    }

    pub fn rule_for(&self, source: &SourceId) -> Option<&SourceRule> {
        self.rules.iter().find(|r| r.source() == source)
    }

    /// Human-readable summary, e.g. `last 1 of name_agent`
    pub fn description(&self) -> String {
        self.rules
            .iter()
            .map(|r| format!("{} {} of {}", r.position(), r.count(), r.source()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
