//! Source identifier value object

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Identifier of a message source (Value Object)
///
/// Every participant in a conversation has one, and so does the author of
/// the task that opens the conversation (`user` by default). Identifiers
/// are compared verbatim; surrounding whitespace is rejected at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Source used for task messages when none is configured
    pub const USER: &'static str = "user";

    /// Create a new source identifier
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() || id.trim() != id {
            return Err(ConfigError::EmptySourceId);
        }
        Ok(Self(id))
    }

    /// The default task author
    pub fn user() -> Self {
        Self(Self::USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SourceId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SourceId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SourceId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SourceId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_creation() {
        let id = SourceId::new("name_agent").unwrap();
        assert_eq!(id.as_str(), "name_agent");
        assert_eq!(id, "name_agent");
        assert_eq!(id.to_string(), "name_agent");
    }

    #[test]
    fn test_empty_source_rejected() {
        assert_eq!(SourceId::new(""), Err(ConfigError::EmptySourceId));
        assert_eq!(SourceId::new("   "), Err(ConfigError::EmptySourceId));
        assert_eq!(SourceId::new(" padded "), Err(ConfigError::EmptySourceId));
    }

    #[test]
    fn test_parse() {
        let id: SourceId = "age_agent".parse().unwrap();
        assert_eq!(id.as_str(), "age_agent");
        assert!("".parse::<SourceId>().is_err());
    }

    #[test]
    fn test_user_source() {
        assert_eq!(SourceId::user(), "user");
    }

    #[test]
    fn test_serde_validates() {
        let id: SourceId = serde_json::from_str("\"critic\"").unwrap();
        assert_eq!(id, "critic");
        assert!(serde_json::from_str::<SourceId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"critic\"");
    }
}
