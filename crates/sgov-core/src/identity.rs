//! # Identity Newtypes
//!
//! `SchemaName` is the canonical identity of a governed schema: the file
//! stem of `schemas/<name>.json`. `ExampleKind` names the two example
//! partitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SgovError;

/// Canonical name of a schema, derived from its file stem.
///
/// Ordering is lexicographic, which keeps every report that iterates a
/// set of names deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    /// Validate and wrap a schema name.
    ///
    /// # Errors
    ///
    /// Returns [`SgovError::InvalidSchemaName`] if the name is empty,
    /// contains a path separator, or still carries a `.json` extension.
    pub fn new(name: impl Into<String>) -> Result<Self, SgovError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("must not be empty")
        } else if name.contains('/') || name.contains('\\') {
            Some("must not contain a path separator")
        } else if name.ends_with(".json") {
            Some("must be a file stem, not a file name")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(SgovError::InvalidSchemaName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `identifier` starts with this name.
    ///
    /// This is the naming-convention test shared by ownership resolution
    /// and coverage auditing.
    pub fn is_prefix_of(&self, identifier: &str) -> bool {
        identifier.starts_with(self.0.as_str())
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchemaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SchemaName {
    type Error = SgovError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SchemaName> for String {
    fn from(name: SchemaName) -> Self {
        name.0
    }
}

impl FromStr for SchemaName {
    type Err = SgovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Partition an example document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// Must validate against its schema.
    Positive,
    /// Must fail validation against its schema.
    Negative,
}

impl ExampleKind {
    /// Both partitions, positive first.
    pub fn all() -> &'static [ExampleKind] {
        &[Self::Positive, Self::Negative]
    }

    /// Directory-style identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    /// Whether an example of this kind is expected to validate.
    pub fn expects_valid(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExampleKind {
    type Err = SgovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(SgovError::UnknownExampleKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_name_accepts_stems() {
        let name = SchemaName::new("audio-transcription").unwrap();
        assert_eq!(name.as_str(), "audio-transcription");
        assert_eq!(name.to_string(), "audio-transcription");
    }

    #[test]
    fn schema_name_rejects_empty() {
        let err = SchemaName::new("").unwrap_err();
        assert!(matches!(err, SgovError::InvalidSchemaName { .. }));
    }

    #[test]
    fn schema_name_rejects_paths_and_extensions() {
        assert!(SchemaName::new("schemas/audio").is_err());
        assert!(SchemaName::new("a\\b").is_err());
        assert!(SchemaName::new("audio.json").is_err());
    }

    #[test]
    fn prefix_test_is_plain_starts_with() {
        let audio = SchemaName::new("audio").unwrap();
        assert!(audio.is_prefix_of("audio-transcription-bad-1"));
        assert!(audio.is_prefix_of("audio"));
        assert!(!audio.is_prefix_of("geo-audio"));
    }

    #[test]
    fn schema_names_order_lexicographically() {
        let mut names = vec![
            SchemaName::new("geolocation").unwrap(),
            SchemaName::new("audio-transcription").unwrap(),
            SchemaName::new("audio").unwrap(),
        ];
        names.sort();
        let ordered: Vec<&str> = names.iter().map(SchemaName::as_str).collect();
        assert_eq!(ordered, vec!["audio", "audio-transcription", "geolocation"]);
    }

    #[test]
    fn schema_name_serde_is_transparent_and_validated() {
        let name = SchemaName::new("geolocation").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"geolocation\"");
        let back: SchemaName = serde_json::from_str("\"geolocation\"").unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<SchemaName>("\"\"").is_err());
    }

    #[test]
    fn example_kind_roundtrips_through_str() {
        for kind in ExampleKind::all() {
            assert_eq!(kind.as_str().parse::<ExampleKind>().unwrap(), *kind);
        }
        assert!("neutral".parse::<ExampleKind>().is_err());
        assert!(ExampleKind::Positive.expects_valid());
        assert!(!ExampleKind::Negative.expects_valid());
    }
}
