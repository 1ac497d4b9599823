//! # Error Types
//!
//! Errors shared by every sgov crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Identifier errors carry the offending input verbatim.
//! - Resolution errors name the example that nothing claims, so the
//!   orphaned or renamed file can be fixed directly.

use thiserror::Error;

use crate::identity::SchemaName;

/// Top-level error type for identifier parsing and construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SgovError {
    /// A schema name failed validation.
    #[error("invalid schema name {name:?}: {reason}")]
    InvalidSchemaName {
        /// The rejected input.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A style rule identifier did not match any known rule.
    #[error("unknown style rule: {0:?}")]
    UnknownRule(String),

    /// An example partition identifier was neither `positive` nor `negative`.
    #[error("unknown example kind: {0:?}")]
    UnknownExampleKind(String),
}

/// Failure to associate an example with its owning schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No known schema name is a prefix of the example identifier.
    #[error("could not find a matching schema for example '{example}'")]
    NoMatchingSchema {
        /// Example identifier (file stem) that was looked up.
        example: String,
    },

    /// The owning schema exists on disk but could not be loaded, so the
    /// example cannot be judged against it.
    #[error("example '{example}' belongs to schema '{schema}', which could not be loaded")]
    SchemaUnloadable {
        /// Example identifier (file stem) that was looked up.
        example: String,
        /// Name of the schema file that failed to load.
        schema: SchemaName,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_name_the_example() {
        let none = ResolutionError::NoMatchingSchema {
            example: "video-1".to_string(),
        };
        assert_eq!(
            none.to_string(),
            "could not find a matching schema for example 'video-1'"
        );

        let unloadable = ResolutionError::SchemaUnloadable {
            example: "audio-transcription-bad-1".to_string(),
            schema: SchemaName::new("audio-transcription").unwrap(),
        };
        assert_eq!(
            unloadable.to_string(),
            "example 'audio-transcription-bad-1' belongs to schema \
             'audio-transcription', which could not be loaded"
        );
    }
}
