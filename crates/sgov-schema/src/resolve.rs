//! # Name Resolution
//!
//! Associates an example document with the schema that owns it. The
//! association is a naming convention: an example's file stem begins with
//! its schema's name. The convention lives behind [`SchemaResolver`] so a
//! manifest-based mapping can replace it without touching the harness.

use sgov_core::{ResolutionError, SchemaName};

use crate::repository::Repository;

/// Maps an example identifier to the name of its owning schema.
pub trait SchemaResolver {
    /// Resolve `example` (a file stem) to a schema name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NoMatchingSchema`] when no schema claims
    /// the example.
    fn resolve(&self, example: &str) -> Result<&SchemaName, ResolutionError>;
}

/// Longest-prefix resolver over a fixed set of schema names.
///
/// When several names are prefixes of the example, the longest wins, so
/// `audio-transcription-bad-1` belongs to `audio-transcription` even
/// though `audio` is also a prefix.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    /// Longest first; equal lengths in name order.
    names: Vec<SchemaName>,
}

impl PrefixResolver {
    /// Build a resolver over the given schema names.
    pub fn new(names: impl IntoIterator<Item = SchemaName>) -> Self {
        let mut names: Vec<SchemaName> = names.into_iter().collect();
        names.sort_by(|a, b| {
            b.as_str()
                .len()
                .cmp(&a.as_str().len())
                .then_with(|| a.cmp(b))
        });
        names.dedup();
        Self { names }
    }

    /// Build a resolver over every schema file of a repository, including
    /// files that failed to load.
    pub fn from_repository(repository: &Repository) -> Self {
        Self::new(repository.declared_schema_names().into_iter().cloned())
    }

    /// Number of candidate names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no candidate names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SchemaResolver for PrefixResolver {
    fn resolve(&self, example: &str) -> Result<&SchemaName, ResolutionError> {
        self.names
            .iter()
            .find(|name| name.is_prefix_of(example))
            .ok_or_else(|| ResolutionError::NoMatchingSchema {
                example: example.to_string(),
            })
    }
}
