//! # Example Coverage Audit
//!
//! Every schema must be exercised by at least one negative example: a
//! schema that nothing is expected to reject has never been shown to
//! reject anything. Coverage uses the same prefix convention as name
//! resolution but is a membership test, so any matching prefix counts.

use std::collections::BTreeSet;

use sgov_core::SchemaName;

/// Return the schema names not covered by any example name.
///
/// A schema is covered when at least one entry of `example_names` starts
/// with its name. Unlike resolution there is no longest-match tie-break:
/// an example named `audio-transcription-bad-1` covers both `audio` and
/// `audio-transcription`.
pub fn audit_coverage<'a, S>(
    schema_names: impl IntoIterator<Item = &'a SchemaName>,
    example_names: &[S],
) -> BTreeSet<SchemaName>
where
    S: AsRef<str>,
{
    schema_names
        .into_iter()
        .filter(|name| {
            !example_names
                .iter()
                .any(|example| name.is_prefix_of(example.as_ref()))
        })
        .cloned()
        .collect()
}
