//! # Resolve Subcommand
//!
//! Prints the schema that owns an example. Accepts a bare identifier
//! (`audio-bad-1`), a file name, or a path; directories and the `.json`
//! extension are stripped before resolution.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use sgov_schema::repository::file_stem;
use sgov_schema::Harness;

use crate::{OutputFormat, EXIT_FAILURES, EXIT_SUCCESS};

/// Arguments for `sgov resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Example identifier, file name, or path.
    #[arg(value_name = "EXAMPLE")]
    pub example: String,
}

impl ResolveArgs {
    /// The identifier resolution runs on.
    pub fn identifier(&self) -> &str {
        let path = Path::new(&self.example);
        if path.extension().is_some_and(|ext| ext == "json") {
            file_stem(path).unwrap_or(&self.example)
        } else {
            path.file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(&self.example)
        }
    }
}

/// Execute the resolve subcommand.
///
/// Returns 0 when a schema claims the example and 1 when none does.
pub fn run_resolve(
    harness: &Harness,
    args: &ResolveArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<u8> {
    let example = args.identifier();
    let resolved = harness.resolve(example);
    match format {
        OutputFormat::Text => match &resolved {
            Ok(schema) => writeln!(out, "{}", schema.name)?,
            Err(e) => writeln!(out, "RESOLVE {example}: {e}")?,
        },
        OutputFormat::Json => {
            let doc = match &resolved {
                Ok(schema) => json!({
                    "example": example,
                    "schema": schema.name,
                    "path": harness.repository().relative(&schema.path),
                }),
                Err(e) => json!({
                    "example": example,
                    "error": e.to_string(),
                }),
            };
            serde_json::to_writer_pretty(&mut *out, &doc).context("failed to serialize result")?;
            writeln!(out)?;
        }
    }
    Ok(if resolved.is_ok() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURES
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use sgov_schema::HarnessConfig;

    fn fixture_harness() -> Harness {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates
        let root = dir.join("sgov-schema/tests/fixtures/governed");
        Harness::load(&root, HarnessConfig::default()).unwrap()
    }

    fn args(example: &str) -> ResolveArgs {
        ResolveArgs {
            example: example.to_string(),
        }
    }

    #[test]
    fn identifier_strips_directory_and_extension() {
        assert_eq!(args("audio-bad-1").identifier(), "audio-bad-1");
        assert_eq!(args("audio-bad-1.json").identifier(), "audio-bad-1");
        assert_eq!(
            args("examples/negative/audio-transcription-bad-1.json").identifier(),
            "audio-transcription-bad-1"
        );
    }

    #[test]
    fn prints_longest_matching_schema() {
        let h = fixture_harness();
        let mut out = Vec::new();
        let code = run_resolve(
            &h,
            &args("examples/negative/audio-transcription-bad-1.json"),
            OutputFormat::Text,
            &mut out,
        )
        .unwrap();
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(String::from_utf8(out).unwrap(), "audio-transcription\n");
    }

    #[test]
    fn unmatched_example_exits_with_failure() {
        let h = fixture_harness();
        let mut out = Vec::new();
        let code = run_resolve(&h, &args("video-1"), OutputFormat::Text, &mut out).unwrap();
        assert_eq!(code, EXIT_FAILURES);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "RESOLVE video-1: could not find a matching schema for example 'video-1'\n"
        );
    }

    #[test]
    fn json_output_names_schema_file() {
        let h = fixture_harness();
        let mut out = Vec::new();
        run_resolve(&h, &args("geolocation-1"), OutputFormat::Json, &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["schema"], "geolocation");
        assert_eq!(doc["path"], "schemas/geolocation.json");
    }
}
