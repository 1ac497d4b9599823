//! # sgov-cli — Schema Governance Command-Line Interface
//!
//! Provides the `sgov` binary. Argument parsing lives in `main.rs`; the
//! handlers here load the governed tree, run the requested checks, and
//! print the report.
//!
//! ## Subcommands
//!
//! - `sgov check`: every check.
//! - `sgov examples`: example conformance only.
//! - `sgov meta`: meta-schema conformance only.
//! - `sgov style [NAME...]`: style guide, optionally for named schemas.
//! - `sgov coverage`: example coverage only.
//! - `sgov resolve <EXAMPLE>`: print the schema that owns an example.
//!
//! ## Exit Codes
//!
//! `0` when every check passes, `1` when a check fails, `2` when the tree
//! or its configuration cannot be loaded at all.

pub mod check;
pub mod resolve;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use sgov_schema::{Harness, HarnessConfig, Report};

/// Every check passed.
pub const EXIT_SUCCESS: u8 = 0;
/// At least one check failed.
pub const EXIT_FAILURES: u8 = 1;
/// The run could not be carried out.
pub const EXIT_ERROR: u8 = 2;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per failure, then a summary line.
    #[default]
    Text,
    /// A single pretty-printed JSON document.
    Json,
}

/// Walk up from `start` to the first directory that has a `schemas/`
/// subdirectory.
pub fn resolve_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("schemas").is_dir())
        .map(Path::to_path_buf)
}

/// Load configuration and the governed tree under `root`.
///
/// # Errors
///
/// Fails if an explicit config file is missing or invalid, or if the
/// schemas directory cannot be read.
pub fn load_harness(root: &Path, config: Option<&Path>) -> Result<Harness> {
    let config = HarnessConfig::discover(root, config)
        .with_context(|| format!("failed to load configuration for {}", root.display()))?;
    tracing::debug!(
        schemas_dir = %config.schemas_dir.display(),
        default_draft = %config.default_draft,
        "configuration resolved"
    );
    let harness = Harness::load(root, config)
        .with_context(|| format!("failed to load governed tree at {}", root.display()))?;
    tracing::debug!(?harness, "harness ready");
    Ok(harness)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    passed: usize,
    #[serde(flatten)]
    report: &'a Report,
}

/// Print `report` and return the matching exit code.
pub fn emit_report(report: &Report, format: OutputFormat, out: &mut dyn Write) -> Result<u8> {
    match format {
        OutputFormat::Text => writeln!(out, "{report}")?,
        OutputFormat::Json => {
            let doc = JsonReport {
                success: report.is_success(),
                passed: report.passed(),
                report,
            };
            serde_json::to_writer_pretty(&mut *out, &doc).context("failed to serialize report")?;
            writeln!(out)?;
        }
    }
    Ok(if report.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURES
    })
}
