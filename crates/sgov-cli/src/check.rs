//! # Check Subcommands
//!
//! `check`, `examples`, `meta`, `style`, and `coverage` all run some subset
//! of the harness and print one report. Files that failed to load are
//! reported by every subset, since a broken file hides whatever that
//! subset would have found in it.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use sgov_core::SchemaName;
use sgov_schema::{Harness, Report};

use crate::{emit_report, OutputFormat};

/// Arguments for `sgov style`.
#[derive(Args, Debug, Default)]
pub struct StyleArgs {
    /// Schemas to check, by name. All schemas when omitted.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

impl StyleArgs {
    /// The scope these arguments select.
    ///
    /// # Errors
    ///
    /// Fails if a name is not a valid schema name.
    pub fn scope(&self) -> Result<Scope> {
        if self.names.is_empty() {
            return Ok(Scope::Style(None));
        }
        let names = self
            .names
            .iter()
            .map(|n| SchemaName::new(n.as_str()).with_context(|| format!("invalid schema name {n:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Scope::Style(Some(names)))
    }
}

/// Which checks to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every check.
    All,
    /// Example conformance.
    Examples,
    /// Meta-schema conformance.
    Meta,
    /// Style guide, for the named schemas or all of them.
    Style(Option<Vec<SchemaName>>),
    /// Example coverage.
    Coverage,
}

/// Run the checks of `scope`.
pub fn run_scope(harness: &Harness, scope: &Scope) -> Report {
    let phase = match scope {
        Scope::All => return harness.run_all(),
        Scope::Examples => harness.check_examples(),
        Scope::Meta => harness.check_meta(),
        Scope::Style(only) => harness.check_style(only.as_deref()),
        Scope::Coverage => harness.check_coverage(),
    };
    let mut report = harness.check_load();
    report.merge(phase);
    report
}

/// Execute a check subcommand and print its report.
///
/// Returns the exit code: 0 when every check passed, 1 otherwise.
pub fn run_check(
    harness: &Harness,
    scope: &Scope,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<u8> {
    tracing::debug!(?scope, "running checks");
    let report = run_scope(harness, scope);
    emit_report(&report, format, out)
}
