//! # Check Report
//!
//! A run is a batch of independent assertions. Each one either passes or
//! contributes a [`Failure`]; nothing short-circuits. The report keeps
//! failures in the order the checks ran, which is deterministic for a
//! given tree.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use sgov_core::{ExampleKind, SchemaName};

use crate::style::Violation;

/// Why an example's validity did not match its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mismatch {
    /// A positive example failed validation.
    UnexpectedlyInvalid,
    /// A negative example passed validation.
    UnexpectedlyValid,
    /// The owning schema could not be compiled, so the example could not
    /// be judged either way.
    SchemaUnusable,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnexpectedlyInvalid => "expected to validate but failed",
            Self::UnexpectedlyValid => "expected to fail but validated",
            Self::SchemaUnusable => "schema could not be compiled",
        })
    }
}

/// One reportable failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "failure", rename_all = "kebab-case")]
pub enum Failure {
    /// A schema or example file could not be read or parsed.
    Load {
        /// Offending file, relative to the governed root.
        path: PathBuf,
        /// Reason it could not be loaded.
        reason: String,
    },

    /// No schema claims an example.
    Resolution {
        /// Partition of the example.
        kind: ExampleKind,
        /// Example file, relative to the governed root.
        example: PathBuf,
        /// Resolver diagnostic.
        reason: String,
    },

    /// An example's validity contradicts its partition.
    ValidationMismatch {
        /// Owning schema.
        schema: SchemaName,
        /// Partition of the example.
        kind: ExampleKind,
        /// Example file, relative to the governed root.
        example: PathBuf,
        /// What went wrong.
        mismatch: Mismatch,
        /// Validator diagnostics, one per line.
        details: Vec<String>,
    },

    /// A schema is not well-formed JSON Schema.
    MetaSchema {
        /// Offending schema.
        schema: SchemaName,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A schema breaches the style guide; every violation is listed.
    Style {
        /// Offending schema.
        schema: SchemaName,
        /// Violations in traversal order.
        violations: Vec<Violation>,
    },

    /// Schemas without any example of a partition.
    CoverageGap {
        /// Partition that is missing examples.
        kind: ExampleKind,
        /// Uncovered schema names, sorted.
        missing: Vec<SchemaName>,
    },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, reason } => {
                write!(f, "LOAD {}: {reason}", path.display())
            }
            Self::Resolution {
                kind,
                example,
                reason,
            } => write!(f, "RESOLVE {kind} {}: {reason}", example.display()),
            Self::ValidationMismatch {
                schema,
                kind,
                example,
                mismatch,
                details,
            } => {
                write!(f, "EXAMPLE {kind} {} ({schema}): {mismatch}", example.display())?;
                for line in details {
                    write!(f, "\n    {line}")?;
                }
                Ok(())
            }
            Self::MetaSchema { schema, reason } => {
                write!(f, "META {schema}: {reason}")
            }
            Self::Style { schema, violations } => {
                write!(f, "STYLE {schema}: {} violation(s)", violations.len())?;
                for v in violations {
                    write!(f, "\n    [{}] {v}", v.rule)?;
                }
                Ok(())
            }
            Self::CoverageGap { kind, missing } => {
                let names: Vec<&str> = missing.iter().map(SchemaName::as_str).collect();
                write!(
                    f,
                    "COVERAGE schemas without {kind} examples: {}",
                    names.join(", ")
                )
            }
        }
    }
}

/// Outcome of a batch of checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Number of assertions evaluated.
    pub checks: usize,
    /// Assertions that failed.
    pub failures: Vec<Failure>,
    /// Findings reported for information only.
    pub advisories: Vec<Failure>,
}

impl Report {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an assertion that passed.
    pub fn pass(&mut self) {
        self.checks += 1;
    }

    /// Count an assertion that failed.
    pub fn fail(&mut self, failure: Failure) {
        self.checks += 1;
        self.failures.push(failure);
    }

    /// Count an assertion whose failure is informational.
    pub fn advise(&mut self, advisory: Failure) {
        self.checks += 1;
        self.advisories.push(advisory);
    }

    /// Append another report.
    pub fn merge(&mut self, other: Report) {
        self.checks += other.checks;
        self.failures.extend(other.failures);
        self.advisories.extend(other.advisories);
    }

    /// True if no assertion failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of assertions that passed or were advisory only.
    pub fn passed(&self) -> usize {
        self.checks - self.failures.len()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "FAIL {failure}")?;
        }
        for advisory in &self.advisories {
            writeln!(f, "WARN {advisory}")?;
        }
        write!(
            f,
            "{}/{} checks passed, {} failure(s), {} warning(s)",
            self.passed(),
            self.checks,
            self.failures.len(),
            self.advisories.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgov_core::StyleRule;

    fn name(s: &str) -> SchemaName {
        SchemaName::new(s).unwrap()
    }

    #[test]
    fn counts_passes_and_failures() {
        let mut report = Report::new();
        report.pass();
        report.fail(Failure::MetaSchema {
            schema: name("audio"),
            reason: "bad".to_string(),
        });
        report.advise(Failure::CoverageGap {
            kind: ExampleKind::Positive,
            missing: vec![name("audio")],
        });
        assert_eq!(report.checks, 3);
        assert_eq!(report.passed(), 2);
        assert!(!report.is_success());
    }

    #[test]
    fn advisories_do_not_fail_a_report() {
        let mut report = Report::new();
        report.advise(Failure::CoverageGap {
            kind: ExampleKind::Positive,
            missing: vec![name("audio")],
        });
        assert!(report.is_success());
    }

    #[test]
    fn merge_preserves_order() {
        let mut first = Report::new();
        first.fail(Failure::MetaSchema {
            schema: name("a"),
            reason: "x".to_string(),
        });
        let mut second = Report::new();
        second.pass();
        second.fail(Failure::MetaSchema {
            schema: name("b"),
            reason: "y".to_string(),
        });
        first.merge(second);
        assert_eq!(first.checks, 3);
        let schemas: Vec<String> = first
            .failures
            .iter()
            .map(|f| match f {
                Failure::MetaSchema { schema, .. } => schema.to_string(),
                other => panic!("unexpected failure: {other}"),
            })
            .collect();
        assert_eq!(schemas, vec!["a", "b"]);
    }

    #[test]
    fn style_failure_lists_every_violation() {
        let failure = Failure::Style {
            schema: name("audio-transcription"),
            violations: vec![
                Violation {
                    rule: StyleRule::ClosedObjects,
                    path: String::new(),
                    message: "Object must set 'additionalProperties': false.".to_string(),
                },
                Violation {
                    rule: StyleRule::BoundedArrays,
                    path: "/properties/segments".to_string(),
                    message: "Array must have 'maxItems'.".to_string(),
                },
            ],
        };
        let text = failure.to_string();
        assert!(text.contains("STYLE audio-transcription: 2 violation(s)"));
        assert!(text.contains("[closed-objects] /: Object must set 'additionalProperties': false."));
        assert!(text.contains("[bounded-arrays] /properties/segments: Array must have 'maxItems'."));
    }

    #[test]
    fn coverage_gap_names_all_schemas_once() {
        let failure = Failure::CoverageGap {
            kind: ExampleKind::Negative,
            missing: vec![name("audio"), name("geolocation")],
        };
        assert_eq!(
            failure.to_string(),
            "COVERAGE schemas without negative examples: audio, geolocation"
        );
    }

    #[test]
    fn serializes_with_failure_tag() {
        let failure = Failure::ValidationMismatch {
            schema: name("audio"),
            kind: ExampleKind::Negative,
            example: PathBuf::from("examples/negative/audio-bad-1.json"),
            mismatch: Mismatch::UnexpectedlyValid,
            details: vec![],
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["failure"], "validation-mismatch");
        assert_eq!(json["schema"], "audio");
        assert_eq!(json["kind"], "negative");
        assert_eq!(json["mismatch"], "unexpectedly-valid");
    }

    #[test]
    fn summary_line_counts() {
        let mut report = Report::new();
        report.pass();
        report.pass();
        assert_eq!(
            report.to_string(),
            "2/2 checks passed, 0 failure(s), 0 warning(s)"
        );
    }
}
