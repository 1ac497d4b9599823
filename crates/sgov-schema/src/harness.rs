//! # Governance Harness
//!
//! Runs every check over a loaded governed tree:
//!
//! 1. **Examples**: each example resolves to a schema; positive examples
//!    must validate, negative examples must not.
//! 2. **Meta-schema**: each schema is well-formed JSON Schema.
//! 3. **Style**: each schema satisfies the style guide.
//! 4. **Coverage**: each schema has a negative example (and, optionally,
//!    a positive one).
//!
//! Checks are independent. A failing example, schema, or rule never stops
//! the others from being evaluated.

use std::collections::BTreeMap;
use std::path::Path;

use jsonschema::Validator;

use sgov_core::{ExampleKind, ResolutionError, SchemaName};

use crate::config::HarnessConfig;
use crate::conformance::{ConformanceEngine, ConformanceError};
use crate::coverage::audit_coverage;
use crate::report::{Failure, Mismatch, Report};
use crate::repository::{Example, Repository, RepositoryError, Schema};
use crate::resolve::{PrefixResolver, SchemaResolver};
use crate::style::{StyleGuideChecker, Violation};

/// A loaded governed tree plus the machinery to check it.
pub struct Harness {
    config: HarnessConfig,
    repository: Repository,
    engine: ConformanceEngine,
    checker: StyleGuideChecker,
    resolver: Box<dyn SchemaResolver>,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("root", &self.repository.root())
            .field("schemas", &self.repository.schemas().len())
            .field("default_draft", &self.engine.default_draft())
            .finish()
    }
}

impl Harness {
    /// Load the governed tree under `root` and prepare the checks.
    ///
    /// # Errors
    ///
    /// Propagates fatal [`RepositoryError`]s from loading.
    pub fn load(root: &Path, config: HarnessConfig) -> Result<Self, RepositoryError> {
        let repository = Repository::load(root, &config)?;
        Ok(Self::from_repository(repository, config))
    }

    /// Prepare the checks for an already loaded repository.
    pub fn from_repository(repository: Repository, config: HarnessConfig) -> Self {
        let engine = ConformanceEngine::with_schemas(config.default_draft, repository.schemas());
        let checker = StyleGuideChecker::new(config.exemptions.clone());
        let resolver = Box::new(PrefixResolver::from_repository(&repository));
        tracing::debug!(exemptions = ?config.exemptions, "style exemptions in force");
        Self {
            config,
            repository,
            engine,
            checker,
            resolver,
        }
    }

    /// Replace the example-to-schema association strategy.
    pub fn with_resolver(mut self, resolver: Box<dyn SchemaResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The loaded tree.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Resolve an example identifier to its owning schema.
    ///
    /// A schema file that exists but failed to load still owns its
    /// examples; they resolve to [`ResolutionError::SchemaUnloadable`]
    /// rather than to a shorter name.
    pub fn resolve(&self, example: &str) -> Result<&Schema, ResolutionError> {
        let name = self.resolver.resolve(example)?;
        if let Some(schema) = self.repository.schemas().get(name) {
            return Ok(schema);
        }
        if self.repository.unloadable_reason(name).is_some() {
            return Err(ResolutionError::SchemaUnloadable {
                example: example.to_string(),
                schema: name.clone(),
            });
        }
        Err(ResolutionError::NoMatchingSchema {
            example: example.to_string(),
        })
    }

    /// Style-guide violations of one schema.
    pub fn style_violations(&self, schema: &Schema) -> Vec<Violation> {
        self.checker.check(&schema.name, &schema.document)
    }

    /// Run every check, load failures first.
    pub fn run_all(&self) -> Report {
        let mut report = self.check_load();
        report.merge(self.check_examples());
        report.merge(self.check_meta());
        report.merge(self.check_style(None));
        report.merge(self.check_coverage());
        tracing::info!(
            checks = report.checks,
            failures = report.failures.len(),
            warnings = report.advisories.len(),
            "governance run complete"
        );
        report
    }

    /// One failure per file that could not be loaded.
    pub fn check_load(&self) -> Report {
        let mut report = Report::new();
        for failure in self.repository.load_failures() {
            report.fail(Failure::Load {
                path: self.repository.relative(&failure.path).to_path_buf(),
                reason: failure.reason.clone(),
            });
        }
        report
    }

    /// Validate every example against the schema that owns it.
    pub fn check_examples(&self) -> Report {
        let mut report = Report::new();
        let mut compiled: BTreeMap<&SchemaName, Result<Validator, ConformanceError>> =
            BTreeMap::new();

        for kind in ExampleKind::all() {
            for example in self.repository.examples(*kind) {
                let schema = match self.resolve(&example.stem) {
                    Ok(schema) => schema,
                    Err(ResolutionError::SchemaUnloadable { schema, .. }) => {
                        let reason = self.repository.unloadable_reason(&schema).unwrap_or_default();
                        report.fail(Failure::ValidationMismatch {
                            kind: *kind,
                            example: self.repository.relative(&example.path).to_path_buf(),
                            mismatch: Mismatch::SchemaUnusable,
                            details: vec![format!("schema file could not be loaded: {reason}")],
                            schema,
                        });
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(example = %example.stem, "no schema claims example");
                        report.fail(Failure::Resolution {
                            kind: *kind,
                            example: self.repository.relative(&example.path).to_path_buf(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                let validator = compiled
                    .entry(&schema.name)
                    .or_insert_with(|| self.engine.compile(&schema.document));
                match judge(example, validator) {
                    None => report.pass(),
                    Some((mismatch, details)) => {
                        tracing::debug!(
                            example = %example.stem,
                            schema = %schema.name,
                            %mismatch,
                            "example check failed"
                        );
                        report.fail(Failure::ValidationMismatch {
                            schema: schema.name.clone(),
                            kind: *kind,
                            example: self.repository.relative(&example.path).to_path_buf(),
                            mismatch,
                            details,
                        });
                    }
                }
            }
        }

        tracing::info!(
            checks = report.checks,
            failures = report.failures.len(),
            "example conformance checked"
        );
        report
    }

    /// Check every schema against its meta-schema.
    pub fn check_meta(&self) -> Report {
        let mut report = Report::new();
        for schema in self.repository.schemas().iter() {
            match self.engine.check_schema_meta(&schema.document) {
                Ok(()) => report.pass(),
                Err(e) => report.fail(Failure::MetaSchema {
                    schema: schema.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        tracing::info!(
            checks = report.checks,
            failures = report.failures.len(),
            "meta-schema conformance checked"
        );
        report
    }

    /// Check schemas against the style guide.
    ///
    /// With `only`, just the named schemas are checked; names not in the
    /// tree are skipped with a warning.
    pub fn check_style(&self, only: Option<&[SchemaName]>) -> Report {
        let mut report = Report::new();
        let selected: Vec<&Schema> = match only {
            None => self.repository.schemas().iter().collect(),
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    let schema = self.repository.schemas().get(name);
                    if schema.is_none() {
                        tracing::warn!(schema = %name, "unknown schema, skipping style check");
                    }
                    schema
                })
                .collect(),
        };

        for schema in selected {
            let violations = self.style_violations(schema);
            if violations.is_empty() {
                report.pass();
            } else {
                report.fail(Failure::Style {
                    schema: schema.name.clone(),
                    violations,
                });
            }
        }
        tracing::info!(
            checks = report.checks,
            failures = report.failures.len(),
            "style guide checked"
        );
        report
    }

    /// Audit example coverage of every schema.
    ///
    /// Negative coverage is mandatory. Positive coverage fails the run only
    /// when `require_positive_coverage` is set.
    pub fn check_coverage(&self) -> Report {
        let mut report = Report::new();
        for kind in [ExampleKind::Negative, ExampleKind::Positive] {
            let stems = self.repository.example_stems(kind);
            let missing = audit_coverage(self.repository.declared_schema_names(), &stems);
            if missing.is_empty() {
                report.pass();
                continue;
            }
            tracing::warn!(kind = %kind, missing = missing.len(), "schemas lack examples");
            let gap = Failure::CoverageGap {
                kind,
                missing: missing.into_iter().collect(),
            };
            if kind == ExampleKind::Positive && !self.config.require_positive_coverage {
                report.advise(gap);
            } else {
                report.fail(gap);
            }
        }
        report
    }
}

/// Decide whether an example's outcome contradicts its partition.
fn judge(
    example: &Example,
    validator: &Result<Validator, ConformanceError>,
) -> Option<(Mismatch, Vec<String>)> {
    let validator = match validator {
        Ok(validator) => validator,
        Err(e) => return Some((Mismatch::SchemaUnusable, vec![e.to_string()])),
    };
    match (
        example.kind,
        ConformanceEngine::validate_compiled(validator, &example.document),
    ) {
        (ExampleKind::Positive, Ok(())) => None,
        (ExampleKind::Negative, Err(ConformanceError::InstanceInvalid { .. })) => None,
        (ExampleKind::Positive, Err(ConformanceError::InstanceInvalid { errors })) => Some((
            Mismatch::UnexpectedlyInvalid,
            errors.errors().iter().map(ToString::to_string).collect(),
        )),
        (ExampleKind::Negative, Ok(())) => Some((Mismatch::UnexpectedlyValid, Vec::new())),
        (_, Err(e @ ConformanceError::SchemaInvalid { .. })) => {
            Some((Mismatch::SchemaUnusable, vec![e.to_string()]))
        }
    }
}
