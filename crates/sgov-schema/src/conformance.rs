//! # Schema Conformance
//!
//! Thin layer over the `jsonschema` crate answering two questions:
//!
//! - does an instance conform to a schema ([`ConformanceEngine::validate_instance`]);
//! - is a schema itself a well-formed JSON Schema document
//!   ([`ConformanceEngine::check_schema_meta`]).
//!
//! ## Draft Selection
//!
//! A schema that declares `$schema` is compiled under the draft it names.
//! One that does not is compiled under the configured default draft.
//!
//! ## Reference Resolution
//!
//! Resolution never touches the network. Sibling schemas of the governed
//! tree are registered under their file name and their `$id`; any other
//! external reference fails to resolve and the schema does not compile.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::config::DraftVersion;
use crate::repository::SchemaIndex;

/// Serves `$ref` targets from the loaded schemas only.
#[derive(Debug, Clone)]
struct LocalSchemaRetriever {
    /// Map from URI (or bare file name) to schema document.
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative references arrive resolved against the default base
        // URI; the last segment is the sibling's file name.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("reference '{uri_str}' does not resolve to a local schema").into())
    }
}

/// One way in which an instance failed to conform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceError {
    /// JSON Pointer to the offending location in the instance.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)?;
        }
        if !self.schema_path.is_empty() {
            write!(f, " (schema {})", self.schema_path)?;
        }
        Ok(())
    }
}

/// All errors produced for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceErrors(Vec<InstanceError>);

impl InstanceErrors {
    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a slice of all errors.
    pub fn errors(&self) -> &[InstanceError] {
        &self.0
    }
}

impl fmt::Display for InstanceErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {e}")?;
        }
        Ok(())
    }
}

/// Outcome of a conformance check that did not pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConformanceError {
    /// The schema is not a well-formed JSON Schema document, or it
    /// references something that cannot be resolved locally.
    #[error("schema is not valid JSON Schema: {reason}")]
    SchemaInvalid {
        /// Compiler diagnostic.
        reason: String,
    },

    /// The instance does not conform to the schema.
    #[error("instance failed validation:\n{errors}")]
    InstanceInvalid {
        /// Every error the validator reported.
        errors: InstanceErrors,
    },
}

/// Validates schemas and instances with offline reference resolution.
#[derive(Debug, Clone)]
pub struct ConformanceEngine {
    default_draft: DraftVersion,
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl ConformanceEngine {
    /// An engine with no sibling schemas registered.
    pub fn new(default_draft: DraftVersion) -> Self {
        Self {
            default_draft,
            schemas_by_uri: Arc::new(HashMap::new()),
        }
    }

    /// An engine that resolves references between the schemas of `index`.
    ///
    /// Each schema is registered under `<name>.json` and under its own
    /// `$id`, if it declares one.
    pub fn with_schemas(default_draft: DraftVersion, index: &SchemaIndex) -> Self {
        let mut schemas_by_uri = HashMap::new();
        for schema in index.iter() {
            schemas_by_uri.insert(format!("{}.json", schema.name), schema.document.clone());
            if let Some(id) = schema.document.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), schema.document.clone());
            }
        }
        Self {
            default_draft,
            schemas_by_uri: Arc::new(schemas_by_uri),
        }
    }

    /// Draft applied to schemas without `$schema`.
    pub fn default_draft(&self) -> DraftVersion {
        self.default_draft
    }

    fn build_options(&self, schema: &Value) -> ValidationOptions {
        let mut opts = jsonschema::options();
        if schema.get("$schema").is_none() {
            opts.with_draft(self.default_draft.into());
        }
        opts.with_retriever(LocalSchemaRetriever {
            schemas_by_uri: Arc::clone(&self.schemas_by_uri),
        });
        opts
    }

    /// Compile a schema. Compilation checks it against its meta-schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::SchemaInvalid`] if the schema is not
    /// well-formed or has an unresolvable reference.
    pub fn compile(&self, schema: &Value) -> Result<Validator, ConformanceError> {
        self.build_options(schema)
            .build(schema)
            .map_err(|e| ConformanceError::SchemaInvalid {
                reason: e.to_string(),
            })
    }

    /// Verify that `schema` is itself a well-formed JSON Schema document.
    pub fn check_schema_meta(&self, schema: &Value) -> Result<(), ConformanceError> {
        self.compile(schema).map(|_| ())
    }

    /// Validate `instance` with an already compiled validator.
    pub fn validate_compiled(
        validator: &Validator,
        instance: &Value,
    ) -> Result<(), ConformanceError> {
        let errors: Vec<InstanceError> = validator
            .iter_errors(instance)
            .map(|e| InstanceError {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConformanceError::InstanceInvalid {
                errors: InstanceErrors(errors),
            })
        }
    }

    /// Validate `instance` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::SchemaInvalid`] if the schema cannot be
    /// compiled and [`ConformanceError::InstanceInvalid`] with every
    /// validation error if the instance does not conform.
    pub fn validate_instance(
        &self,
        schema: &Value,
        instance: &Value,
    ) -> Result<(), ConformanceError> {
        let validator = self.compile(schema)?;
        Self::validate_compiled(&validator, instance)
    }
}
