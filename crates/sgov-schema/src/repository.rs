//! # Governed Tree Loading
//!
//! Loads the schema and example repositories eagerly, before any check
//! runs. Layout, relative to the governed root:
//!
//! - `schemas/<name>.json`: one schema per file, named by its stem.
//! - `examples/positive/<name>-<suffix>.json`: must validate.
//! - `examples/negative/<name>-<suffix>.json`: must fail validation.
//!
//! Directories are read non-recursively and only `.json` files are
//! considered. Entries are sorted by path so every run visits them in
//! the same order.
//!
//! A missing example directory is an empty partition. A missing schema
//! directory is fatal. An individual file that cannot be read or parsed
//! is recorded as a [`LoadFailure`] and the rest of the tree still loads.
//! A schema file that fails this way keeps its name: examples it owns
//! still resolve to it instead of falling through to a shorter name.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use sgov_core::{ExampleKind, SchemaName};

use crate::config::HarnessConfig;

/// Fatal error while loading the governed tree.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A required directory could not be listed.
    #[error("cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Two schema files share a stem.
    #[error("duplicate schema name '{name}': {first} and {second}")]
    DuplicateSchemaName {
        /// The shared name.
        name: SchemaName,
        /// Path already indexed.
        first: PathBuf,
        /// Path that collided with it.
        second: PathBuf,
    },
}

/// A file that could not be turned into a schema or an example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Offending file.
    pub path: PathBuf,
    /// Why it could not be loaded.
    pub reason: String,
}

/// A named schema document.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Canonical name (file stem).
    pub name: SchemaName,
    /// Source file.
    pub path: PathBuf,
    /// Parsed document, in declared key order.
    pub document: Value,
}

/// An example instance document.
#[derive(Debug, Clone)]
pub struct Example {
    /// Partition the example was loaded from.
    pub kind: ExampleKind,
    /// File stem, used to resolve the owning schema.
    pub stem: String,
    /// Source file.
    pub path: PathBuf,
    /// Parsed document.
    pub document: Value,
}

/// Schemas keyed by name. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    schemas: BTreeMap<SchemaName, Schema>,
}

impl SchemaIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateSchemaName`] if a schema with
    /// the same name is already indexed; the index is left unchanged.
    pub fn insert(&mut self, schema: Schema) -> Result<(), RepositoryError> {
        if let Some(existing) = self.schemas.get(&schema.name) {
            return Err(RepositoryError::DuplicateSchemaName {
                name: schema.name,
                first: existing.path.clone(),
                second: schema.path,
            });
        }
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &SchemaName) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Schema names in order.
    pub fn names(&self) -> impl Iterator<Item = &SchemaName> {
        self.schemas.keys()
    }

    /// Schemas in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// The loaded governed tree.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    schemas: SchemaIndex,
    positive: Vec<Example>,
    negative: Vec<Example>,
    failures: Vec<LoadFailure>,
    /// Schema files with a valid name whose content failed to load.
    unloadable: BTreeMap<SchemaName, String>,
}

/// Reason recorded for a file whose name cannot be used as an identifier.
const NON_UTF8_FILE_NAME: &str = "file name is not valid UTF-8";

impl Repository {
    /// Load schemas and both example partitions under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DirectoryUnreadable`] if the schema
    /// directory cannot be listed (or an example directory exists but
    /// cannot be listed), and [`RepositoryError::DuplicateSchemaName`] if
    /// two schema files share a name.
    pub fn load(root: &Path, config: &HarnessConfig) -> Result<Self, RepositoryError> {
        let root = root.to_path_buf();
        let mut failures = Vec::new();
        let mut unloadable = BTreeMap::new();

        let schema_dir = root.join(&config.schemas_dir);
        let mut schemas = SchemaIndex::new();
        for path in list_json_files(&schema_dir)? {
            let name = match file_stem(&path).map(SchemaName::new) {
                Some(Ok(name)) => name,
                Some(Err(e)) => {
                    record(&mut failures, path, e.to_string());
                    continue;
                }
                None => {
                    record(&mut failures, path, NON_UTF8_FILE_NAME.to_string());
                    continue;
                }
            };
            match read_json(&path) {
                Ok(document) => {
                    tracing::debug!(schema = %name, path = %path.display(), "loaded schema");
                    schemas.insert(Schema {
                        name,
                        path,
                        document,
                    })?;
                }
                Err(reason) => {
                    unloadable.insert(name, reason.clone());
                    record(&mut failures, path, reason);
                }
            }
        }

        let mut load_partition = |kind: ExampleKind| -> Result<Vec<Example>, RepositoryError> {
            let dir = root.join(config.examples_dir(kind));
            if !dir.is_dir() {
                tracing::debug!(kind = %kind, dir = %dir.display(), "example directory absent");
                return Ok(Vec::new());
            }
            let mut examples = Vec::new();
            for path in list_json_files(&dir)? {
                let Some(stem) = file_stem(&path).map(str::to_string) else {
                    record(&mut failures, path, NON_UTF8_FILE_NAME.to_string());
                    continue;
                };
                match read_json(&path) {
                    Ok(document) => examples.push(Example {
                        kind,
                        stem,
                        path,
                        document,
                    }),
                    Err(reason) => record(&mut failures, path, reason),
                }
            }
            Ok(examples)
        };
        let positive = load_partition(ExampleKind::Positive)?;
        let negative = load_partition(ExampleKind::Negative)?;

        tracing::info!(
            schemas = schemas.len(),
            positive = positive.len(),
            negative = negative.len(),
            unreadable = failures.len(),
            "loaded governed tree"
        );

        Ok(Self {
            root,
            schemas,
            positive,
            negative,
            failures,
            unloadable,
        })
    }

    /// The governed root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The schema index.
    pub fn schemas(&self) -> &SchemaIndex {
        &self.schemas
    }

    /// Examples of one partition, sorted by path.
    pub fn examples(&self, kind: ExampleKind) -> &[Example] {
        match kind {
            ExampleKind::Positive => &self.positive,
            ExampleKind::Negative => &self.negative,
        }
    }

    /// File stems of one partition.
    pub fn example_stems(&self, kind: ExampleKind) -> Vec<&str> {
        self.examples(kind).iter().map(|e| e.stem.as_str()).collect()
    }

    /// Files that could not be loaded.
    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Why the schema file named `name` failed to load, if it did.
    pub fn unloadable_reason(&self, name: &SchemaName) -> Option<&str> {
        self.unloadable.get(name).map(String::as_str)
    }

    /// Every schema name present on disk, loaded or not.
    pub fn declared_schema_names(&self) -> BTreeSet<&SchemaName> {
        self.schemas.names().chain(self.unloadable.keys()).collect()
    }

    /// Path relative to the governed root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// The identifier of a schema or example file: its name without `.json`.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn record(failures: &mut Vec<LoadFailure>, path: PathBuf, reason: String) {
    tracing::warn!(path = %path.display(), %reason, "file could not be loaded");
    failures.push(LoadFailure { path, reason });
}

/// List `*.json` files directly inside `dir`, sorted.
fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, RepositoryError> {
    let unreadable = |source| RepositoryError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_json(path: &Path) -> Result<Value, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))
}
