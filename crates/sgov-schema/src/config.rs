//! # Harness Configuration
//!
//! Optional YAML file describing where the governed tree keeps its
//! schemas and examples, which JSON Schema draft applies when a schema
//! does not declare one, and which schemas are exempt from which style
//! rules. Every field has a default, so an absent file means the
//! conventional layout:
//!
//! ```yaml
//! schemas_dir: schemas
//! positive_dir: examples/positive
//! negative_dir: examples/negative
//! default_draft: draft2020-12
//! require_positive_coverage: false
//! exemptions:
//!   closed-objects: [geolocation]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sgov_core::ExampleKind;

use crate::style::ExemptionTable;

/// File name looked up in the governed root when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sgov.yaml";

/// Error loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {path}")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not a valid configuration document.
    #[error("invalid config file {path}: {source}")]
    Yaml {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },

    /// An unrecognised draft identifier.
    #[error("unknown JSON Schema draft {0:?} (expected draft4, draft6, draft7, draft2019-09 or draft2020-12)")]
    UnknownDraft(String),
}

/// JSON Schema draft applied to schemas without a `$schema` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DraftVersion {
    /// Draft 4.
    #[serde(rename = "draft4")]
    Draft4,
    /// Draft 6.
    #[serde(rename = "draft6")]
    Draft6,
    /// Draft 7.
    #[serde(rename = "draft7")]
    Draft7,
    /// Draft 2019-09.
    #[serde(rename = "draft2019-09")]
    Draft201909,
    /// Draft 2020-12, the latest draft and the default.
    #[default]
    #[serde(rename = "draft2020-12")]
    Draft202012,
}

impl DraftVersion {
    /// Identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft4 => "draft4",
            Self::Draft6 => "draft6",
            Self::Draft7 => "draft7",
            Self::Draft201909 => "draft2019-09",
            Self::Draft202012 => "draft2020-12",
        }
    }
}

impl From<DraftVersion> for jsonschema::Draft {
    fn from(draft: DraftVersion) -> Self {
        match draft {
            DraftVersion::Draft4 => jsonschema::Draft::Draft4,
            DraftVersion::Draft6 => jsonschema::Draft::Draft6,
            DraftVersion::Draft7 => jsonschema::Draft::Draft7,
            DraftVersion::Draft201909 => jsonschema::Draft::Draft201909,
            DraftVersion::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

impl fmt::Display for DraftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft4" => Ok(Self::Draft4),
            "draft6" => Ok(Self::Draft6),
            "draft7" => Ok(Self::Draft7),
            "draft2019-09" => Ok(Self::Draft201909),
            "draft2020-12" => Ok(Self::Draft202012),
            other => Err(ConfigError::UnknownDraft(other.to_string())),
        }
    }
}

/// Layout and policy of a governed schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory of `<name>.json` schemas, relative to the governed root.
    pub schemas_dir: PathBuf,
    /// Directory of examples that must validate.
    pub positive_dir: PathBuf,
    /// Directory of examples that must fail validation.
    pub negative_dir: PathBuf,
    /// Draft used when a schema has no `$schema` keyword.
    pub default_draft: DraftVersion,
    /// Per-rule schema exemptions; replaces the house default when set.
    pub exemptions: ExemptionTable,
    /// Treat schemas without positive examples as failures instead of warnings.
    pub require_positive_coverage: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            schemas_dir: PathBuf::from("schemas"),
            positive_dir: PathBuf::from("examples/positive"),
            negative_dir: PathBuf::from("examples/negative"),
            default_draft: DraftVersion::default(),
            exemptions: ExemptionTable::default(),
            require_positive_coverage: false,
        }
    }
}

impl HarnessConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` does not exist,
    /// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Yaml`]
    /// if it is not a valid configuration document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a configuration document from a string.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the configuration for a governed root.
    ///
    /// An explicit path must exist. Otherwise `<root>/sgov.yaml` is used
    /// when present, and the defaults when it is not.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            tracing::debug!(root = %root.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Directory holding examples of the given kind.
    pub fn examples_dir(&self, kind: ExampleKind) -> &Path {
        match kind {
            ExampleKind::Positive => &self.positive_dir,
            ExampleKind::Negative => &self.negative_dir,
        }
    }
}
