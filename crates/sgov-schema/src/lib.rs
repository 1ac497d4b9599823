//! # sgov-schema — Schema Governance Checks
//!
//! Loads a governed tree of JSON Schemas and example documents and checks
//! it four ways:
//!
//! - **Example conformance** ([`harness`], [`conformance`]): each example
//!   is associated with a schema by [`resolve`] and validated against it.
//!   Examples under `examples/positive` must validate; examples under
//!   `examples/negative` must not.
//! - **Meta-schema conformance** ([`conformance`]): each schema is itself
//!   well-formed JSON Schema under its declared (or the default) draft.
//! - **Style guide** ([`style`]): each schema is free of defaults, remote
//!   references, unbounded strings and arrays, and open objects, subject
//!   to a per-rule exemption table.
//! - **Coverage** ([`coverage`]): each schema has at least one negative
//!   example.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgov-core` internally.
//! - All IO happens in [`repository`] and [`config`], up front. The checks
//!   themselves are pure functions of loaded documents.
//! - Checks are independent: the [`Report`] collects every failure; none
//!   aborts the run.

pub mod config;
pub mod conformance;
pub mod coverage;
pub mod harness;
pub mod report;
pub mod repository;
pub mod resolve;
pub mod style;

pub use config::{ConfigError, DraftVersion, HarnessConfig, DEFAULT_CONFIG_FILE};
pub use conformance::{ConformanceEngine, ConformanceError, InstanceError, InstanceErrors};
pub use coverage::audit_coverage;
pub use harness::Harness;
pub use report::{Failure, Mismatch, Report};
pub use repository::{Example, LoadFailure, Repository, RepositoryError, Schema, SchemaIndex};
pub use resolve::{PrefixResolver, SchemaResolver};
pub use style::{ExemptionTable, StyleGuideChecker, Violation};
