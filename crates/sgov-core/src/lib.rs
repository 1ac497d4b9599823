//! # sgov-core — Foundational Types for Schema Governance
//!
//! Leaf crate of the sgov workspace. Defines the identifiers every other
//! crate passes around so that a schema name, an example stem, and a rule
//! identifier can never be confused with one another.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `SchemaName` is validated at
//!    construction: non-empty, no path separators, no extension.
//!
//! 2. **Single `StyleRule` enum.** One definition of the style-guide rule
//!    set; exhaustive `match` everywhere, so adding a rule forces the
//!    checker, the exemption table, and the report to handle it.
//!
//! 3. **Resolution failures are typed.** An example that no schema claims
//!    is a configuration defect and surfaces as `ResolutionError`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sgov-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod rule;

pub use error::{ResolutionError, SgovError};
pub use identity::{ExampleKind, SchemaName};
pub use rule::{StyleRule, STYLE_RULE_COUNT};
