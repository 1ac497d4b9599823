//! # Style Guide Rules
//!
//! Defines the `StyleRule` enum naming every rule of the house style guide.
//! This is the ONE definition used by the checker, the exemption table, the
//! configuration file, and the report. Every `match` on `StyleRule` must be
//! exhaustive, so a new rule cannot be added without the checker evaluating
//! it and the configuration being able to exempt it.
//!
//! | # | Rule | Node condition |
//! |---|------|----------------|
//! | 1 | `no-defaults` | has `default` |
//! | 2 | `no-remote-refs` | `$ref` starts with `http` or `//` |
//! | 3 | `bounded-strings` | `type: string` without `enum`/`const`/`maxLength` |
//! | 4 | `bounded-arrays` | `type: array` without `maxItems` |
//! | 5 | `closed-objects` | `type: object` with `properties` but no `additionalProperties: false` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SgovError;

/// A rule of the schema style guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleRule {
    /// Defaults are banned: they make producer and consumer disagree on
    /// what an absent value means.
    NoDefaults,
    /// Every `$ref` must resolve inside the schema itself.
    NoRemoteRefs,
    /// Free-form strings must declare `maxLength`.
    BoundedStrings,
    /// Arrays must declare `maxItems`.
    BoundedArrays,
    /// Objects with declared properties must set `additionalProperties: false`.
    ClosedObjects,
}

/// Total number of style rules.
pub const STYLE_RULE_COUNT: usize = 5;

impl StyleRule {
    /// Returns all rules in evaluation order.
    pub fn all() -> &'static [StyleRule] {
        &[
            Self::NoDefaults,
            Self::NoRemoteRefs,
            Self::BoundedStrings,
            Self::BoundedArrays,
            Self::ClosedObjects,
        ]
    }

    /// Returns the kebab-case identifier used in configuration and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDefaults => "no-defaults",
            Self::NoRemoteRefs => "no-remote-refs",
            Self::BoundedStrings => "bounded-strings",
            Self::BoundedArrays => "bounded-arrays",
            Self::ClosedObjects => "closed-objects",
        }
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleRule {
    type Err = SgovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-defaults" => Ok(Self::NoDefaults),
            "no-remote-refs" => Ok(Self::NoRemoteRefs),
            "bounded-strings" => Ok(Self::BoundedStrings),
            "bounded-arrays" => Ok(Self::BoundedArrays),
            "closed-objects" => Ok(Self::ClosedObjects),
            other => Err(SgovError::UnknownRule(other.to_string())),
        }
    }
}
