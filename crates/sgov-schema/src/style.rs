//! # Style Guide Checker
//!
//! Static analysis of schema documents against the house style guide.
//! A schema that is valid JSON Schema can still be a bad contract: an
//! unbounded string, a default both sides interpret differently, or an
//! open object that silently accepts typos. This module finds those.
//!
//! ## Traversal
//!
//! The document is walked depth-first, pre-order. Object members are
//! visited in declared order and append `/<key>` to the path; array
//! elements append `[<index>]`. The root path is the empty string. Only
//! object nodes are handed to the rules; arrays are walked through and
//! scalars are ignored.
//!
//! The path is a reporting aid. Rule logic reads it in exactly one place:
//! the `attributes` carve-out of [`StyleRule::ClosedObjects`].
//!
//! ## Exemptions
//!
//! Exemptions are a table of `rule -> schema names`, never a conditional
//! on a literal name. The house default exempts `geolocation` from
//! `closed-objects`, since that schema is open-world at its top level.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sgov_core::{SchemaName, StyleRule};

/// Substring of a node path that marks a free-form key/value bag.
const FREE_FORM_PATH_MARKER: &str = "attributes";

/// Schema exempt from `closed-objects` in the house default table.
const OPEN_WORLD_SCHEMA: &str = "geolocation";

/// A single style-guide breach inside one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that was breached.
    pub rule: StyleRule,
    /// Slash/bracket path of the offending node; empty for the root.
    pub path: String,
    /// Human-readable description of the breach.
    pub message: String,
}

impl Violation {
    /// Path as rendered in reports: `/` stands in for the root.
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

/// Per-rule allow-list of schemas that a rule does not apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExemptionTable(BTreeMap<StyleRule, BTreeSet<SchemaName>>);

impl ExemptionTable {
    /// A table with no exemptions at all.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Add an exemption, returning the table for chaining.
    pub fn with(mut self, rule: StyleRule, schema: SchemaName) -> Self {
        self.exempt(rule, schema);
        self
    }

    /// Add an exemption in place.
    pub fn exempt(&mut self, rule: StyleRule, schema: SchemaName) {
        self.0.entry(rule).or_default().insert(schema);
    }

    /// Whether `schema` is exempt from `rule`.
    pub fn is_exempt(&self, rule: StyleRule, schema: &SchemaName) -> bool {
        self.0.get(&rule).is_some_and(|names| names.contains(schema))
    }
}

impl Default for ExemptionTable {
    fn default() -> Self {
        let mut table = Self::empty();
        if let Ok(name) = SchemaName::new(OPEN_WORLD_SCHEMA) {
            table.exempt(StyleRule::ClosedObjects, name);
        }
        table
    }
}

/// Shape of a JSON value as seen by the traversal.
enum Node<'a> {
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
    Scalar,
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Object(map),
            Value::Array(items) => Node::Array(items),
            _ => Node::Scalar,
        }
    }
}

/// Collect every object node with its path, depth-first pre-order.
fn object_nodes(document: &Value) -> Vec<(String, &Map<String, Value>)> {
    let mut nodes = Vec::new();
    walk(String::new(), document, &mut nodes);
    nodes
}

fn walk<'a>(path: String, value: &'a Value, out: &mut Vec<(String, &'a Map<String, Value>)>) {
    match Node::from(value) {
        Node::Object(map) => {
            out.push((path.clone(), map));
            for (key, child) in map {
                walk(format!("{path}/{key}"), child, out);
            }
        }
        Node::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(format!("{path}[{index}]"), child, out);
            }
        }
        Node::Scalar => {}
    }
}

fn has_type(node: &Map<String, Value>, expected: &str) -> bool {
    node.get("type").and_then(Value::as_str) == Some(expected)
}

/// Evaluate one rule against one object node.
fn evaluate(rule: StyleRule, path: &str, node: &Map<String, Value>) -> Option<String> {
    match rule {
        StyleRule::NoDefaults => node.contains_key("default").then(|| {
            "Property 'default' is forbidden; defaults are ambiguous between producer and consumer."
                .to_string()
        }),
        StyleRule::NoRemoteRefs => node
            .get("$ref")
            .and_then(Value::as_str)
            .filter(|target| target.starts_with("http") || target.starts_with("//"))
            .map(|target| format!("Remote $ref '{target}' is forbidden.")),
        StyleRule::BoundedStrings => (has_type(node, "string")
            && !node.contains_key("enum")
            && !node.contains_key("const")
            && !node.contains_key("maxLength"))
        .then(|| "String must have 'maxLength' (even if format is set).".to_string()),
        StyleRule::BoundedArrays => (has_type(node, "array") && !node.contains_key("maxItems"))
            .then(|| "Array must have 'maxItems'.".to_string()),
        StyleRule::ClosedObjects => (has_type(node, "object")
            && node.contains_key("properties")
            && !path.contains(FREE_FORM_PATH_MARKER)
            && node.get("additionalProperties") != Some(&Value::Bool(false)))
        .then(|| "Object must set 'additionalProperties': false.".to_string()),
    }
}

/// Checks schema documents against the style guide.
#[derive(Debug, Clone, Default)]
pub struct StyleGuideChecker {
    exemptions: ExemptionTable,
}

impl StyleGuideChecker {
    /// Create a checker with the given exemption table.
    pub fn new(exemptions: ExemptionTable) -> Self {
        Self { exemptions }
    }

    /// Check one schema document.
    ///
    /// Returns every violation, in traversal order and then rule order
    /// within a node. Never fails: a document that is not a JSON Schema
    /// at all simply yields whatever the rules find in it.
    pub fn check(&self, schema: &SchemaName, document: &Value) -> Vec<Violation> {
        let rules: Vec<StyleRule> = StyleRule::all()
            .iter()
            .copied()
            .filter(|rule| !self.exemptions.is_exempt(*rule, schema))
            .collect();

        let mut violations = Vec::new();
        for (path, node) in object_nodes(document) {
            for rule in &rules {
                if let Some(message) = evaluate(*rule, &path, node) {
                    violations.push(Violation {
                        rule: *rule,
                        path: path.clone(),
                        message,
                    });
                }
            }
        }
        violations
    }
}
