//! Integration test: run the full governance pass over the fixture tree
//! under `tests/fixtures/governed`.
//!
//! The fixture is a small but complete governed tree: three schemas (one
//! of them the open-world `geolocation`, one declaring draft-07), a
//! positive and a negative example per schema, and a schema name that is
//! a prefix of another (`audio` / `audio-transcription`).

use std::path::{Path, PathBuf};

use serde_json::json;
use sgov_core::{ExampleKind, SchemaName, StyleRule};
use sgov_schema::{
    audit_coverage, ConformanceEngine, DraftVersion, ExemptionTable, Failure, Harness,
    HarnessConfig, SchemaResolver, StyleGuideChecker,
};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/governed")
}

fn load() -> Harness {
    Harness::load(&fixture_root(), HarnessConfig::default()).expect("fixture tree loads")
}

fn name(s: &str) -> SchemaName {
    SchemaName::new(s).unwrap()
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in std::fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
            copy_tree(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), target).unwrap();
        }
    }
}

#[test]
fn test_fixture_tree_passes_every_check() {
    let report = load().run_all();
    eprintln!("{report}");
    assert!(report.is_success(), "fixture tree should be clean:\n{report}");
    // 6 examples + 3 meta + 3 style + 2 coverage
    assert_eq!(report.checks, 14);
    assert!(report.advisories.is_empty());
}

#[test]
fn test_every_example_resolves_to_its_longest_prefix() {
    let harness = load();
    let expected = [
        ("audio-1", "audio"),
        ("audio-bad-1", "audio"),
        ("audio-transcription-1", "audio-transcription"),
        ("audio-transcription-bad-1", "audio-transcription"),
        ("geolocation-1", "geolocation"),
        ("geolocation-bad-1", "geolocation"),
    ];
    for (example, schema) in expected {
        assert_eq!(harness.resolve(example).unwrap().name.as_str(), schema);
    }
}

#[test]
fn test_positive_examples_validate_and_negatives_do_not() {
    let harness = load();
    let engine =
        ConformanceEngine::with_schemas(DraftVersion::default(), harness.repository().schemas());
    for kind in ExampleKind::all() {
        for example in harness.repository().examples(*kind) {
            let schema = harness.resolve(&example.stem).unwrap();
            let outcome = engine.validate_instance(&schema.document, &example.document);
            assert_eq!(
                outcome.is_ok(),
                kind.expects_valid(),
                "{} against {}: {outcome:?}",
                example.path.display(),
                schema.name
            );
        }
    }
}

#[test]
fn test_every_schema_is_valid_json_schema() {
    let harness = load();
    let engine = ConformanceEngine::new(DraftVersion::default());
    for schema in harness.repository().schemas().iter() {
        engine
            .check_schema_meta(&schema.document)
            .unwrap_or_else(|e| panic!("{} is invalid JSON Schema: {e}", schema.name));
    }
}

#[test]
fn test_every_schema_has_a_negative_example() {
    let harness = load();
    let repo = harness.repository();
    let stems = repo.example_stems(ExampleKind::Negative);
    let missing = audit_coverage(repo.schemas().names(), &stems);
    assert!(missing.is_empty(), "schemas without negative examples: {missing:?}");
}

#[test]
fn test_geolocation_is_open_only_because_of_its_exemption() {
    let harness = load();
    let geolocation = harness.repository().schemas().get(&name("geolocation")).unwrap();
    assert!(harness.style_violations(geolocation).is_empty());

    let strict = StyleGuideChecker::new(ExemptionTable::empty());
    let violations = strict.check(&geolocation.name, &geolocation.document);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, StyleRule::ClosedObjects);
    assert_eq!(
        violations[0].to_string(),
        "/: Object must set 'additionalProperties': false."
    );

    // The same shape under another name is not exempt.
    let checker = StyleGuideChecker::default();
    let renamed = checker.check(&name("audio-transcription"), &geolocation.document);
    assert_eq!(
        renamed.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["/: Object must set 'additionalProperties': false."]
    );
}

#[test]
fn test_style_check_is_order_stable_across_runs() {
    let harness = load();
    let first = harness.check_style(None);
    let second = harness.check_style(None);
    assert_eq!(first, second);
}

#[test]
fn test_degraded_copy_reports_each_problem_once() {
    let dir = tempfile::tempdir().unwrap();
    copy_tree(&fixture_root(), dir.path());

    // A negative example that now passes.
    std::fs::write(
        dir.path().join("examples/negative/audio-bad-1.json"),
        json!({"codec": "flac", "duration_ms": 1}).to_string(),
    )
    .unwrap();
    // A schema with style problems and no examples at all.
    std::fs::write(
        dir.path().join("schemas/contact.json"),
        json!({
            "type": "object",
            "properties": {
                "email": {"type": "string", "format": "email"},
                "kind": {"type": "string", "enum": ["home", "work"]},
                "avatar": {"$ref": "http://example.com/schema.json"}
            },
            "additionalProperties": false
        })
        .to_string(),
    )
    .unwrap();

    let harness = Harness::load(dir.path(), HarnessConfig::default()).unwrap();
    let report = harness.run_all();
    assert!(!report.is_success());

    let mismatch = report
        .failures
        .iter()
        .filter(|f| matches!(f, Failure::ValidationMismatch { .. }))
        .count();
    assert_eq!(mismatch, 1);

    let style: Vec<String> = report
        .failures
        .iter()
        .filter_map(|f| match f {
            Failure::Style { schema, violations } if schema.as_str() == "contact" => {
                Some(violations.iter().map(ToString::to_string).collect::<Vec<_>>())
            }
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(
        style,
        vec![
            "/properties/email: String must have 'maxLength' (even if format is set).".to_string(),
            "/properties/avatar: Remote $ref 'http://example.com/schema.json' is forbidden."
                .to_string(),
        ]
    );

    // The remote reference also keeps the schema from compiling offline.
    assert!(report.failures.iter().any(|f| matches!(
        f,
        Failure::MetaSchema { schema, .. } if schema.as_str() == "contact"
    )));

    let gaps: Vec<&Failure> = report
        .failures
        .iter()
        .filter(|f| matches!(f, Failure::CoverageGap { .. }))
        .collect();
    assert_eq!(
        gaps,
        vec![&Failure::CoverageGap {
            kind: ExampleKind::Negative,
            missing: vec![name("contact")],
        }]
    );
    assert_eq!(report.advisories.len(), 1);
}

#[test]
fn test_prefix_resolver_is_the_default_strategy() {
    let harness = load();
    let resolver = sgov_schema::PrefixResolver::from_repository(harness.repository());
    assert_eq!(resolver.len(), 3);
    assert!(resolver.resolve("video-1").is_err());
}
