#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the wiring linter
//!
//! These tests verify that the linter correctly identifies issues in sample
//! modules under `tests/linter/`.

use brrtwire::config::GeneratorConfig;
use brrtwire::linter::{has_errors, lint_module, LintIssue, LintSeverity};
use brrtwire::scanner::scan_module;
use brrtwire::Pipeline;
use std::path::PathBuf;

fn test_file_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("linter")
        .join(name)
}

fn lint(name: &str) -> Vec<LintIssue> {
    lint_module(&scan_module(&test_file_path(name)).unwrap())
}

#[test]
fn test_bad_handler_casing() {
    let issues = lint("bad_handler_casing.rs");

    let casing: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == "handler_casing" && i.severity == LintSeverity::Warning)
        .collect();

    assert_eq!(
        casing.len(),
        2,
        "Should find 2 handler casing warnings. Found: {:?}",
        issues
    );

    // Locations point at the route directives
    assert!(casing[0].location.ends_with("bad_handler_casing.rs:5"));
    assert!(casing[1].location.ends_with("bad_handler_casing.rs:12"));

    let suggestions: Vec<_> = casing.iter().filter_map(|i| i.suggestion.as_deref()).collect();
    assert_eq!(
        suggestions,
        vec!["Change to: list_users", "Change to: upload_avatar"]
    );
}

#[test]
fn test_unbound_path_parameter() {
    let issues = lint("unbound_path_parameter.rs");

    let unbound: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == "unbound_path_parameter")
        .collect();

    // `org` on get_repo, the wildcard on get_file
    assert_eq!(unbound.len(), 2, "Found: {:?}", issues);
    assert!(unbound[0].message.contains("'org'"));
    assert!(unbound[0].message.contains("get_repo"));
    assert_eq!(unbound[1].severity, LintSeverity::Info);
    assert_eq!(unbound[1].suggestion.as_deref(), Some("Add an argument named `wildcard`"));
}

#[test]
fn test_mixed_issues() {
    let path = test_file_path("mixed_issues.rs");
    let mut pipeline = Pipeline::with_template_emitter(GeneratorConfig {
        root_import: Some("fixtures".to_string()),
        jobs: 1,
        dry_run: true,
        format: false,
    });
    pipeline.discover(&[path]).unwrap();
    let issues = pipeline.lint_issues().unwrap();
    assert!(has_errors(&issues));

    let kinds: Vec<&str> = issues.iter().map(|i| i.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "ReferenceError",
            "ReferenceError",
            "handler_casing",
            "empty_controller",
            "priority_without_global",
            "transient_without_factory",
        ]
    );

    // Unknown middleware is matched against registered names
    let middleware = issues
        .iter()
        .find(|i| i.message.contains("Auht"))
        .expect("middleware error");
    assert_eq!(middleware.suggestion.as_deref(), Some("Did you mean: Auth"));
}

#[test]
fn test_all_sample_files_exist() {
    for name in [
        "bad_handler_casing.rs",
        "unbound_path_parameter.rs",
        "mixed_issues.rs",
    ] {
        assert!(test_file_path(name).exists(), "missing fixture {name}");
    }
}
