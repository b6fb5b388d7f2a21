#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::fs;

#[test]
fn test_lint_command_exists() {
    let cli = Cli::try_parse_from(["brrtwire-gen", "lint", "src/..."]).unwrap();

    match cli.command {
        Commands::Lint { paths, .. } => {
            assert_eq!(paths, vec!["src/..."]);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "brrtwire-gen",
        "lint",
        "src/a.rs",
        "src/b.rs",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            paths,
            root_import,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(paths.len(), 2);
            assert!(root_import.is_none());
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_generate_flags() {
    let cli = Cli::try_parse_from([
        "brrtwire-gen",
        "-vv",
        "generate",
        "src/...",
        "--root-import",
        "shop",
        "-j",
        "2",
        "--dry-run",
        "--no-format",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Generate {
            root_import,
            jobs,
            dry_run,
            no_format,
            ..
        } => {
            assert_eq!(root_import.as_deref(), Some("shop"));
            assert_eq!(jobs, Some(2));
            assert!(dry_run);
            assert!(no_format);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["brrtwire-gen", "generate", "src/..."],
        vec!["brrtwire-gen", "clean"],
        vec!["brrtwire-gen", "clean", "crates", "--dry-run"],
        vec!["brrtwire-gen", "lint", "src"],
        vec!["brrtwire-gen", "inspect", "src/lib.rs", "--pretty"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }

    assert!(Cli::try_parse_from(["brrtwire-gen", "generate"]).is_err());
}

#[test]
fn test_generate_then_clean() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let module = dir.path().join("src/users.rs");
    fs::write(
        &module,
        "/// wire::controller\npub struct Users;\n\nimpl Users {\n    /// wire::route GET /users/{id:int}\n    pub fn get(&self, id: i64) {}\n}\n",
    )
    .unwrap();

    let pattern = format!("{}/...", dir.path().join("src").display());
    run(Cli::try_parse_from(["brrtwire-gen", "generate", &pattern, "--no-format", "-j", "1"]).unwrap())
        .unwrap();
    let generated = dir.path().join("src/users.wire.rs");
    assert!(generated.exists());

    let root = dir.path().display().to_string();
    run(Cli::try_parse_from(["brrtwire-gen", "clean", &root]).unwrap()).unwrap();
    assert!(!generated.exists());
    assert!(module.exists());
}

#[test]
fn test_lint_fail_on_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let module = dir.path().join("src/users.rs");
    fs::write(
        &module,
        "/// wire::controller -Middleware=Missing\npub struct Users;\n\nimpl Users {\n    /// wire::route GET /users\n    pub fn list(&self) {}\n}\n",
    )
    .unwrap();
    let path = module.display().to_string();

    assert!(run(Cli::try_parse_from(["brrtwire-gen", "lint", &path]).unwrap()).is_ok());
    let err = run(Cli::try_parse_from(["brrtwire-gen", "lint", &path, "--fail-on-error"]).unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("1 error"));
}
