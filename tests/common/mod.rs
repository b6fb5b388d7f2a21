#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway crate on disk: a `Cargo.toml` plus modules under `src/`.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new(package: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            format!("[package]\nname = \"{package}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n"),
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `src/<rel>` and return its path.
    pub fn module(&self, rel: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join("src").join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, source).unwrap();
        path
    }

    /// `src/...`, the recursive input pattern for the whole crate.
    pub fn all_modules(&self) -> String {
        format!("{}/...", self.dir.path().join("src").display())
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.dir.path().join("src").join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join("src").join(rel).exists()
    }
}

/// Module A of the reference scenario: a custom parser and a middleware.
pub const SHARED: &str = r#"
pub struct RequestContext;
pub struct Code(String);
pub struct CodeError;

/// wire::route_parser
pub fn code(ctx: &RequestContext, raw: &str) -> Result<Code, CodeError> {
    Ok(Code(raw.to_string()))
}

/// wire::middleware Auth -Global -Priority=10
pub struct AuthLayer;

impl AuthLayer {
    pub fn handle(&self) {}
}
"#;

/// Module B of the reference scenario: a route using both of A's names.
pub const ITEMS: &str = r#"
/// wire::controller
pub struct Items;

impl Items {
    /// wire::route GET /items/{id:Code} -Middleware=Auth
    pub fn get_item(&self, id: Code) {}
}
"#;
