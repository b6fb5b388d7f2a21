//! Rust import paths for scanned modules.
//!
//! Generated code refers to parser functions and middleware types in other
//! modules by path. The crate part of a module path comes from the nearest
//! `Cargo.toml` (`[lib].name`, else `[package].name` with `-` turned into `_`)
//! or from an explicit root override; the rest follows the file layout below
//! `src/`.

use crate::error::{Diagnostic, Result, WireError};
use crate::path::is_identifier;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const MANIFEST: &str = "Cargo.toml";

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<Package>,
    lib: Option<LibTarget>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LibTarget {
    name: Option<String>,
}

impl Manifest {
    fn crate_name(&self) -> Option<String> {
        self.lib
            .as_ref()
            .and_then(|l| l.name.clone())
            .or_else(|| self.package.as_ref().map(|p| p.name.replace('-', "_")))
    }
}

/// Import path of one module: the crate it lives in plus module segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath {
    pub crate_name: String,
    pub segments: Vec<String>,
}

impl ModulePath {
    /// Path as seen from `from`: `crate::...` inside the same crate.
    #[must_use]
    pub fn relative_to(&self, from: Option<&ModulePath>) -> String {
        let same_crate = from.is_some_and(|f| f.crate_name == self.crate_name);
        let head = if same_crate { "crate" } else { self.crate_name.as_str() };
        std::iter::once(head)
            .chain(self.segments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("::")
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.crate_name)?;
        for segment in &self.segments {
            write!(f, "::{}", segment)?;
        }
        Ok(())
    }
}

/// Resolved import paths keyed by module file.
#[derive(Debug, Clone, Default)]
pub struct ImportPathMap {
    paths: BTreeMap<PathBuf, ModulePath>,
}

impl ImportPathMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<PathBuf>, path: ModulePath) {
        self.paths.insert(module.into(), path);
    }

    #[must_use]
    pub fn get(&self, module: &Path) -> Option<&ModulePath> {
        self.paths.get(module)
    }

    /// Path to `item` defined in `target`, written for use inside `from`.
    #[must_use]
    pub fn qualify(&self, target: &Path, item: &str, from: &Path) -> Option<String> {
        let target = self.paths.get(target)?;
        Some(format!("{}::{}", target.relative_to(self.paths.get(from)), item))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ModulePath)> {
        self.paths.iter().map(|(k, v)| (k.as_path(), v))
    }
}

/// Computes [`ModulePath`]s, caching one manifest lookup per directory.
#[derive(Debug, Default)]
pub struct ImportResolver {
    root_override: Option<Vec<String>>,
    manifests: HashMap<PathBuf, Option<(PathBuf, String)>>,
}

impl ImportResolver {
    /// `root_override` replaces the crate name inferred from `Cargo.toml`.
    /// It may name a module inside a crate (`my_app::plugins`).
    pub fn new(root_override: Option<&str>) -> Result<Self> {
        let root_override = match root_override {
            None => None,
            Some(raw) => {
                let parts: Vec<String> = raw.split("::").map(str::to_string).collect();
                if parts.iter().any(|p| !is_identifier(p)) {
                    return Err(WireError::configuration(
                        Diagnostic::new(format!(
                            "root import `{}` is not a Rust path (expected identifiers separated by `::`)",
                            raw
                        ))
                        .with_context("root_import", raw),
                    ));
                }
                Some(parts)
            }
        };
        Ok(Self {
            root_override,
            manifests: HashMap::new(),
        })
    }

    /// Resolve the import path of the module at `module`.
    pub fn resolve(&mut self, module: &Path) -> Result<ModulePath> {
        let absolute = absolute(module)?;
        let dir = absolute.parent().unwrap_or(Path::new("/")).to_path_buf();
        let manifest = self.manifest_for(&dir)?;

        let relative = match &manifest {
            Some((root, _)) => absolute
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| absolute.clone()),
            None => after_last_src(&absolute),
        };

        let (crate_name, mut segments) = match (&self.root_override, &manifest) {
            (Some(parts), _) => (parts[0].clone(), parts[1..].to_vec()),
            (None, Some((_, name))) => (name.clone(), Vec::new()),
            (None, None) => {
                return Err(WireError::configuration(
                    Diagnostic::new(format!(
                        "cannot infer the root import for {}: no Cargo.toml with a package found; pass --root-import",
                        module.display()
                    ))
                    .with_context("module", module.display().to_string()),
                ))
            }
        };
        segments.extend(module_segments(&relative, module)?);

        let path = ModulePath {
            crate_name,
            segments,
        };
        debug!(module = %module.display(), import = %path, "resolved import path");
        Ok(path)
    }

    fn manifest_for(&mut self, dir: &Path) -> Result<Option<(PathBuf, String)>> {
        if let Some(hit) = self.manifests.get(dir) {
            return Ok(hit.clone());
        }
        let mut found = None;
        for candidate in dir.ancestors() {
            let manifest = candidate.join(MANIFEST);
            if !manifest.is_file() {
                continue;
            }
            let text = fs::read_to_string(&manifest).map_err(|e| WireError::io("read", &manifest, e))?;
            let parsed: Manifest = toml::from_str(&text).map_err(|e| {
                WireError::configuration(
                    Diagnostic::new(format!("invalid {}: {}", manifest.display(), e))
                        .with_context("manifest", manifest.display().to_string()),
                )
            })?;
            // Virtual workspace manifests carry no crate name; keep looking.
            if let Some(name) = parsed.crate_name() {
                found = Some((candidate.to_path_buf(), name));
                break;
            }
        }
        self.manifests.insert(dir.to_path_buf(), found.clone());
        Ok(found)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| WireError::io("resolve", path, e))?;
    Ok(cwd.join(path))
}

fn after_last_src(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();
    match components.iter().rposition(|c| c.as_os_str() == "src") {
        Some(i) => components[i..].iter().collect(),
        None => path.file_name().map(PathBuf::from).unwrap_or_default(),
    }
}

/// Module segments for a crate-relative file path.
fn module_segments(relative: &Path, module: &Path) -> Result<Vec<String>> {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.first().is_some_and(|p| p == "src") {
        parts.remove(0);
    }
    let Some(file) = parts.pop() else {
        return Ok(Vec::new());
    };
    let stem = file.strip_suffix(".rs").unwrap_or(&file);
    let at_root = parts.is_empty();
    match stem {
        "mod" => {}
        "lib" | "main" if at_root => {}
        other => parts.push(other.to_string()),
    }
    if let Some(bad) = parts.iter().find(|p| !is_identifier(p)) {
        return Err(WireError::configuration(
            Diagnostic::new(format!(
                "module {} has no Rust import path: `{}` is not an identifier",
                module.display(),
                bad
            ))
            .with_context("module", module.display().to_string()),
        ));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(manifest: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST), manifest).unwrap();
        fs::create_dir_all(dir.path().join("src/api")).unwrap();
        dir
    }

    #[test]
    fn test_package_name_with_dashes() {
        let dir = project("[package]\nname = \"pet-store\"\nversion = \"0.1.0\"\n");
        let mut resolver = ImportResolver::new(None).unwrap();
        let path = resolver.resolve(&dir.path().join("src/api/users.rs")).unwrap();
        assert_eq!(path.to_string(), "pet_store::api::users");

        let root = resolver.resolve(&dir.path().join("src/lib.rs")).unwrap();
        assert!(root.segments.is_empty());
        let api = resolver.resolve(&dir.path().join("src/api/mod.rs")).unwrap();
        assert_eq!(api.to_string(), "pet_store::api");
    }

    #[test]
    fn test_lib_name_wins() {
        let dir = project("[package]\nname = \"pet-store\"\n\n[lib]\nname = \"petstore_core\"\n");
        let mut resolver = ImportResolver::new(None).unwrap();
        let path = resolver.resolve(&dir.path().join("src/users.rs")).unwrap();
        assert_eq!(path.to_string(), "petstore_core::users");
    }

    #[test]
    fn test_override_and_workspace_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST), "[workspace]\nmembers = []\n").unwrap();
        let module = dir.path().join("src/users.rs");

        let mut resolver = ImportResolver::new(None).unwrap();
        let err = resolver.resolve(&module).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);

        let mut resolver = ImportResolver::new(Some("app::plugins")).unwrap();
        let path = resolver.resolve(&module).unwrap();
        assert_eq!(path.crate_name, "app");
        assert_eq!(path.segments, vec!["plugins", "users"]);

        assert!(ImportResolver::new(Some("my-app")).is_err());
    }

    #[test]
    fn test_invalid_module_segment() {
        let dir = project("[package]\nname = \"demo\"\n");
        let mut resolver = ImportResolver::new(None).unwrap();
        let err = resolver
            .resolve(&dir.path().join("src/api/user-routes.rs"))
            .unwrap_err();
        assert!(err.to_string().contains("user-routes"));
    }

    #[test]
    fn test_qualify_rewrites_same_crate() {
        let mut map = ImportPathMap::new();
        let users = PathBuf::from("src/users.rs");
        let parsers = PathBuf::from("src/parsers.rs");
        let foreign = PathBuf::from("other/src/codes.rs");
        map.insert(&users, ModulePath { crate_name: "app".into(), segments: vec!["users".into()] });
        map.insert(&parsers, ModulePath { crate_name: "app".into(), segments: vec!["parsers".into()] });
        map.insert(&foreign, ModulePath { crate_name: "codes".into(), segments: vec![] });

        assert_eq!(
            map.qualify(&parsers, "parse_code", &users).as_deref(),
            Some("crate::parsers::parse_code")
        );
        assert_eq!(
            map.qualify(&foreign, "parse_code", &users).as_deref(),
            Some("codes::parse_code")
        );
        assert_eq!(map.qualify(Path::new("nope.rs"), "x", &users), None);
    }
}
