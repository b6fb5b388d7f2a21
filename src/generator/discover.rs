//! Module discovery and clean mode.
//!
//! Inputs are files, directories (their direct `.rs` children) or recursive
//! patterns ending in `/...`. Recursive walks and clean mode skip
//! dot-directories and dependency/build directories.

use super::is_generated;
use crate::error::{Diagnostic, Result, WireError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Suffix marking a recursive input pattern (`src/...`).
pub const RECURSIVE_SUFFIX: &str = "/...";

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["target", "vendor", "node_modules"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

fn is_module(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "rs") && !is_generated(path)
}

fn walk(dir: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let walker = WalkDir::new(dir)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            WireError::io("walk", &path, source)
        })?;
        if entry.file_type().is_file() && is_module(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

/// Expand CLI inputs into the ordered list of modules to scan.
///
/// Order follows the inputs; within a directory, files are sorted by name.
/// A module named twice is scanned once.
///
/// # Errors
///
/// Returns a `ConfigurationError` for inputs that do not exist or are not Rust
/// files, and an `IOError` when a directory cannot be read.
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut modules = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let found = if let Some(dir) = input.strip_suffix(RECURSIVE_SUFFIX) {
            let dir = if dir.is_empty() { "." } else { dir };
            let dir = Path::new(dir);
            if !dir.is_dir() {
                return Err(missing(input));
            }
            walk(dir, usize::MAX)?
        } else {
            let path = Path::new(input);
            if path.is_dir() {
                walk(path, 1)?
            } else if path.is_file() {
                if !is_module(path) {
                    return Err(WireError::configuration(
                        Diagnostic::new(format!(
                            "input `{}` is not a Rust module (expected a `.rs` file that is not `*.wire.rs`)",
                            input
                        ))
                        .with_context("input", input),
                    ));
                }
                vec![path.to_path_buf()]
            } else {
                return Err(missing(input));
            }
        };
        debug!(input, modules = found.len(), "expanded input");
        for path in found {
            if seen.insert(path.clone()) {
                modules.push(path);
            }
        }
    }
    Ok(modules)
}

fn missing(input: &str) -> WireError {
    WireError::configuration(
        Diagnostic::new(format!("input `{}` does not exist", input)).with_context("input", input),
    )
}

/// Remove every generated file below `root`.
///
/// Returns the removed paths (or the paths that would be removed when
/// `dry_run` is set).
pub fn clean(root: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            WireError::io("walk", &path, source)
        })?;
        if !entry.file_type().is_file() || !is_generated(entry.path()) {
            continue;
        }
        if !dry_run {
            fs::remove_file(entry.path()).map_err(|e| WireError::io("remove", entry.path(), e))?;
        }
        debug!(path = %entry.path().display(), dry_run, "removed generated file");
        removed.push(entry.into_path());
    }
    info!(root = %root.display(), removed = removed.len(), dry_run, "clean finished");
    Ok(removed)
}
