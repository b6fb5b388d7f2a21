//! # Generator Module
//!
//! Everything between a validated module and a file on disk.
//!
//! ## Overview
//!
//! - [`Emitter`] - the emission contract: metadata in, one generated file out
//! - [`TemplateEmitter`] - the default emitter, rendering Askama templates
//! - [`ImportResolver`] / [`ImportPathMap`] - Rust import paths per module
//! - [`expand_inputs`] / [`clean`] - module discovery and clean mode
//! - [`format_file`] - `rustfmt` over emitted files
//!
//! ## Generated Files
//!
//! The output for module `src/users.rs` is `src/users.wire.rs`. Generated
//! files are machine-owned and rewritten on every run; the module pulls its
//! file in with:
//!
//! ```rust,ignore
//! include!("users.wire.rs");
//! ```
//!
//! ## Template Customization
//!
//! Templates are located in the `templates/` directory:
//!
//! - `module.wire.rs.txt` - constructors, interfaces and the `wire_meta` tables

mod discover;
mod format;
mod imports;
mod templates;

pub use discover::{clean, expand_inputs, RECURSIVE_SUFFIX, SKIPPED_DIRS};
pub use format::format_file;
pub use imports::{ImportPathMap, ImportResolver};
pub use templates::TemplateEmitter;

use crate::error::Result;
use crate::metadata::ModuleMetadata;
use crate::registry::Registries;
use std::path::{Path, PathBuf};

/// Suffix of every generated file.
pub const GENERATED_SUFFIX: &str = ".wire.rs";

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// @generated by brrtwire-gen";

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Turns one validated module into one generated file.
///
/// Implementations must be pure: the pipeline decides whether and where the
/// result is written.
pub trait Emitter: Send + Sync {
    fn emit(
        &self,
        module: &ModuleMetadata,
        registries: &Registries,
        imports: &ImportPathMap,
    ) -> Result<EmittedFile>;
}

/// Generated file path for a module: `a/b.rs` becomes `a/b.wire.rs`.
#[must_use]
pub fn output_path(module: &Path) -> PathBuf {
    let stem = module
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    module.with_file_name(format!("{}{}", stem, GENERATED_SUFFIX))
}

/// Whether a path names a generated file.
#[must_use]
pub fn is_generated(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(GENERATED_SUFFIX))
}
