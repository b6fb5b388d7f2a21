//! # CLI Module
//!
//! The CLI module provides the command-line interface of the `brrtwire-gen`
//! binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Scan modules, resolve references across them and write one
//! `*.wire.rs` file next to every module that declares something to wire:
//!
//! ```bash
//! brrtwire-gen generate src/...
//! ```
//!
//! Options:
//! - `--root-import <PATH>` - Crate (or crate module) the modules live under
//! - `--jobs <N>` - Validation worker threads
//! - `--dry-run` - Render without writing
//! - `--no-format` - Skip `rustfmt` on written files
//!
//! ### `clean`
//!
//! Remove every generated file below a directory:
//!
//! ```bash
//! brrtwire-gen clean .
//! ```
//!
//! ### `lint`
//!
//! Report every unresolved reference plus advisory warnings without
//! generating anything:
//!
//! ```bash
//! brrtwire-gen lint src/... --fail-on-error
//! ```
//!
//! ### `inspect`
//!
//! Dump the scanned metadata and both registries as JSON:
//!
//! ```bash
//! brrtwire-gen inspect src/... --pretty
//! ```
//!
//! ## Inputs
//!
//! Every command taking `<PATHS>` accepts files, directories (their direct
//! `.rs` children) and recursive patterns such as `src/...`.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use brrtwire::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run(cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{report_error, run, run_cli, Cli, Commands};
