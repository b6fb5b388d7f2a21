//! # Generator Configuration Module
//!
//! Settings for one `brrtwire-gen` run. CLI flags win; unset flags fall back
//! to environment variables, then to defaults.
//!
//! ## Environment Variables
//!
//! ### `BRRTWIRE_JOBS`
//!
//! Number of worker threads used to validate modules in the second phase.
//! `1` validates on the driver thread. Values that are not a positive integer
//! fall back to the default.
//!
//! Default: the available parallelism of the machine
//!
//! ### `BRRTWIRE_ROOT_IMPORT`
//!
//! Crate (or crate module) that scanned modules live under, e.g. `pet_store`
//! or `pet_store::api`. When unset the name is read from the nearest
//! `Cargo.toml`.
//!
//! ## Usage
//!
//! ```rust
//! use brrtwire::config::GeneratorConfig;
//!
//! let config = GeneratorConfig::from_env();
//! assert!(config.jobs >= 1);
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export BRRTWIRE_JOBS=4
//! export BRRTWIRE_ROOT_IMPORT=pet_store
//! brrtwire-gen generate src/...
//! ```

use std::env;
use std::num::NonZeroUsize;

pub const ENV_JOBS: &str = "BRRTWIRE_JOBS";
pub const ENV_ROOT_IMPORT: &str = "BRRTWIRE_ROOT_IMPORT";

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root import override; inferred from `Cargo.toml` when `None`
    pub root_import: Option<String>,
    /// Validation workers (at least 1)
    pub jobs: usize,
    /// Render but do not write generated files
    pub dry_run: bool,
    /// Run `rustfmt` over written files
    pub format: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_import: None,
            jobs: default_jobs(),
            dry_run: false,
            format: true,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let jobs = env::var(ENV_JOBS)
            .ok()
            .and_then(|v| parse_jobs(&v))
            .unwrap_or_else(default_jobs);
        let root_import = env::var(ENV_ROOT_IMPORT)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        GeneratorConfig {
            root_import,
            jobs,
            ..Self::default()
        }
    }

    /// Apply explicit CLI values over the environment.
    #[must_use]
    pub fn with_overrides(mut self, root_import: Option<String>, jobs: Option<usize>) -> Self {
        if root_import.is_some() {
            self.root_import = root_import;
        }
        if let Some(jobs) = jobs {
            self.jobs = jobs.max(1);
        }
        self
    }
}

fn parse_jobs(raw: &str) -> Option<usize> {
    raw.trim().parse::<NonZeroUsize>().ok().map(NonZeroUsize::get)
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
