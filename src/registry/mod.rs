//! # Registry Module
//!
//! Cross-module symbol tables mapping a logical name to its single defining
//! declaration.
//!
//! Two tables exist: [`ParserRegistry`] (route parameter parsers, seeded with
//! built-ins and an alias table) and [`MiddlewareRegistry`]. Both are
//! instances of the generic [`Registry`], created by the pipeline, filled
//! during discovery and only read afterwards. They are plain owned values:
//! mutation needs `&mut`, and shared references can be handed to any number
//! of validation threads.

mod middleware;
mod parsers;

pub use middleware::MiddlewareRegistry;
pub use parsers::{ParserRegistry, BUILTIN_ALIASES, BUILTIN_PARSERS};

use crate::error::{Diagnostic, Location, Result, WireError};
use crate::metadata::{Middleware, ModuleMetadata, ParserDefinition};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Shown instead of a location for built-in definitions.
pub const BUILTIN_LOCATION: &str = "<built-in>";

/// Anything a registry can hold.
pub trait Definition {
    fn name(&self) -> &str;

    /// `None` for built-ins
    fn location(&self) -> Option<&Location>;
}

impl Definition for ParserDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl Definition for Middleware {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<&Location> {
        Some(&self.location)
    }
}

fn describe(location: Option<&Location>) -> String {
    location.map_or_else(|| BUILTIN_LOCATION.to_string(), ToString::to_string)
}

/// Conflict-checked name → definition table.
#[derive(Debug, Clone)]
pub struct Registry<D> {
    /// What the table holds, for messages ("parser", "middleware")
    label: &'static str,
    entries: BTreeMap<String, D>,
    builtins: BTreeSet<String>,
    /// alias → canonical name
    aliases: BTreeMap<String, String>,
}

impl<D: Definition> Registry<D> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: BTreeMap::new(),
            builtins: BTreeSet::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Add a definition that survives [`Registry::clear_custom_only`].
    pub fn seed_builtin(&mut self, definition: D) {
        let name = definition.name().to_string();
        self.builtins.insert(name.clone());
        self.entries.insert(name, definition);
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(alias.into(), canonical.into());
    }

    /// Canonical spelling of `name` (itself unless it is an alias).
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Register a definition.
    ///
    /// # Errors
    ///
    /// Returns a `ConflictError` naming both locations when the name (or the
    /// canonical name it aliases) is already taken.
    pub fn register(&mut self, definition: D) -> Result<()> {
        let name = definition.name().to_string();
        let canonical = self.resolve(&name).to_string();
        if let Some(prior) = self.entries.get(&canonical) {
            let first = describe(prior.location());
            let again = describe(definition.location());
            let message = if canonical == name {
                format!(
                    "{} `{}` is defined more than once: first at {}, again at {}",
                    self.label, name, first, again
                )
            } else {
                format!(
                    "{} `{}` is an alias of `{}`, already defined at {}; duplicate at {}",
                    self.label, name, canonical, first, again
                )
            };
            return Err(WireError::conflict(
                Diagnostic::new(message)
                    .at_opt(definition.location().cloned())
                    .with_context(self.label, name)
                    .with_context("first", first)
                    .with_context("duplicate", again),
            ));
        }
        debug!(
            registry = self.label,
            name = %name,
            location = %describe(definition.location()),
            "registered"
        );
        self.entries.insert(name, definition);
        Ok(())
    }

    /// Look up a definition by name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&D> {
        self.entries.get(self.resolve(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical names of every definition.
    #[must_use]
    pub fn list(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Canonical names plus aliases, for "did you mean" ranking.
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(self.resolve(name))
    }

    /// Drop every custom definition, keeping built-ins.
    pub fn clear_custom_only(&mut self) {
        let builtins = &self.builtins;
        self.entries.retain(|name, _| builtins.contains(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.entries.values()
    }

    /// Custom (non built-in) definitions.
    pub fn custom(&self) -> impl Iterator<Item = &D> {
        self.entries
            .iter()
            .filter(|(name, _)| !self.builtins.contains(*name))
            .map(|(_, d)| d)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both tables, owned by one pipeline run.
#[derive(Debug, Clone)]
pub struct Registries {
    pub parsers: ParserRegistry,
    pub middlewares: MiddlewareRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: ParserRegistry::with_builtins(),
            middlewares: MiddlewareRegistry::empty(),
        }
    }

    /// Register every parser and middleware a module defines, in declaration
    /// order. Stops at the first conflict.
    pub fn register_module(&mut self, module: &ModuleMetadata) -> Result<()> {
        for parser in &module.parsers {
            self.parsers.register(parser.clone())?;
        }
        for middleware in &module.middlewares {
            self.middlewares.register(middleware.clone())?;
        }
        Ok(())
    }

    /// Drop custom parsers and all middleware.
    pub fn clear_custom_only(&mut self) {
        self.parsers.clear_custom_only();
        self.middlewares.clear_custom_only();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parser(name: &str, module: &str, line: usize) -> ParserDefinition {
        ParserDefinition {
            name: name.to_string(),
            function: format!("parse_{}", name.to_lowercase()),
            target_type: name.to_string(),
            context_type: Some("&RequestContext".into()),
            error_type: Some("ParseError".into()),
            location: Some(Location::new(module, line)),
        }
    }

    #[test]
    fn test_conflict_cites_both_locations() {
        let mut reg = ParserRegistry::with_builtins();
        reg.register(parser("Code", "src/a.rs", 3)).unwrap();
        let err = reg.register(parser("Code", "src/b.rs", 9)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let text = err.to_string();
        assert!(text.contains("src/a.rs:3"), "{text}");
        assert!(text.contains("src/b.rs:9"), "{text}");
        assert_eq!(err.location(), Some(&Location::new("src/b.rs", 9)));
    }

    #[test]
    fn test_distinct_names_never_conflict() {
        let mut reg = ParserRegistry::with_builtins();
        reg.register(parser("Code", "src/a.rs", 3)).unwrap();
        reg.register(parser("Slug", "src/a.rs", 3)).unwrap();
        assert!(reg.contains("Code"));
        assert!(reg.contains("Slug"));
    }

    #[test]
    fn test_builtin_conflict_mentions_builtin() {
        let mut reg = ParserRegistry::with_builtins();
        let err = reg.register(parser("int", "src/a.rs", 1)).unwrap_err();
        assert!(err.to_string().contains(BUILTIN_LOCATION));
        let err = reg.register(parser("String", "src/a.rs", 2)).unwrap_err();
        assert!(err.to_string().contains("alias"));
    }

    #[test]
    fn test_clear_custom_only_keeps_builtins() {
        let mut reg = ParserRegistry::with_builtins();
        let builtin_count = reg.len();
        reg.register(parser("Code", "src/a.rs", 3)).unwrap();
        assert_eq!(reg.len(), builtin_count + 1);
        reg.clear_custom_only();
        assert_eq!(reg.len(), builtin_count);
        assert!(!reg.contains("Code"));
        assert!(reg.contains("int"));
        assert!(reg.contains("String"));
        // the name is free again
        reg.register(parser("Code", "src/b.rs", 1)).unwrap();
    }

    #[test]
    fn test_registries_are_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<Registries>();
    }
}
