//! # Metadata Module
//!
//! The in-memory semantic graph extracted from one scanned module.
//!
//! Records are produced once by the scanner during discovery and are treated
//! as immutable afterwards. The only later mutation is attaching the module's
//! resolved import path before emission.

mod types;

pub use types::{
    Controller, Dependency, DependencyShape, FieldRole, FieldSpec, HttpMethod, InstanceMode,
    Interface, Lifecycle, MethodSignature, Middleware, ParamSource, ParserDefinition, Route,
    RouteParameter, Service, ServiceKind, DEFAULT_PRIORITY, LIFECYCLE_START, MIDDLEWARE_HANDLER,
};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the scanner found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleMetadata {
    /// Path of the scanned file
    pub path: PathBuf,
    /// Rust module path (`crate::a::b` style, without `crate::`), once resolved
    pub import_path: Option<String>,
    pub controllers: Vec<Controller>,
    pub services: Vec<Service>,
    pub middlewares: Vec<Middleware>,
    pub parsers: Vec<ParserDefinition>,
    pub interfaces: Vec<Interface>,
}

impl ModuleMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// No directive of any kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
            && self.services.is_empty()
            && self.middlewares.is_empty()
            && self.parsers.is_empty()
            && self.interfaces.is_empty()
    }

    /// Whether the module has anything to instantiate.
    ///
    /// Parser-only modules are skipped: parser functions are referenced by
    /// generated code, never constructed.
    #[must_use]
    pub fn needs_emission(&self) -> bool {
        !(self.controllers.is_empty()
            && self.services.is_empty()
            && self.middlewares.is_empty()
            && self.interfaces.is_empty())
    }

    /// Controllers ordered by priority; declaration order breaks ties.
    #[must_use]
    pub fn controllers_by_priority(&self) -> Vec<&Controller> {
        let mut controllers: Vec<&Controller> = self.controllers.iter().collect();
        controllers.sort_by_key(|c| c.priority);
        controllers
    }

    pub fn controller(&self, name: &str) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Every route in the module along with its owning controller.
    pub fn routes(&self) -> impl Iterator<Item = (&Controller, &Route)> {
        self.controllers
            .iter()
            .flat_map(|c| c.routes.iter().map(move |r| (c, r)))
    }

    pub fn set_import_path(&mut self, import_path: impl Into<String>) {
        self.import_path = Some(import_path.into());
    }
}
