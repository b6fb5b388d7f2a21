//! # brrtwire
//!
//! **brrtwire** is a build-time wiring generator for Rust services. It reads
//! `wire::` directives from doc comments on structs, fields, methods and free
//! functions, builds a model of the application's controllers, routes,
//! services, middleware and route parameter parsers, resolves the names they
//! refer to across every scanned module, and emits one generated file per
//! module.
//!
//! ## Overview
//!
//! ```rust,ignore
//! /// wire::route_parser
//! pub fn code(ctx: &RequestContext, raw: &str) -> Result<Code, CodeError> { /* ... */ }
//!
//! /// wire::middleware Auth -Global -Priority=10
//! pub struct AuthLayer;
//! impl AuthLayer { pub fn handle(&self, req: &mut Request) { /* ... */ } }
//!
//! /// wire::controller -Prefix=/items -Middleware=Auth
//! pub struct Items {
//!     /// wire::inject
//!     repo: Arc<ItemRepository>,
//! }
//!
//! impl Items {
//!     /// wire::route GET /{id:Code}
//!     pub fn get_item(&self, id: Code) -> Item { /* ... */ }
//! }
//!
//! include!("items.wire.rs");
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules, leaves first:
//!
//! - **[`path`]** - Route path grammar (`/users/{id:int}/{*}`)
//! - **[`directive`]** - Tokenizer and parser for a single directive line
//! - **[`metadata`]** - Controllers, routes, services, middleware, parsers, interfaces
//! - **[`scanner`]** - Attaches directives to declarations in a source file
//! - **[`registry`]** - Cross-module parser and middleware tables
//! - **[`validator`]** - Resolves route parameter types and middleware names
//! - **[`linter`]** - Advisory checks that never fail a run
//! - **[`pipeline`]** - Two-phase driver: discover everything, then validate and emit
//! - **[`generator`]** - Emission contract, Askama emitter, import paths, discovery, clean mode
//! - **[`config`]** / **[`logging`]** - Run configuration and `tracing` setup
//! - **[`cli`]** - The `brrtwire-gen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(brrtwire-gen)
//!     participant Pipeline as pipeline::Pipeline
//!     participant Scanner as scanner
//!     participant Registry as registry::Registries
//!     participant Validator as validator
//!     participant Emitter as generator::TemplateEmitter
//!     participant FS as File System
//!
//!     CLI->>Pipeline: run(modules)
//!     loop every module (Phase 1)
//!         Pipeline->>Scanner: scan_module(path)
//!         Scanner-->>Pipeline: ModuleMetadata
//!         Pipeline->>Registry: register parsers + middleware
//!     end
//!     loop every module (Phase 2)
//!         Pipeline->>Validator: validate_module(module, registries)
//!     end
//!     loop modules with something to wire
//!         Pipeline->>Emitter: emit(module, registries, imports)
//!         Emitter-->>Pipeline: EmittedFile
//!         Pipeline->>FS: write a/b.wire.rs
//!     end
//! ```
//!
//! Registering everything before validating anything is what lets a route in
//! one module use a parser declared in a module scanned after it.
//!
//! ## Errors
//!
//! Every failure is a [`WireError`] carrying a [`error::Diagnostic`]: the
//! message, the module and line, context such as the route or parameter, and
//! "did you mean" suggestions.

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod metadata;
pub mod path;
pub mod pipeline;
pub mod registry;
pub mod scanner;
pub mod validator;

pub use error::{Diagnostic, ErrorKind, Location, Result, WireError};
pub use metadata::ModuleMetadata;
pub use path::PathSpecification;
pub use pipeline::{Pipeline, PipelineState, RunReport};
pub use registry::Registries;
