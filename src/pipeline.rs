//! # Pipeline Module
//!
//! Two-phase orchestration of one generation run.
//!
//! ## Phases
//!
//! 1. **Discovering** - every module is scanned in order and its route parsers
//!    and middleware are registered. A name defined twice stops the run here.
//!    Import paths are resolved once all modules are known.
//! 2. **Validating / Emitting** - with the registries complete (so forward
//!    references across modules resolve), every module is validated, then
//!    each module with something to wire is handed to the [`Emitter`].
//!
//! ```text
//! Idle -> Discovering -> RegistryBuilt -> Validating -> Emitting -> Done
//!              \               \              \             \
//!               +---------------+--------------+-------------+--> Failed
//! ```
//!
//! Validation may fan out over scoped worker threads; the registries are only
//! read at that point. Errors are reported in scan order regardless of the
//! number of workers. Files already written when a later module fails to
//! emit are left in place.

use crate::config::GeneratorConfig;
use crate::error::{Diagnostic, Result, WireError};
use crate::generator::{format_file, EmittedFile, Emitter, ImportPathMap, ImportResolver, TemplateEmitter};
use crate::linter::{lint_module, LintIssue, LintSeverity};
use crate::metadata::ModuleMetadata;
use crate::registry::Registries;
use crate::scanner::scan_module;
use crate::validator::{collect_violations, validate_module};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Discovering,
    RegistryBuilt,
    Validating,
    Emitting,
    Done,
    Failed,
}

impl PipelineState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    #[must_use]
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Discovering)
            | (Discovering, RegistryBuilt)
            | (RegistryBuilt, Validating)
            | (Validating, Emitting)
            | (Emitting, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub modules_scanned: usize,
    /// Generated files, written unless the run was a dry run
    pub emitted: Vec<PathBuf>,
    /// Modules with nothing to wire
    pub skipped: Vec<PathBuf>,
    /// Advisory issues found during discovery
    pub warnings: Vec<LintIssue>,
    /// Rendered content, in emission order
    pub files: Vec<EmittedFile>,
}

/// Drives scanning, registration, validation and emission.
pub struct Pipeline {
    config: GeneratorConfig,
    emitter: Box<dyn Emitter>,
    state: PipelineState,
    modules: Vec<ModuleMetadata>,
    registries: Registries,
    imports: ImportPathMap,
    warnings: Vec<LintIssue>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(config: GeneratorConfig, emitter: Box<dyn Emitter>) -> Self {
        Self {
            config,
            emitter,
            state: PipelineState::Idle,
            modules: Vec::new(),
            registries: Registries::new(),
            imports: ImportPathMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Pipeline using the default [`TemplateEmitter`].
    pub fn with_template_emitter(config: GeneratorConfig) -> Self {
        Self::new(config, Box::new(TemplateEmitter::new()))
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Scanned modules, in scan order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleMetadata] {
        &self.modules
    }

    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    #[must_use]
    pub fn imports(&self) -> &ImportPathMap {
        &self.imports
    }

    /// Advisory issues collected during discovery.
    #[must_use]
    pub fn warnings(&self) -> &[LintIssue] {
        &self.warnings
    }

    /// Move to `next`, rejecting transitions the state machine does not allow.
    pub fn transition(&mut self, next: PipelineState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(WireError::configuration(
                Diagnostic::new(format!(
                    "illegal pipeline transition {} -> {}",
                    self.state, next
                ))
                .with_context("state", self.state.to_string()),
            ));
        }
        debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
        Ok(())
    }

    fn fail<T>(&mut self, err: WireError) -> Result<T> {
        debug!(state = %self.state, error = %err, "pipeline failed");
        if self.state.can_transition_to(PipelineState::Failed) {
            self.state = PipelineState::Failed;
        }
        Err(err)
    }

    /// Run both phases over `paths`.
    pub fn run(&mut self, paths: &[PathBuf]) -> Result<RunReport> {
        self.discover(paths)?;
        self.validate_and_emit()
    }

    /// Phase 1: scan every module and fill the registries.
    pub fn discover(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.transition(PipelineState::Discovering)?;
        match self.discover_inner(paths) {
            Ok(()) => self.transition(PipelineState::RegistryBuilt),
            Err(err) => self.fail(err),
        }
    }

    fn discover_inner(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let module = scan_module(path)?;
            self.registries.register_module(&module)?;
            for issue in lint_module(&module) {
                warn!(
                    kind = %issue.kind,
                    location = %issue.location,
                    "{}",
                    issue.message
                );
                self.warnings.push(issue);
            }
            self.modules.push(module);
        }

        let mut resolver = ImportResolver::new(self.config.root_import.as_deref())?;
        for module in &mut self.modules {
            let import = match resolver.resolve(&module.path) {
                Ok(import) => import,
                // Nothing can refer to a module without directives.
                Err(err) if module.is_empty() => {
                    debug!(module = %module.path.display(), error = %err, "no import path for module");
                    continue;
                }
                Err(err) => return Err(err),
            };
            module.set_import_path(import.to_string());
            self.imports.insert(module.path.clone(), import);
        }

        info!(
            modules = self.modules.len(),
            parsers = self.registries.parsers.len(),
            middleware = self.registries.middlewares.len(),
            "registries built"
        );
        Ok(())
    }

    /// Phase 2: validate every module, then emit.
    pub fn validate_and_emit(&mut self) -> Result<RunReport> {
        self.transition(PipelineState::Validating)?;
        if let Err(err) = self.validate_all() {
            return self.fail(err);
        }
        self.transition(PipelineState::Emitting)?;
        match self.emit_all() {
            Ok(report) => {
                self.transition(PipelineState::Done)?;
                Ok(report)
            }
            Err(err) => self.fail(err),
        }
    }

    fn validate_all(&self) -> Result<()> {
        let parsers = &self.registries.parsers;
        let middlewares = &self.registries.middlewares;
        let modules = &self.modules;
        let jobs = self.config.jobs.clamp(1, modules.len().max(1));

        if jobs == 1 {
            for module in modules {
                validate_module(module, parsers, middlewares)?;
            }
            return Ok(());
        }

        // Contiguous chunks keep the first error in scan order.
        let chunk = modules.len().div_ceil(jobs);
        let first = std::thread::scope(|s| {
            let handles: Vec<_> = modules
                .chunks(chunk)
                .map(|part| {
                    s.spawn(move || {
                        part.iter()
                            .find_map(|m| validate_module(m, parsers, middlewares).err())
                    })
                })
                .collect();
            let mut first = None;
            for handle in handles {
                match handle.join() {
                    Ok(found) => {
                        if first.is_none() {
                            first = found;
                        }
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            first
        });
        debug!(jobs, modules = modules.len(), "validated modules");
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn emit_all(&self) -> Result<RunReport> {
        let mut report = RunReport {
            modules_scanned: self.modules.len(),
            warnings: self.warnings.clone(),
            ..RunReport::default()
        };
        for module in &self.modules {
            if !module.needs_emission() {
                debug!(module = %module.path.display(), "nothing to wire, skipping");
                report.skipped.push(module.path.clone());
                continue;
            }
            let file = self.emitter.emit(module, &self.registries, &self.imports)?;
            if !self.config.dry_run {
                write_file(&file)?;
                if self.config.format {
                    if let Err(e) = format_file(&file.path) {
                        warn!(path = %file.path.display(), error = %e, "rustfmt failed; keeping unformatted output");
                    }
                }
            }
            info!(
                module = %module.path.display(),
                output = %file.path.display(),
                dry_run = self.config.dry_run,
                "emitted wiring"
            );
            report.emitted.push(file.path.clone());
            report.files.push(file);
        }
        Ok(report)
    }

    /// Every error-level reference problem plus advisory issues, per module.
    ///
    /// Unlike [`Pipeline::validate_and_emit`] this keeps going after the
    /// first unresolved reference. Requires a completed discovery.
    pub fn lint_issues(&self) -> Result<Vec<LintIssue>> {
        if self.state != PipelineState::RegistryBuilt {
            return Err(WireError::configuration(Diagnostic::new(format!(
                "lint needs built registries, pipeline is {}",
                self.state
            ))));
        }
        let mut issues = Vec::new();
        for module in &self.modules {
            issues.extend(
                collect_violations(module, &self.registries.parsers, &self.registries.middlewares)
                    .iter()
                    .map(LintIssue::from_error),
            );
        }
        issues.extend(self.warnings.iter().cloned());
        issues.sort_by_key(|i| match i.severity {
            LintSeverity::Error => 0,
            LintSeverity::Warning => 1,
            LintSeverity::Info => 2,
        });
        Ok(issues)
    }
}

fn write_file(file: &EmittedFile) -> Result<()> {
    fs::write(&file.path, &file.content).map_err(|e| WireError::io("write", &file.path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::generator::GENERATED_MARKER;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"shop\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let mut paths = Vec::new();
        for (name, src) in files {
            let path = dir.path().join("src").join(name);
            fs::write(&path, src).unwrap();
            paths.push(path);
        }
        (dir, paths)
    }

    fn config(jobs: usize) -> GeneratorConfig {
        GeneratorConfig {
            root_import: None,
            jobs,
            dry_run: false,
            format: false,
        }
    }

    const PARSERS: &str = r#"
/// wire::route_parser
pub fn code(ctx: &Context, raw: &str) -> Result<Code, CodeError> { todo!() }
"#;

    const ITEMS: &str = r#"
/// wire::controller
pub struct Items;

impl Items {
    /// wire::route GET /items/{id:Code}
    pub fn get(&self, id: Code) {}
}
"#;

    #[test]
    fn test_state_transitions() {
        use PipelineState::*;
        assert!(Idle.can_transition_to(Discovering));
        assert!(Discovering.can_transition_to(Failed));
        assert!(!Idle.can_transition_to(Validating));
        assert!(!Done.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Idle));
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let mut pipeline = Pipeline::with_template_emitter(config(1));
        let err = pipeline.validate_and_emit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_run_writes_and_skips_parser_only_modules() {
        let (_dir, paths) = project(&[("items.rs", ITEMS), ("parsers.rs", PARSERS)]);
        let mut pipeline = Pipeline::with_template_emitter(config(1));
        let report = pipeline.run(&paths).unwrap();

        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(report.modules_scanned, 2);
        assert_eq!(report.skipped, vec![paths[1].clone()]);
        let written = paths[0].with_file_name("items.wire.rs");
        assert!(report.emitted.contains(&written));
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with(GENERATED_MARKER));
        assert!(content.contains(r#"Some("crate::parsers::code")"#));
        assert_eq!(
            pipeline.modules()[0].import_path.as_deref(),
            Some("shop::items")
        );
    }

    #[test]
    fn test_every_module_gets_an_import_path() {
        let (_dir, paths) = project(&[
            ("items.rs", ITEMS),
            ("parsers.rs", PARSERS),
            ("util.rs", "pub fn helper() {}\n"),
            ("bad-name.rs", "pub fn helper() {}\n"),
        ]);
        let mut pipeline = Pipeline::with_template_emitter(config(1));
        pipeline.discover(&paths).unwrap();
        assert_eq!(pipeline.imports().len(), 3);
        assert_eq!(
            pipeline.modules()[2].import_path.as_deref(),
            Some("shop::util")
        );
        assert_eq!(pipeline.modules()[3].import_path, None);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, paths) = project(&[("items.rs", ITEMS), ("parsers.rs", PARSERS)]);
        let mut pipeline = Pipeline::with_template_emitter(GeneratorConfig {
            dry_run: true,
            ..config(1)
        });
        let report = pipeline.run(&paths).unwrap();
        assert_eq!(report.files.len(), 1);
        assert!(!paths[0].with_file_name("items.wire.rs").exists());
    }

    #[test]
    fn test_parallel_validation_reports_first_in_scan_order() {
        let broken = |ty: &str| {
            format!(
                "/// wire::controller\npub struct C{ty};\nimpl C{ty} {{\n    /// wire::route GET /x/{{id:{ty}}}\n    pub fn get(&self, id: String) {{}}\n}}\n"
            )
        };
        let a = broken("Alpha");
        let b = broken("Beta");
        let c = broken("Gamma");
        let (_dir, paths) = project(&[("a.rs", &a), ("b.rs", &b), ("c.rs", &c), ("items.rs", ITEMS)]);

        let mut pipeline = Pipeline::with_template_emitter(config(4));
        let err = pipeline.run(&paths).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.to_string().contains("Alpha"), "{err}");
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert!(!paths[3].with_file_name("items.wire.rs").exists());
    }

    #[test]
    fn test_conflict_fails_discovery() {
        let (_dir, paths) = project(&[("p1.rs", PARSERS), ("p2.rs", PARSERS)]);
        let mut pipeline = Pipeline::with_template_emitter(config(1));
        let err = pipeline.discover(&paths).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_lint_issues_aggregate() {
        let src = r#"
/// wire::controller -Middleware=Missing
pub struct Items;

impl Items {
    /// wire::route GET /items/{id:Nope}
    pub fn getItem(&self, id: String) {}
}
"#;
        let (_dir, paths) = project(&[("items.rs", src)]);
        let mut pipeline = Pipeline::with_template_emitter(config(1));
        pipeline.discover(&paths).unwrap();
        let issues = pipeline.lint_issues().unwrap();
        let errors = issues
            .iter()
            .filter(|i| i.severity == LintSeverity::Error)
            .count();
        assert_eq!(errors, 2);
        assert_eq!(issues.last().unwrap().kind, "handler_casing");
    }
}
