//! # Wiring Linter Module
//!
//! Advisory checks over scanned modules. Lint issues never stop a
//! generation run; they are logged and returned alongside the result.
//!
//! ## Checks Performed
//!
//! 1. **Handler casing** - route handlers should be snake_case
//! 2. **Middleware priority** - `-Priority` only matters together with `-Global`
//! 3. **Unbound path parameters** - every `{name}` should have a handler argument
//! 4. **Empty controllers** - a controller without routes wires nothing
//! 5. **Transient services** - injecting a transient service by value pins one instance
//!
//! The `lint` command also turns unresolved references into error-level
//! issues through [`LintIssue::from_error`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brrtwire::linter::{lint_module, print_lint_issues};
//!
//! let module = brrtwire::scanner::scan_module(path)?;
//! print_lint_issues(&lint_module(&module));
//! ```

use crate::error::WireError;
use crate::metadata::{InstanceMode, ModuleMetadata, ParamSource};
use crate::scanner::WILDCARD_ARGUMENT;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - generation would fail
    Error,
    /// Warning - probably a mistake, generation still succeeds
    Warning,
    /// Info - best practice suggestion
    Info,
}

/// A lint issue found in a scanned module
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (`src/users.rs:12`)
    pub location: String,
    /// Severity of the issue
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "handler_casing", "unbound_path_parameter")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error-level issue for a fatal wiring error.
    pub fn from_error(err: &WireError) -> Self {
        let d = err.diagnostic();
        let location = d
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let issue = LintIssue::new(location, LintSeverity::Error, err.kind().to_string(), &d.message);
        if d.suggestions.is_empty() {
            issue
        } else {
            issue.with_suggestion(format!("Did you mean: {}", d.suggestions.join(", ")))
        }
    }
}

/// Run every advisory check over one module.
pub fn lint_module(module: &ModuleMetadata) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    lint_controllers(module, &mut issues);
    lint_middleware(module, &mut issues);
    lint_transient_services(module, &mut issues);
    issues
}

fn lint_controllers(module: &ModuleMetadata, issues: &mut Vec<LintIssue>) {
    for controller in &module.controllers {
        if controller.routes.is_empty() {
            issues.push(
                LintIssue::new(
                    controller.location.to_string(),
                    LintSeverity::Warning,
                    "empty_controller",
                    format!("Controller '{}' declares no routes", controller.name),
                )
                .with_suggestion("Add `wire::route` to a method or use `wire::core` instead"),
            );
        }

        for route in &controller.routes {
            let location = route.location.to_string();

            if !is_snake_case(&route.handler) {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Warning,
                        "handler_casing",
                        format!("Handler '{}' should be snake_case", route.handler),
                    )
                    .with_suggestion(format!("Change to: {}", to_snake_case(&route.handler))),
                );
            }

            let bound = |name: &str| {
                route
                    .params
                    .iter()
                    .any(|p| p.source == ParamSource::Path && p.name == name)
            };
            for (name, _) in route.full_path.parameters() {
                if !bound(name) {
                    issues.push(
                        LintIssue::new(
                            &location,
                            LintSeverity::Warning,
                            "unbound_path_parameter",
                            format!(
                                "Path parameter '{}' of '{} {}' is not bound by handler '{}'",
                                name, route.method, route.full_path, route.handler
                            ),
                        )
                        .with_suggestion(format!("Add an argument named `{}`", name)),
                    );
                }
            }
            if route.full_path.has_wildcard() && !bound(WILDCARD_ARGUMENT) {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Info,
                        "unbound_path_parameter",
                        format!(
                            "Wildcard of '{} {}' is not bound by handler '{}'",
                            route.method, route.full_path, route.handler
                        ),
                    )
                    .with_suggestion(format!("Add an argument named `{}`", WILDCARD_ARGUMENT)),
                );
            }
        }
    }
}

fn lint_middleware(module: &ModuleMetadata, issues: &mut Vec<LintIssue>) {
    for middleware in &module.middlewares {
        if middleware.priority.is_some() && !middleware.global {
            issues.push(
                LintIssue::new(
                    middleware.location.to_string(),
                    LintSeverity::Warning,
                    "priority_without_global",
                    format!(
                        "Middleware '{}' sets -Priority but is not -Global; the priority is ignored",
                        middleware.name
                    ),
                )
                .with_suggestion("Add -Global or remove -Priority"),
            );
        }
    }
}

fn lint_transient_services(module: &ModuleMetadata, issues: &mut Vec<LintIssue>) {
    let fields = module
        .controllers
        .iter()
        .map(|c| (c.name.as_str(), c.injected().collect::<Vec<_>>()))
        .chain(
            module
                .services
                .iter()
                .map(|s| (s.name.as_str(), s.injected().collect::<Vec<_>>())),
        );
    for (owner, injected) in fields {
        for (field, dependency) in injected {
            if dependency.is_factory() {
                continue;
            }
            let Some(service) = module.service(&dependency.type_name) else {
                continue;
            };
            if service.mode == InstanceMode::Transient {
                issues.push(
                    LintIssue::new(
                        service.location.to_string(),
                        LintSeverity::Info,
                        "transient_without_factory",
                        format!(
                            "'{}.{}' injects transient service '{}' directly; it receives a single instance",
                            owner, field.name, service.name
                        ),
                    )
                    .with_suggestion(format!("Inject `fn() -> {}` to get a fresh instance per call", service.name)),
                );
            }
        }
    }
}

/// Check if a string is snake_case
pub(crate) fn is_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    // Must start with lowercase letter or underscore
    if !s
        .chars()
        .next()
        .map(|c| c.is_lowercase() || c == '_')
        .unwrap_or(false)
    {
        return false;
    }
    s.chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Convert a string to snake_case
pub(crate) fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for ch in s.chars() {
        if ch.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let group = |severity: LintSeverity| -> Vec<&LintIssue> {
        issues.iter().filter(|i| i.severity == severity).collect()
    };
    let errors = group(LintSeverity::Error);
    let warnings = group(LintSeverity::Warning);
    let infos = group(LintSeverity::Info);

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (title, list) in [
        ("❌ Errors (must fix):", errors),
        ("⚠️  Warnings (should fix):", warnings),
        ("ℹ️  Info (best practices):", infos),
    ] {
        if list.is_empty() {
            continue;
        }
        println!("{}", title);
        for issue in list {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}

/// Whether any issue is error-level
#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}
