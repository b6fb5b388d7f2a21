//! # Validator Module
//!
//! Resolves the names a module refers to against the completed registries.
//!
//! Every path or query parameter's parser type must be registered (directly
//! or through an alias), whether or not a handler argument binds it, and
//! every middleware named by a controller or route
//! must be registered. [`validate_module`] stops at the first violation;
//! [`collect_violations`] keeps going and returns all of them.

use crate::error::{suggest, Diagnostic, WireError};
use crate::metadata::{Controller, ModuleMetadata, ParamSource, Route};
use crate::registry::{MiddlewareRegistry, ParserRegistry};
use std::ops::ControlFlow;

/// Validate one module, failing on the first unresolved reference.
///
/// # Errors
///
/// Returns a `ReferenceError` naming the route, parameter or middleware at
/// fault, with known names as suggestions.
pub fn validate_module(
    module: &ModuleMetadata,
    parsers: &ParserRegistry,
    middlewares: &MiddlewareRegistry,
) -> crate::Result<()> {
    let mut first = None;
    check(module, parsers, middlewares, &mut |err: WireError| {
        first = Some(err);
        ControlFlow::Break(())
    });
    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every unresolved reference in the module, in declaration order.
pub fn collect_violations(
    module: &ModuleMetadata,
    parsers: &ParserRegistry,
    middlewares: &MiddlewareRegistry,
) -> Vec<WireError> {
    let mut all = Vec::new();
    check(module, parsers, middlewares, &mut |err: WireError| {
        all.push(err);
        ControlFlow::Continue(())
    });
    all
}

type Sink<'a> = dyn FnMut(WireError) -> ControlFlow<()> + 'a;

fn check(
    module: &ModuleMetadata,
    parsers: &ParserRegistry,
    middlewares: &MiddlewareRegistry,
    sink: &mut Sink<'_>,
) {
    for controller in &module.controllers {
        if check_controller(controller, parsers, middlewares, sink).is_break() {
            return;
        }
    }
}

fn check_controller(
    controller: &Controller,
    parsers: &ParserRegistry,
    middlewares: &MiddlewareRegistry,
    sink: &mut Sink<'_>,
) -> ControlFlow<()> {
    for name in &controller.middleware {
        if !middlewares.contains(name) {
            sink(unknown_middleware(
                name,
                &format!("controller `{}`", controller.name),
                controller,
                None,
                middlewares,
            ))?;
        }
    }

    for route in &controller.routes {
        for param in &route.params {
            let Some(ty) = &param.parser_type else {
                continue;
            };
            if !parsers.contains(ty) {
                let kind = param.source.to_string();
                sink(unknown_parser(controller, route, &kind, &param.name, ty, parsers))?;
            }
        }

        // Path segments no handler argument binds still need a parser.
        for (name, ty) in route.full_path.parameters() {
            let bound = route
                .params
                .iter()
                .any(|p| p.source == ParamSource::Path && p.name == name);
            if !bound && !parsers.contains(ty) {
                sink(unknown_parser(controller, route, "path", name, ty, parsers))?;
            }
        }

        for name in &route.middleware {
            if !middlewares.contains(name) {
                sink(unknown_middleware(
                    name,
                    &format!("route `{}`", describe_route(route)),
                    controller,
                    Some(route),
                    middlewares,
                ))?;
            }
        }
    }
    ControlFlow::Continue(())
}

fn unknown_parser(
    controller: &Controller,
    route: &Route,
    source: &str,
    name: &str,
    ty: &str,
    parsers: &ParserRegistry,
) -> WireError {
    WireError::reference(
        Diagnostic::new(format!(
            "route `{}` ({}::{}): {} parameter `{}` has type `{}`, which has no registered parser",
            describe_route(route),
            controller.name,
            route.handler,
            source,
            name,
            ty
        ))
        .at(route.location.clone())
        .with_context("route", describe_route(route))
        .with_context("handler", route.handler.clone())
        .with_context("parameter", name)
        .with_context("type", ty)
        .with_suggestions(suggest(ty, parsers.known_names())),
    )
}

fn describe_route(route: &Route) -> String {
    format!("{} {}", route.method, route.full_path)
}

fn unknown_middleware(
    name: &str,
    referrer: &str,
    controller: &Controller,
    route: Option<&Route>,
    middlewares: &MiddlewareRegistry,
) -> WireError {
    let location = route.map_or(&controller.location, |r| &r.location);
    let mut diagnostic = Diagnostic::new(format!(
        "{} references unknown middleware `{}`",
        referrer, name
    ))
    .at(location.clone())
    .with_context("middleware", name)
    .with_context("controller", controller.name.clone())
    .with_suggestions(suggest(name, middlewares.known_names()));
    if let Some(route) = route {
        diagnostic = diagnostic
            .with_context("route", describe_route(route))
            .with_context("handler", route.handler.clone());
    }
    WireError::reference(diagnostic)
}

/// Print aggregated violations to stderr.
pub fn print_violations(violations: &[WireError]) {
    eprintln!(
        "\n❌ Wiring validation failed. {} issue(s) found:\n",
        violations.len()
    );
    for err in violations {
        let d = err.diagnostic();
        match &d.location {
            Some(loc) => eprintln!("[{}] {}: {}", err.kind(), loc, d.message),
            None => eprintln!("[{}] {}", err.kind(), d.message),
        }
        if !d.suggestions.is_empty() {
            eprintln!("      💡 Did you mean: {}", d.suggestions.join(", "));
        }
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registry::Registries;
    use crate::scanner::scan_source;
    use std::path::Path;

    const ITEMS: &str = r#"
/// wire::controller -Middleware=Auth
pub struct Items;

impl Items {
    /// wire::route GET /items/{id:Code} -Middleware=Missing
    pub fn get(&self, id: Code, page: Option<u32>) {}

    /// wire::route GET /items/{slug:Slugg}
    pub fn by_slug(&self, slug: String) {}
}
"#;

    fn registries() -> Registries {
        let mut r = Registries::new();
        let defs = scan_source(
            Path::new("src/defs.rs"),
            r#"
/// wire::route_parser
pub fn code(ctx: &RequestContext, raw: &str) -> Result<Code, ParseError> { todo!() }

/// wire::middleware
pub struct Auth;
impl Auth { pub fn handle(&self) {} }
"#,
        )
        .unwrap();
        r.register_module(&defs).unwrap();
        r
    }

    #[test]
    fn test_fail_fast_reports_first_violation() {
        let r = registries();
        let m = scan_source(Path::new("src/items.rs"), ITEMS).unwrap();
        let err = validate_module(&m, &r.parsers, &r.middlewares).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.to_string().contains("`Missing`"), "{err}");
        assert_eq!(err.suggestions(), ["Auth".to_string()]);
        assert_eq!(err.location().map(|l| l.line), Some(6));
    }

    #[test]
    fn test_collect_violations_aggregates() {
        let r = registries();
        let m = scan_source(Path::new("src/items.rs"), ITEMS).unwrap();
        let all = collect_violations(&m, &r.parsers, &r.middlewares);
        assert_eq!(all.len(), 2);
        let slug = &all[1];
        assert!(slug.to_string().contains("Slugg"));
        assert_eq!(slug.diagnostic().context.get("parameter").map(String::as_str), Some("slug"));
        assert!(!slug.suggestions().is_empty());
    }

    #[test]
    fn test_unknown_parser_lists_known_types() {
        let r = Registries::new();
        let m = scan_source(
            Path::new("src/items.rs"),
            "/// wire::controller\npub struct C;\nimpl C {\n    /// wire::route GET /{id:Kode}\n    pub fn get(&self, id: Kode) {}\n}\n",
        )
        .unwrap();
        let err = validate_module(&m, &r.parsers, &r.middlewares).unwrap_err();
        assert!(err.to_string().contains("Kode"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_unbound_path_segment_type_is_checked() {
        let r = registries();
        let m = scan_source(
            Path::new("src/items.rs"),
            "/// wire::controller\npub struct C;\nimpl C {\n    /// wire::route GET /items/{id:Bogus}/{code:Code}\n    pub fn get(&self, code: Code) {}\n}\n",
        )
        .unwrap();
        let all = collect_violations(&m, &r.parsers, &r.middlewares);
        assert_eq!(all.len(), 1, "{all:?}");
        let err = &all[0];
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.to_string().contains("`Bogus`"), "{err}");
        assert_eq!(err.diagnostic().context.get("parameter").map(String::as_str), Some("id"));
        assert_eq!(err.location().map(|l| l.line), Some(4));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_bound_path_parameter_reported_once() {
        let r = Registries::new();
        let m = scan_source(
            Path::new("src/items.rs"),
            "/// wire::controller\npub struct C;\nimpl C {\n    /// wire::route GET /{id:Kode}\n    pub fn get(&self, id: Kode) {}\n}\n",
        )
        .unwrap();
        assert_eq!(collect_violations(&m, &r.parsers, &r.middlewares).len(), 1);
    }

    #[test]
    fn test_builtins_and_aliases_resolve() {
        let r = Registries::new();
        let m = scan_source(
            Path::new("src/items.rs"),
            "/// wire::controller\npub struct C;\nimpl C {\n    /// wire::route GET /{id:int}/{name}\n    pub fn get(&self, id: i64, name: String, q: Option<String>, n: usize, body: Payload) {}\n}\n",
        )
        .unwrap();
        validate_module(&m, &r.parsers, &r.middlewares).unwrap();
    }
}
