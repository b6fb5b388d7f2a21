//! # Scanner Module
//!
//! Walks the top-level declarations of one Rust source file, attaches the
//! `wire::` directives found in their doc comments and extracts a
//! [`ModuleMetadata`].
//!
//! Only declarations and their doc comments matter. Function bodies are never
//! looked at, and inline `mod { .. }` blocks are not descended into.
//!
//! Where each directive may appear:
//!
//! | directive                           | declaration                                   |
//! |-------------------------------------|-----------------------------------------------|
//! | `controller`, `core`, `logger`      | struct                                        |
//! | `middleware`                        | struct with a `handle` method                 |
//! | `interface`                         | controller or service struct                  |
//! | `route`                             | method in an inherent impl of a controller    |
//! | `inject`, `init`                    | named field of a controller or service        |
//! | `route_parser`                      | free function `fn(&Ctx, &str) -> Result<T, E>`|
//!
//! The scanner never touches the registries. References to parsers and
//! middleware are recorded by name and resolved later.

mod docs;
pub mod types;

pub use docs::{doc_lines, DocLine};

use crate::directive::{parse_doc_lines, Directive, DirectiveKind, LocatedDirective, ServiceArgs};
use crate::error::{Diagnostic, Location, Result, WireError};
use crate::metadata::{
    Controller, FieldRole, FieldSpec, Interface, Lifecycle, MethodSignature, Middleware,
    ModuleMetadata, ParamSource, ParserDefinition, Route, RouteParameter, Service, ServiceKind,
    LIFECYCLE_START, MIDDLEWARE_HANDLER,
};
use crate::path::{is_identifier, PathSpecification, DEFAULT_PARAMETER_TYPE};
use std::fs;
use std::path::Path;
use syn::spanned::Spanned;
use syn::{FnArg, ImplItem, ImplItemFn, Item, ItemFn, ItemStruct, Pat, Type, Visibility};
use tracing::debug;
use types::{
    classify_dependency, is_context_like, is_error_like, is_string_like, last_ident, render_return,
    render_type, result_parts, strip_reference, unwrap_option,
};

/// Argument name that binds the `{*}` wildcard.
pub const WILDCARD_ARGUMENT: &str = "wildcard";

/// Argument name that binds the request body.
pub const BODY_ARGUMENT: &str = "body";

/// Shape every route parser must have.
pub const PARSER_SHAPE: &str = "fn(&Context, &str) -> Result<T, E>";

/// Read and scan a module from disk.
pub fn scan_module(path: &Path) -> Result<ModuleMetadata> {
    let source = fs::read_to_string(path).map_err(|e| WireError::io("read", path, e))?;
    scan_source(path, &source)
}

/// Scan already-loaded source text. `path` is only used for locations.
pub fn scan_source(path: &Path, source: &str) -> Result<ModuleMetadata> {
    let file = syn::parse_file(source).map_err(|e| {
        let line = e.span().start().line.max(1);
        WireError::syntax(
            Diagnostic::new(format!("failed to parse {}: {}", path.display(), e))
                .at(Location::new(path, line)),
        )
    })?;
    let metadata = ModuleScanner::new(path).scan(&file)?;
    debug!(
        module = %path.display(),
        controllers = metadata.controllers.len(),
        services = metadata.services.len(),
        middlewares = metadata.middlewares.len(),
        parsers = metadata.parsers.len(),
        interfaces = metadata.interfaces.len(),
        "scanned module"
    );
    Ok(metadata)
}

/// A method found in an impl block, with its parsed directives.
struct MethodEntry<'f> {
    owner: String,
    func: &'f ImplItemFn,
    inherent: bool,
    directives: Vec<LocatedDirective>,
}

impl MethodEntry<'_> {
    fn name(&self) -> String {
        self.func.sig.ident.to_string()
    }

    fn is_route(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d.directive, Directive::Route { .. }))
    }
}

struct ModuleScanner<'p> {
    path: &'p Path,
    metadata: ModuleMetadata,
}

impl<'p> ModuleScanner<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            metadata: ModuleMetadata::new(path),
        }
    }

    fn directives(&self, attrs: &[syn::Attribute]) -> Result<Vec<LocatedDirective>> {
        let lines = doc_lines(attrs);
        parse_doc_lines(self.path, lines.iter().map(|l| (l.text.as_str(), l.line)))
    }

    fn scan(mut self, file: &syn::File) -> Result<ModuleMetadata> {
        let methods = self.index_methods(file)?;

        for item in &file.items {
            match item {
                Item::Struct(s) => self.scan_struct(s, &methods)?,
                Item::Fn(f) => self.scan_fn(f)?,
                Item::Impl(i) => {
                    if let Some(d) = self.directives(&i.attrs)?.into_iter().next() {
                        return Err(misplaced(&d, "impl block", &render_type(&i.self_ty)));
                    }
                }
                other => {
                    let attrs = item_attrs(other);
                    if let Some(d) = self.directives(attrs)?.into_iter().next() {
                        return Err(misplaced(&d, item_description(other), ""));
                    }
                }
            }
        }

        // routes on types that never became controllers
        for entry in &methods {
            let Some(d) = entry.directives.first() else {
                continue;
            };
            if self.metadata.controller(&entry.owner).is_none() {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "`{}` on `{}::{}` requires `{}` to be declared with `wire::controller` in this module",
                        d.directive.kind(),
                        entry.owner,
                        entry.name(),
                        entry.owner
                    ))
                    .at(d.location.clone())
                    .with_context("handler", entry.name()),
                ));
            }
        }

        Ok(self.metadata)
    }

    /// Parse directives on every impl method up front so struct scanning can
    /// look up routes, `handle` and `start` by owner.
    fn index_methods<'f>(&self, file: &'f syn::File) -> Result<Vec<MethodEntry<'f>>> {
        let mut entries = Vec::new();
        for item in &file.items {
            let Item::Impl(block) = item else {
                continue;
            };
            let Some(owner) = last_ident(&block.self_ty) else {
                continue;
            };
            let inherent = block.trait_.is_none();
            for impl_item in &block.items {
                let ImplItem::Fn(func) = impl_item else {
                    continue;
                };
                let directives = self.directives(&func.attrs)?;
                for d in &directives {
                    if d.directive.kind() != DirectiveKind::Route {
                        return Err(misplaced(d, "method", &format!("{}::{}", owner, func.sig.ident)));
                    }
                    if !inherent {
                        return Err(WireError::syntax(
                            Diagnostic::new(format!(
                                "`wire::route` on `{}::{}` must be in an inherent impl, not a trait impl",
                                owner, func.sig.ident
                            ))
                            .at(d.location.clone()),
                        ));
                    }
                }
                entries.push(MethodEntry {
                    owner: owner.clone(),
                    func,
                    inherent,
                    directives,
                });
            }
        }
        Ok(entries)
    }

    fn scan_struct(&mut self, item: &ItemStruct, methods: &[MethodEntry<'_>]) -> Result<()> {
        let name = item.ident.to_string();
        let mut role: Option<LocatedDirective> = None;
        let mut interface: Option<LocatedDirective> = None;

        for d in self.directives(&item.attrs)? {
            match d.directive.kind() {
                DirectiveKind::Controller
                | DirectiveKind::Core
                | DirectiveKind::Logger
                | DirectiveKind::Middleware => {
                    if let Some(prev) = &role {
                        return Err(WireError::syntax(
                            Diagnostic::new(format!(
                                "struct `{}` is declared both `{}` (line {}) and `{}`",
                                name,
                                prev.directive.kind(),
                                prev.location.line,
                                d.directive.kind()
                            ))
                            .at(d.location.clone()),
                        ));
                    }
                    role = Some(d);
                }
                DirectiveKind::Interface => {
                    if interface.is_some() {
                        return Err(WireError::syntax(
                            Diagnostic::new(format!("struct `{}` has more than one `wire::interface`", name))
                                .at(d.location.clone()),
                        ));
                    }
                    interface = Some(d);
                }
                _ => return Err(misplaced(&d, "struct", &name)),
            }
        }

        let Some(role) = role else {
            if let Some(d) = interface {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "`wire::interface` on `{}` requires `wire::controller`, `wire::core` or `wire::logger`",
                        name
                    ))
                    .at(d.location),
                ));
            }
            return self.reject_field_directives(item, &name);
        };

        let location = role.location.clone();
        match role.directive {
            Directive::Controller {
                prefix,
                middleware,
                priority,
            } => {
                let fields = self.fields(item, &name)?;
                let routes = self.routes(&name, prefix.as_deref(), methods)?;
                self.metadata.controllers.push(Controller {
                    name: name.clone(),
                    prefix,
                    middleware,
                    priority,
                    fields,
                    routes,
                    location,
                });
            }
            Directive::Core(args) => self.service(item, &name, ServiceKind::Core, args, location, methods)?,
            Directive::Logger(args) => {
                self.service(item, &name, ServiceKind::Logger, args, location, methods)?;
            }
            Directive::Middleware {
                name: logical,
                global,
                priority,
            } => {
                if let Some(d) = &interface {
                    return Err(misplaced(d, "middleware", &name));
                }
                self.reject_field_directives(item, &name)?;
                let has_handler = methods
                    .iter()
                    .any(|m| m.owner == name && m.func.sig.ident == MIDDLEWARE_HANDLER);
                if !has_handler {
                    return Err(WireError::signature(
                        Diagnostic::new(format!(
                            "middleware `{}` has no `{}` method; expected `fn {}(&self, ..)` in an impl block of `{}`",
                            name, MIDDLEWARE_HANDLER, MIDDLEWARE_HANDLER, name
                        ))
                        .at(location)
                        .with_context("middleware", name.clone()),
                    ));
                }
                self.metadata.middlewares.push(Middleware {
                    name: logical.unwrap_or_else(|| name.clone()),
                    type_name: name.clone(),
                    global,
                    priority,
                    handler: MIDDLEWARE_HANDLER.to_string(),
                    location,
                });
            }
            other => {
                let d = LocatedDirective {
                    directive: other,
                    location,
                };
                return Err(misplaced(&d, "struct", &name));
            }
        }

        if let Some(d) = interface {
            self.interface(&name, d, methods)?;
        }
        Ok(())
    }

    fn service(
        &mut self,
        item: &ItemStruct,
        name: &str,
        kind: ServiceKind,
        args: ServiceArgs,
        location: Location,
        methods: &[MethodEntry<'_>],
    ) -> Result<()> {
        let fields = self.fields(item, name)?;
        let start_hook = if args.lifecycle == Lifecycle::None {
            None
        } else {
            let hook = methods
                .iter()
                .filter(|m| m.owner == name && m.inherent)
                .find(|m| m.func.sig.ident == LIFECYCLE_START)
                .and_then(|m| method_signature(m.func))
                .filter(|hook| hook.params.is_empty());
            match hook {
                Some(hook) => Some(hook),
                None => {
                    return Err(WireError::signature(
                        Diagnostic::new(format!(
                            "service `{}` declares `-Init` but has no `fn {}(&self)` method",
                            name, LIFECYCLE_START
                        ))
                        .at(location)
                        .with_context("service", name),
                    ))
                }
            }
        };
        self.metadata.services.push(Service {
            name: name.to_string(),
            kind,
            mode: args.mode,
            lifecycle: args.lifecycle,
            fields,
            start_hook,
            location,
        });
        Ok(())
    }

    fn fields(&self, item: &ItemStruct, owner: &str) -> Result<Vec<FieldSpec>> {
        let named = match &item.fields {
            syn::Fields::Named(named) => named,
            syn::Fields::Unit => return Ok(Vec::new()),
            syn::Fields::Unnamed(_) => {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "`{}` must have named fields or be a unit struct to be wired",
                        owner
                    ))
                    .at(Location::new(self.path, item.span().start().line)),
                ))
            }
        };

        let mut fields = Vec::new();
        for field in &named.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let field_name = ident.to_string();
            let mut role = FieldRole::Plain;
            for d in self.directives(&field.attrs)? {
                if !matches!(role, FieldRole::Plain) {
                    return Err(WireError::syntax(
                        Diagnostic::new(format!(
                            "field `{}.{}` carries more than one of `wire::inject`/`wire::init`",
                            owner, field_name
                        ))
                        .at(d.location),
                    ));
                }
                role = match d.directive {
                    Directive::Inject => {
                        let dependency = classify_dependency(&field.ty).ok_or_else(|| {
                            WireError::syntax(
                                Diagnostic::new(format!(
                                    "field `{}.{}` has type `{}`, which is neither a dependency nor a zero-argument factory",
                                    owner,
                                    field_name,
                                    render_type(&field.ty)
                                ))
                                .at(d.location.clone())
                                .with_context("field", field_name.clone())
                                .with_suggestions([
                                    "T",
                                    "Arc<T>",
                                    "Arc<dyn Trait>",
                                    "fn() -> T",
                                    "Box<dyn Fn() -> T>",
                                ]),
                            )
                        })?;
                        FieldRole::Injected { dependency }
                    }
                    Directive::Init => FieldRole::Init,
                    _ => return Err(misplaced(&d, "field", &format!("{}.{}", owner, field_name))),
                };
            }
            fields.push(FieldSpec {
                name: field_name,
                ty: render_type(&field.ty),
                role,
            });
        }
        Ok(fields)
    }

    fn reject_field_directives(&self, item: &ItemStruct, owner: &str) -> Result<()> {
        for field in &item.fields {
            if let Some(d) = self.directives(&field.attrs)?.into_iter().next() {
                let field_name = field
                    .ident
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "field `{}.{}` carries `{}`, but `{}` is neither a controller nor a service",
                        owner,
                        field_name,
                        d.directive.kind(),
                        owner
                    ))
                    .at(d.location),
                ));
            }
        }
        Ok(())
    }

    fn routes(
        &self,
        controller: &str,
        prefix: Option<&str>,
        methods: &[MethodEntry<'_>],
    ) -> Result<Vec<Route>> {
        let mut routes = Vec::new();
        for entry in methods.iter().filter(|m| m.owner == controller) {
            for d in &entry.directives {
                routes.push(self.route(controller, prefix, entry.func, d)?);
            }
        }
        Ok(routes)
    }

    fn route(
        &self,
        controller: &str,
        prefix: Option<&str>,
        func: &ImplItemFn,
        d: &LocatedDirective,
    ) -> Result<Route> {
        let Directive::Route {
            method,
            path,
            middleware,
            priority,
            pass_context,
        } = &d.directive
        else {
            return Err(misplaced(d, "method", &func.sig.ident.to_string()));
        };
        let handler = func.sig.ident.to_string();
        let qualified = format!("{}::{}", controller, handler);

        let full_path = match prefix {
            Some(prefix) => {
                PathSpecification::join(prefix, &path.render()).map_err(|e| e.or_at(&d.location))?
            }
            None => path.clone(),
        };

        if func.sig.receiver().is_none() {
            return Err(WireError::signature(
                Diagnostic::new(format!("route handler `{}` must take `&self`", qualified))
                    .at(d.location.clone())
                    .with_context("handler", qualified),
            ));
        }

        let mut typed = func.sig.inputs.iter().filter_map(|arg| match arg {
            FnArg::Typed(t) => Some(t),
            FnArg::Receiver(_) => None,
        });

        let context_type = if *pass_context {
            match typed.next() {
                Some(arg) => Some(render_type(&arg.ty)),
                None => {
                    return Err(WireError::signature(
                        Diagnostic::new(format!(
                            "route `{}` sets `-PassContext` but handler `{}` has no context parameter",
                            full_path, qualified
                        ))
                        .at(d.location.clone())
                        .with_context("handler", qualified),
                    ))
                }
            }
        } else {
            None
        };

        let mut params = Vec::new();
        for arg in typed {
            let Pat::Ident(pat) = &*arg.pat else {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "arguments of route handler `{}` must be plain identifiers",
                        qualified
                    ))
                    .at(d.location.clone()),
                ));
            };
            let name = pat.ident.to_string();
            let (inner, optional) = unwrap_option(&arg.ty);
            let (source, parser_type) = if name == WILDCARD_ARGUMENT && full_path.has_wildcard() {
                (ParamSource::Path, Some(DEFAULT_PARAMETER_TYPE.to_string()))
            } else if let Some(ty) = full_path.parameter_type(&name) {
                (ParamSource::Path, Some(ty.to_string()))
            } else if name == BODY_ARGUMENT {
                (ParamSource::Body, None)
            } else {
                let ty = query_parser_type(inner).ok_or_else(|| {
                    WireError::signature(
                        Diagnostic::new(format!(
                            "query parameter `{}` of `{}` has type `{}`, which does not name a parser type",
                            name,
                            qualified,
                            render_type(&arg.ty)
                        ))
                        .at(d.location.clone())
                        .with_context("route", full_path.render())
                        .with_context("parameter", name.clone()),
                    )
                })?;
                (ParamSource::Query, Some(ty))
            };
            params.push(RouteParameter {
                name,
                rust_type: render_type(&arg.ty),
                parser_type,
                source,
                optional,
            });
        }

        Ok(Route {
            handler,
            method: *method,
            path: path.clone(),
            full_path,
            middleware: middleware.clone(),
            priority: *priority,
            pass_context: *pass_context,
            context_type,
            params,
            returns: render_return(&func.sig.output),
            location: d.location.clone(),
        })
    }

    fn interface(&mut self, owner: &str, d: LocatedDirective, methods: &[MethodEntry<'_>]) -> Result<()> {
        let Directive::Interface { name } = d.directive else {
            return Ok(());
        };
        let name = name.unwrap_or_else(|| format!("{}Interface", owner));
        if !is_identifier(&name) {
            return Err(WireError::syntax(
                Diagnostic::new(format!("interface name `{}` is not a valid identifier", name))
                    .at(d.location),
            ));
        }
        let exported = methods
            .iter()
            .filter(|m| m.owner == owner && m.inherent && !m.is_route())
            .filter(|m| matches!(m.func.vis, Visibility::Public(_)))
            .filter_map(|m| method_signature(m.func))
            .collect();
        self.metadata.interfaces.push(Interface {
            name,
            implementor: owner.to_string(),
            methods: exported,
            location: d.location,
        });
        Ok(())
    }

    fn scan_fn(&mut self, item: &ItemFn) -> Result<()> {
        let function = item.sig.ident.to_string();
        let mut seen = false;
        for d in self.directives(&item.attrs)? {
            let Directive::RouteParser { name } = &d.directive else {
                return Err(misplaced(&d, "function", &function));
            };
            if seen {
                return Err(WireError::syntax(
                    Diagnostic::new(format!("function `{}` has more than one `wire::route_parser`", function))
                        .at(d.location.clone()),
                ));
            }
            seen = true;
            let definition = parser_definition(item, name.clone(), d.location.clone())?;
            self.metadata.parsers.push(definition);
        }
        Ok(())
    }
}

/// Check a route parser's signature and build its definition.
fn parser_definition(item: &ItemFn, explicit: Option<String>, location: Location) -> Result<ParserDefinition> {
    let function = item.sig.ident.to_string();
    let inputs: Vec<&Type> = item
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(t) => Some(&*t.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let actual = format!(
        "fn({}){}",
        inputs.iter().map(|t| render_type(t)).collect::<Vec<_>>().join(", "),
        render_return(&item.sig.output)
            .map(|r| format!(" -> {}", r))
            .unwrap_or_default()
    );
    let mismatch = |problem: String| {
        WireError::signature(
            Diagnostic::new(format!(
                "route parser `{}` has signature `{}`, expected `{}`: {}",
                function, actual, PARSER_SHAPE, problem
            ))
            .at(location.clone())
            .with_context("parser", function.clone())
            .with_context("expected", PARSER_SHAPE)
            .with_context("actual", actual.clone()),
        )
    };

    if item.sig.asyncness.is_some() {
        return Err(mismatch("parsers must not be async".into()));
    }
    if inputs.len() != 2 {
        return Err(mismatch(format!("expected 2 inputs, found {}", inputs.len())));
    }
    if !is_context_like(inputs[0]) {
        return Err(mismatch(format!(
            "first input must be a context reference such as `&RequestContext`, found `{}`",
            render_type(inputs[0])
        )));
    }
    if !is_string_like(inputs[1]) {
        return Err(mismatch(format!(
            "second input must be `&str` or `String`, found `{}`",
            render_type(inputs[1])
        )));
    }
    let Some((ok, err)) = result_parts(&item.sig.output) else {
        return Err(mismatch("expected 2 outputs as `Result<T, E>`".into()));
    };
    if !is_error_like(&err) {
        return Err(mismatch(format!(
            "error output must be an error type, found `{}`",
            render_type(&err)
        )));
    }

    let name = match explicit {
        Some(name) => name,
        None => last_ident(strip_reference(&ok)).ok_or_else(|| {
            mismatch(format!(
                "cannot derive a parser name from `{}`; name it with `wire::route_parser <Name>`",
                render_type(&ok)
            ))
        })?,
    };
    if !is_identifier(&name) {
        return Err(WireError::syntax(
            Diagnostic::new(format!("parser name `{}` is not a valid identifier", name))
                .at(location)
                .with_context("parser", function),
        ));
    }

    Ok(ParserDefinition {
        name,
        function,
        target_type: render_type(&ok),
        context_type: Some(render_type(inputs[0])),
        error_type: Some(render_type(&err)),
        location: Some(location),
    })
}

/// Logical parser type for a query argument: the last path segment of its
/// (de-referenced) Rust type.
fn query_parser_type(ty: &Type) -> Option<String> {
    last_ident(strip_reference(ty))
}

/// Signature of a `&self`/`&mut self` method, or `None` when it cannot be
/// exported through a trait (generic, async, by-value or typed receiver).
fn method_signature(func: &ImplItemFn) -> Option<MethodSignature> {
    let sig = &func.sig;
    if !sig.generics.params.is_empty() || sig.asyncness.is_some() {
        return None;
    }
    let receiver = sig.receiver()?;
    if receiver.reference.is_none() || receiver.colon_token.is_some() {
        return None;
    }
    let receiver = if receiver.mutability.is_some() {
        "&mut self"
    } else {
        "&self"
    };
    let params = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(t) => Some(t),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(i, arg)| {
            let name = match &*arg.pat {
                Pat::Ident(p) => p.ident.to_string(),
                _ => format!("arg{}", i),
            };
            (name, render_type(&arg.ty))
        })
        .collect();
    Some(MethodSignature {
        name: sig.ident.to_string(),
        receiver: receiver.to_string(),
        params,
        output: render_return(&sig.output),
    })
}

fn misplaced(d: &LocatedDirective, declaration: &str, name: &str) -> WireError {
    let kind = d.directive.kind();
    let on = if name.is_empty() {
        declaration.to_string()
    } else {
        format!("{} `{}`", declaration, name)
    };
    WireError::syntax(
        Diagnostic::new(format!(
            "`{}` cannot be applied to {}; it belongs on {}",
            kind,
            on,
            kind.target()
        ))
        .at(d.location.clone())
        .with_context("directive", kind.as_str()),
    )
}

fn item_attrs(item: &Item) -> &[syn::Attribute] {
    match item {
        Item::Const(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::ExternCrate(i) => &i.attrs,
        Item::ForeignMod(i) => &i.attrs,
        Item::Macro(i) => &i.attrs,
        Item::Mod(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Trait(i) => &i.attrs,
        Item::TraitAlias(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        Item::Use(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        _ => &[],
    }
}

fn item_description(item: &Item) -> &'static str {
    match item {
        Item::Const(_) => "a const",
        Item::Enum(_) => "an enum",
        Item::Mod(_) => "a module",
        Item::Static(_) => "a static",
        Item::Trait(_) | Item::TraitAlias(_) => "a trait",
        Item::Type(_) => "a type alias",
        Item::Union(_) => "a union",
        Item::Use(_) => "a use declaration",
        Item::Macro(_) => "a macro invocation",
        _ => "this item",
    }
}

#[cfg(test)]
mod tests;
