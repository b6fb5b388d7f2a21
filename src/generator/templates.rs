use askama::Template;
use std::io;

use super::{output_path, EmittedFile, Emitter, ImportPathMap, GENERATED_MARKER};
use crate::error::{Diagnostic, Result, WireError};
use crate::metadata::{
    Controller, FieldRole, FieldSpec, Interface, Lifecycle, Middleware, ModuleMetadata, Route,
    RouteParameter, Service,
};
use crate::registry::Registries;

/// Prefix of parser references that name a built-in parser.
pub const BUILTIN_PARSER_PREFIX: &str = "builtin:";

/// Template data for one generated `*.wire.rs` file
#[derive(Template)]
#[template(path = "module.wire.rs.txt", escape = "none")]
pub struct ModuleTemplateData {
    pub marker: &'static str,
    /// Source module, as written in the header comment
    pub source: String,
    pub constructors: Vec<ConstructorView>,
    pub start_hooks: Vec<StartHookView>,
    pub interfaces: Vec<InterfaceView>,
    pub controllers: Vec<ControllerView>,
    pub middlewares: Vec<MiddlewareView>,
    pub services: Vec<ServiceView>,
}

/// `wire()` constructor for a controller or service
#[derive(Debug, Clone)]
pub struct ConstructorView {
    pub type_name: String,
    /// Rendered argument list (`repo: Arc<Repo>, clock: Clock`)
    pub args: String,
    pub fields: Vec<FieldInitView>,
}

#[derive(Debug, Clone)]
pub struct FieldInitView {
    pub name: String,
    /// Supplied by a constructor argument rather than `Default::default()`
    pub injected: bool,
}

/// `wire_start()` for a service with a lifecycle
#[derive(Debug, Clone)]
pub struct StartHookView {
    pub type_name: String,
    pub receiver: String,
    /// Return type of `start`, `()` when it has none
    pub output: String,
    /// ` -> R`, empty when `start` returns nothing
    pub returns: String,
    pub background: bool,
    /// `start` takes `&self`; background hooks then run on a shared handle
    pub shared: bool,
}

#[derive(Debug, Clone)]
pub struct InterfaceView {
    pub name: String,
    pub implementor: String,
    pub methods: Vec<MethodView>,
}

#[derive(Debug, Clone)]
pub struct MethodView {
    /// `fn find(&self, id: i64) -> Option<User>`
    pub signature: String,
    /// `Users::find(self, id)`
    pub call: String,
}

// The remaining views hold values already rendered as Rust literals.

#[derive(Debug, Clone)]
pub struct ControllerView {
    pub name: String,
    pub priority: i32,
    pub routes: Vec<RouteView>,
}

#[derive(Debug, Clone)]
pub struct RouteView {
    pub method: String,
    pub path: String,
    pub handler: String,
    pub middleware: String,
    pub priority: i32,
    pub pass_context: bool,
    pub params: Vec<ParamView>,
}

#[derive(Debug, Clone)]
pub struct ParamView {
    pub name: String,
    pub source: String,
    /// `Some("crate::codes::parse_code")`, `Some("builtin:int")` or `None`
    pub parser: String,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct MiddlewareView {
    pub name: String,
    pub type_path: String,
    pub global: bool,
    pub priority: i32,
}

#[derive(Debug, Clone)]
pub struct ServiceView {
    pub name: String,
    pub kind: String,
    pub mode: String,
    pub lifecycle: String,
}

fn literal(s: &str) -> String {
    format!("{:?}", s)
}

/// Default [`Emitter`]: renders `templates/module.wire.rs.txt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEmitter;

impl TemplateEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Build the template data without rendering it.
    pub fn template_data(
        &self,
        module: &ModuleMetadata,
        registries: &Registries,
        imports: &ImportPathMap,
    ) -> Result<ModuleTemplateData> {
        let mut constructors = Vec::new();
        for controller in module.controllers_by_priority() {
            constructors.push(constructor(&controller.name, &controller.fields));
        }
        for service in &module.services {
            constructors.push(constructor(&service.name, &service.fields));
        }

        let start_hooks = module.services.iter().filter_map(start_hook).collect();
        let interfaces = module.interfaces.iter().map(interface).collect();

        let mut controllers = Vec::new();
        for controller in module.controllers_by_priority() {
            controllers.push(controller_view(module, controller, registries, imports)?);
        }

        let middlewares = registration_order(module, registries)
            .into_iter()
            .map(|m| middleware_view(module, m, imports))
            .collect();
        let services = module.services.iter().map(service_view).collect();

        Ok(ModuleTemplateData {
            marker: GENERATED_MARKER,
            source: module.path.display().to_string(),
            constructors,
            start_hooks,
            interfaces,
            controllers,
            middlewares,
            services,
        })
    }
}

impl Emitter for TemplateEmitter {
    fn emit(
        &self,
        module: &ModuleMetadata,
        registries: &Registries,
        imports: &ImportPathMap,
    ) -> Result<EmittedFile> {
        let path = output_path(&module.path);
        let content = self
            .template_data(module, registries, imports)?
            .render()
            .map_err(|e| WireError::io("render", &path, io::Error::other(e.to_string())))?;
        Ok(EmittedFile { path, content })
    }
}

fn constructor(type_name: &str, fields: &[FieldSpec]) -> ConstructorView {
    let args: Vec<String> = fields
        .iter()
        .filter(|f| matches!(f.role, FieldRole::Injected { .. }))
        .map(|f| format!("{}: {}", f.name, f.ty))
        .collect();
    ConstructorView {
        type_name: type_name.to_string(),
        args: args.join(", "),
        fields: fields
            .iter()
            .map(|f| FieldInitView {
                name: f.name.clone(),
                injected: matches!(f.role, FieldRole::Injected { .. }),
            })
            .collect(),
    }
}

fn start_hook(service: &Service) -> Option<StartHookView> {
    let hook = service.start_hook.as_ref()?;
    Some(StartHookView {
        type_name: service.name.clone(),
        receiver: hook.receiver.clone(),
        output: hook.output.clone().unwrap_or_else(|| "()".to_string()),
        returns: hook
            .output
            .as_ref()
            .map(|o| format!(" -> {}", o))
            .unwrap_or_default(),
        background: service.lifecycle == Lifecycle::Background,
        shared: hook.receiver == "&self",
    })
}

fn interface(interface: &Interface) -> InterfaceView {
    InterfaceView {
        name: interface.name.clone(),
        implementor: interface.implementor.clone(),
        methods: interface
            .methods
            .iter()
            .map(|m| {
                let args: Vec<&str> = std::iter::once("self")
                    .chain(m.params.iter().map(|(n, _)| n.as_str()))
                    .collect();
                MethodView {
                    signature: m.render(),
                    call: format!("{}::{}({})", interface.implementor, m.name, args.join(", ")),
                }
            })
            .collect(),
    }
}

fn controller_view(
    module: &ModuleMetadata,
    controller: &Controller,
    registries: &Registries,
    imports: &ImportPathMap,
) -> Result<ControllerView> {
    let mut routes = Vec::new();
    for route in controller.routes_by_priority() {
        let middleware: Vec<String> = route
            .effective_middleware(controller)
            .iter()
            .map(|m| literal(m))
            .collect();
        let mut params = Vec::new();
        for param in &route.params {
            params.push(ParamView {
                name: literal(&param.name),
                source: literal(&param.source.to_string()),
                parser: parser_reference(module, route, param, registries, imports)?,
                optional: param.optional,
            });
        }
        routes.push(RouteView {
            method: literal(route.method.as_str()),
            path: literal(&route.full_path.render()),
            handler: literal(&route.handler),
            middleware: format!("&[{}]", middleware.join(", ")),
            priority: route.priority,
            pass_context: route.pass_context,
            params,
        });
    }
    Ok(ControllerView {
        name: literal(&controller.name),
        priority: controller.priority,
        routes,
    })
}

/// Rust expression naming the parser bound to one handler argument.
fn parser_reference(
    module: &ModuleMetadata,
    route: &Route,
    param: &RouteParameter,
    registries: &Registries,
    imports: &ImportPathMap,
) -> Result<String> {
    let Some(parser_type) = &param.parser_type else {
        return Ok("None".to_string());
    };
    let Some(definition) = registries.parsers.get(parser_type) else {
        return Err(WireError::reference(
            Diagnostic::new(format!(
                "route parser `{}` for parameter `{}` of handler `{}` is not registered",
                parser_type, param.name, route.handler
            ))
            .at(route.location.clone())
            .with_context("type", parser_type.clone()),
        ));
    };
    let Some(location) = &definition.location else {
        return Ok(format!(
            "Some({})",
            literal(&format!("{}{}", BUILTIN_PARSER_PREFIX, definition.name))
        ));
    };
    let path = imports
        .qualify(&location.module, &definition.function, &module.path)
        .ok_or_else(|| {
            WireError::configuration(
                Diagnostic::new(format!(
                    "no import path for module {} defining route parser `{}`",
                    location.module.display(),
                    definition.name
                ))
                .at(location.clone()),
            )
        })?;
    Ok(format!("Some({})", literal(&path)))
}

/// The module's middleware in registration order: its globals as
/// `globals_ordered` ranks them, then everything else in declaration order.
fn registration_order<'a>(module: &'a ModuleMetadata, registries: &Registries) -> Vec<&'a Middleware> {
    let mut ordered: Vec<&Middleware> = registries
        .middlewares
        .globals_ordered()
        .into_iter()
        .filter_map(|g| {
            module
                .middlewares
                .iter()
                .find(|m| m.name == g.name && m.location == g.location)
        })
        .collect();
    for middleware in &module.middlewares {
        if !ordered.iter().any(|o| o.name == middleware.name) {
            ordered.push(middleware);
        }
    }
    ordered
}

fn middleware_view(module: &ModuleMetadata, middleware: &Middleware, imports: &ImportPathMap) -> MiddlewareView {
    let type_path = imports
        .qualify(&module.path, &middleware.type_name, &module.path)
        .unwrap_or_else(|| middleware.type_name.clone());
    MiddlewareView {
        name: literal(&middleware.name),
        type_path: literal(&type_path),
        global: middleware.global,
        priority: middleware.effective_priority(),
    }
}

fn service_view(service: &Service) -> ServiceView {
    ServiceView {
        name: literal(&service.name),
        kind: literal(&format!("{:?}", service.kind)),
        mode: literal(&format!("{:?}", service.mode)),
        lifecycle: literal(&format!("{:?}", service.lifecycle)),
    }
}
