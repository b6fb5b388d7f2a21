use crate::error::Location;
use crate::path::PathSpecification;
use serde::Serialize;
use std::fmt;

/// Priority used when a controller, route or global middleware sets none.
/// Lower values register first.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Name of the method a middleware type must provide.
pub const MIDDLEWARE_HANDLER: &str = "handle";

/// Name of the method a service with a lifecycle must provide.
pub const LIFECYCLE_START: &str = "start";

/// HTTP verbs accepted by `wire::route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many instances of a service the container hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InstanceMode {
    /// One shared instance
    #[default]
    Singleton,
    /// A fresh instance per resolution
    Transient,
}

impl InstanceMode {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Singleton" => Some(InstanceMode::Singleton),
            "Transient" => Some(InstanceMode::Transient),
            _ => None,
        }
    }
}

/// When a service's `start` hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Lifecycle {
    /// No start hook
    #[default]
    None,
    /// Started on the thread that builds the container
    SameThread,
    /// Started on a background thread
    Background,
}

impl Lifecycle {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Same" => Some(Lifecycle::SameThread),
            "Background" => Some(Lifecycle::Background),
            _ => None,
        }
    }
}

/// Shape of an injected field's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DependencyShape {
    /// `T`
    Direct,
    /// `Arc<T>`, `Rc<T>`, `Box<T>`
    Shared { wrapper: String },
    /// `Arc<dyn Trait>` and friends
    Interface { wrapper: String },
    /// `fn() -> T`, `Box<dyn Fn() -> T>`, `Arc<dyn Fn() -> T + Send + Sync>`
    Factory { wrapper: Option<String> },
}

/// What an injected field asks the container for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Name of the dependency type (or trait), e.g. `UserRepository`
    pub type_name: String,
    pub shape: DependencyShape,
}

impl Dependency {
    #[must_use]
    pub fn is_factory(&self) -> bool {
        matches!(self.shape, DependencyShape::Factory { .. })
    }
}

/// Role a struct field plays during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum FieldRole {
    /// `wire::inject`: supplied by the container
    Injected { dependency: Dependency },
    /// `wire::init`: constructed with `Default::default()`, never injected
    Init,
    /// No directive; also constructed with `Default::default()`
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    /// Rendered Rust type
    pub ty: String,
    pub role: FieldRole,
}

impl FieldSpec {
    #[must_use]
    pub fn dependency(&self) -> Option<&Dependency> {
        match &self.role {
            FieldRole::Injected { dependency } => Some(dependency),
            _ => None,
        }
    }
}

fn injected(fields: &[FieldSpec]) -> impl Iterator<Item = (&FieldSpec, &Dependency)> {
    fields
        .iter()
        .filter_map(|f| f.dependency().map(|d| (f, d)))
}

/// Where a handler argument's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamSource {
    /// A `{name}` segment (or the `{*}` wildcard) of the route path
    Path,
    /// A query-string value with the same name as the argument
    Query,
    /// The deserialized request body (argument named `body`)
    Body,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Path => write!(f, "path"),
            ParamSource::Query => write!(f, "query"),
            ParamSource::Body => write!(f, "body"),
        }
    }
}

/// One typed handler argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParameter {
    pub name: String,
    /// Rendered Rust type of the argument
    pub rust_type: String,
    /// Logical parser type used to bind the raw value; `None` for bodies
    pub parser_type: Option<String>,
    pub source: ParamSource,
    /// `Option<T>` arguments may be absent
    pub optional: bool,
}

/// A controller method exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Handler method name
    pub handler: String,
    pub method: HttpMethod,
    /// Path as declared on the route
    pub path: PathSpecification,
    /// Controller prefix joined with `path`
    pub full_path: PathSpecification,
    pub middleware: Vec<String>,
    pub priority: i32,
    /// Handler receives the ambient request context as its first argument
    pub pass_context: bool,
    /// Rendered type of the context argument when `pass_context` is set
    pub context_type: Option<String>,
    pub params: Vec<RouteParameter>,
    /// Rendered return type, if any
    pub returns: Option<String>,
    pub location: Location,
}

impl Route {
    /// Controller middleware followed by route middleware, first occurrence wins.
    #[must_use]
    pub fn effective_middleware(&self, controller: &Controller) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in controller.middleware.iter().chain(self.middleware.iter()) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

/// A struct grouping HTTP routes under shared configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controller {
    pub name: String,
    pub prefix: Option<String>,
    pub middleware: Vec<String>,
    pub priority: i32,
    pub fields: Vec<FieldSpec>,
    pub routes: Vec<Route>,
    pub location: Location,
}

impl Controller {
    pub fn injected(&self) -> impl Iterator<Item = (&FieldSpec, &Dependency)> {
        injected(&self.fields)
    }

    /// Routes ordered by priority; declaration order breaks ties.
    #[must_use]
    pub fn routes_by_priority(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.iter().collect();
        routes.sort_by_key(|r| r.priority);
        routes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceKind {
    /// `wire::core`
    Core,
    /// `wire::logger`: the application logger
    Logger,
}

/// A business service (or the logger) built by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub kind: ServiceKind,
    pub mode: InstanceMode,
    pub lifecycle: Lifecycle,
    pub fields: Vec<FieldSpec>,
    /// The `start` method, present whenever `lifecycle` is not `None`
    pub start_hook: Option<MethodSignature>,
    pub location: Location,
}

impl Service {
    pub fn injected(&self) -> impl Iterator<Item = (&FieldSpec, &Dependency)> {
        injected(&self.fields)
    }

    pub fn init_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|f| matches!(f.role, FieldRole::Init))
    }
}

/// A named request wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Middleware {
    /// Logical name used in `-Middleware=` lists
    pub name: String,
    /// Implementing struct
    pub type_name: String,
    pub global: bool,
    /// Only meaningful when `global` is set
    pub priority: Option<i32>,
    /// Handler method name
    pub handler: String,
    pub location: Location,
}

impl Middleware {
    #[must_use]
    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }
}

/// A function binding raw strings to a logical parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserDefinition {
    /// Logical type name used in `{name:Type}`
    pub name: String,
    /// Function name (empty for built-ins)
    pub function: String,
    /// Rendered success type
    pub target_type: String,
    pub context_type: Option<String>,
    pub error_type: Option<String>,
    /// `None` for built-in parsers
    pub location: Option<Location>,
}

impl ParserDefinition {
    /// A parser shipped with the generator.
    pub fn builtin(name: &str, target_type: &str) -> Self {
        Self {
            name: name.to_string(),
            function: String::new(),
            target_type: target_type.to_string(),
            context_type: None,
            error_type: None,
            location: None,
        }
    }

    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.location.is_none()
    }
}

/// A method exported through an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    /// `&self` or `&mut self`
    pub receiver: String,
    /// `(name, rendered type)` pairs
    pub params: Vec<(String, String)>,
    pub output: Option<String>,
}

impl MethodSignature {
    /// `fn name(&self, a: A) -> R`
    #[must_use]
    pub fn render(&self) -> String {
        let mut args = vec![self.receiver.clone()];
        args.extend(self.params.iter().map(|(n, t)| format!("{}: {}", n, t)));
        match &self.output {
            Some(out) => format!("fn {}({}) -> {}", self.name, args.join(", "), out),
            None => format!("fn {}({})", self.name, args.join(", ")),
        }
    }

    /// `name(a, b)`
    #[must_use]
    pub fn call(&self) -> String {
        let args: Vec<&str> = self.params.iter().map(|(n, _)| n.as_str()).collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// Abstract capability contract derived from a service or controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    /// Trait name
    pub name: String,
    /// Concrete type bound to the trait
    pub implementor: String,
    pub methods: Vec<MethodSignature>,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("TRACE"), None);
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn test_method_signature_render() {
        let sig = MethodSignature {
            name: "find".into(),
            receiver: "&self".into(),
            params: vec![("id".into(), "i64".into())],
            output: Some("Option<User>".into()),
        };
        assert_eq!(sig.render(), "fn find(&self, id: i64) -> Option<User>");
        assert_eq!(sig.call(), "find(id)");
    }
}
