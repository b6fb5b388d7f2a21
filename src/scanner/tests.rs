use super::*;
use crate::error::ErrorKind;
use crate::metadata::{DependencyShape, HttpMethod, InstanceMode};

fn scan(src: &str) -> Result<ModuleMetadata> {
    scan_source(Path::new("src/users.rs"), src)
}

const USERS: &str = r#"
use std::sync::Arc;

/// Users endpoints.
/// wire::controller -Prefix=/users -Middleware=Auth -Priority=10
/// wire::interface
pub struct UsersController {
    /// wire::inject
    service: Arc<UserService>,
    /// wire::inject
    mailer: fn() -> Mailer,
    /// wire::init
    cache: Cache,
    hits: u64,
}

impl UsersController {
    /// wire::route GET /{id:int}
    pub fn get(&self, id: i64, verbose: Option<bool>) -> Response {
        todo!()
    }

    /// wire::route POST / -Middleware=Audit -PassContext
    pub fn create(&self, ctx: &RequestContext, body: NewUser) -> Response {
        todo!()
    }

    /// wire::route GET /{id}/files/{*}
    pub fn file(&self, id: String, wildcard: String) -> Response {
        todo!()
    }

    pub fn count(&self) -> u64 {
        self.hits
    }

    fn helper(&self) {}
}
"#;

#[test]
fn test_controller_and_routes() {
    let m = scan(USERS).unwrap();
    assert_eq!(m.controllers.len(), 1);
    let c = &m.controllers[0];
    assert_eq!(c.name, "UsersController");
    assert_eq!(c.prefix.as_deref(), Some("/users"));
    assert_eq!(c.middleware, vec!["Auth"]);
    assert_eq!(c.priority, 10);
    assert_eq!(c.location.line, 5);
    assert_eq!(c.routes.len(), 3);

    let get = &c.routes[0];
    assert_eq!(get.handler, "get");
    assert_eq!(get.method, HttpMethod::Get);
    assert_eq!(get.full_path.render(), "/users/{id:int}");
    assert_eq!(get.params[0].source, ParamSource::Path);
    assert_eq!(get.params[0].parser_type.as_deref(), Some("int"));
    assert_eq!(get.params[1].source, ParamSource::Query);
    assert_eq!(get.params[1].parser_type.as_deref(), Some("bool"));
    assert!(get.params[1].optional);
    assert_eq!(get.returns.as_deref(), Some("Response"));

    let create = &c.routes[1];
    assert!(create.pass_context);
    assert_eq!(create.context_type.as_deref(), Some("&RequestContext"));
    assert_eq!(create.params.len(), 1);
    assert_eq!(create.params[0].source, ParamSource::Body);
    assert_eq!(create.params[0].parser_type, None);
    assert_eq!(create.effective_middleware(c), vec!["Auth", "Audit"]);

    let file = &c.routes[2];
    assert!(file.full_path.has_wildcard());
    assert_eq!(file.params[1].name, "wildcard");
    assert_eq!(file.params[1].source, ParamSource::Path);
}

#[test]
fn test_controller_fields() {
    let m = scan(USERS).unwrap();
    let c = &m.controllers[0];
    let roles: Vec<(&str, bool)> = c
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.dependency().is_some()))
        .collect();
    assert_eq!(
        roles,
        vec![("service", true), ("mailer", true), ("cache", false), ("hits", false)]
    );
    assert_eq!(c.fields[2].role, FieldRole::Init);
    assert_eq!(c.fields[3].role, FieldRole::Plain);
    let mailer = c.fields[1].dependency().unwrap();
    assert_eq!(mailer.shape, DependencyShape::Factory { wrapper: None });
}

#[test]
fn test_interface_excludes_routes_and_private_methods() {
    let m = scan(USERS).unwrap();
    assert_eq!(m.interfaces.len(), 1);
    let i = &m.interfaces[0];
    assert_eq!(i.name, "UsersControllerInterface");
    assert_eq!(i.implementor, "UsersController");
    let names: Vec<&str> = i.methods.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["count"]);
}

#[test]
fn test_services_and_logger() {
    let m = scan(
        r#"
/// wire::core -Mode=Transient -Init=Background
/// wire::interface -Name=Billing
pub struct BillingService {
    /// wire::inject
    repo: Arc<dyn Repository + Send + Sync>,
}

impl BillingService {
    pub fn start(&self) {}
    pub fn charge(&self, amount: u64) -> Result<(), BillingError> { Ok(()) }
}

/// wire::logger
pub struct AppLogger;
"#,
    )
    .unwrap();
    assert_eq!(m.services.len(), 2);
    let billing = &m.services[0];
    assert_eq!(billing.kind, ServiceKind::Core);
    assert_eq!(billing.mode, InstanceMode::Transient);
    assert_eq!(billing.lifecycle, Lifecycle::Background);
    assert_eq!(billing.start_hook.as_ref().map(|h| h.name.as_str()), Some("start"));
    assert_eq!(m.services[1].kind, ServiceKind::Logger);
    assert_eq!(m.interfaces[0].name, "Billing");
    assert_eq!(
        m.interfaces[0].methods[1].render(),
        "fn charge(&self, amount: u64) -> Result<(), BillingError>"
    );
}

#[test]
fn test_lifecycle_requires_start() {
    let err = scan("/// wire::core -Init\npub struct Svc;\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Signature);
    assert!(err.to_string().contains("start"));
}

#[test]
fn test_middleware() {
    let m = scan(
        r#"
/// wire::middleware Auth -Global -Priority=5
pub struct AuthMiddleware;

impl Middleware for AuthMiddleware {
    fn handle(&self, req: Request, next: Next) -> Response { next.run(req) }
}

/// wire::middleware
pub struct Audit;

impl Audit {
    pub fn handle(&self) {}
}
"#,
    )
    .unwrap();
    assert_eq!(m.middlewares.len(), 2);
    assert_eq!(m.middlewares[0].name, "Auth");
    assert_eq!(m.middlewares[0].type_name, "AuthMiddleware");
    assert!(m.middlewares[0].global);
    assert_eq!(m.middlewares[0].effective_priority(), 5);
    assert_eq!(m.middlewares[1].name, "Audit");
    assert_eq!(m.middlewares[1].priority, None);
}

#[test]
fn test_middleware_without_handle() {
    let err = scan("/// wire::middleware Auth\npub struct Auth;\nimpl Auth { fn run(&self) {} }\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Signature);
    assert!(err.to_string().contains("handle"));
    assert_eq!(err.location().map(|l| l.line), Some(1));
}

#[test]
fn test_route_parser() {
    let m = scan(
        r#"
/// wire::route_parser
pub fn parse_code(ctx: &RequestContext, raw: &str) -> Result<Code, ParseError> {
    todo!()
}

/// wire::route_parser Slug
pub fn slug(_ctx: &Ctx, raw: String) -> Result<String, anyhow::Error> {
    Ok(raw)
}
"#,
    )
    .unwrap();
    assert_eq!(m.parsers.len(), 2);
    assert_eq!(m.parsers[0].name, "Code");
    assert_eq!(m.parsers[0].function, "parse_code");
    assert_eq!(m.parsers[0].location.as_ref().map(|l| l.line), Some(2));
    assert_eq!(m.parsers[1].name, "Slug");
    assert_eq!(m.parsers[1].error_type.as_deref(), Some("anyhow::Error"));
    assert!(!m.needs_emission());
}

#[test]
fn test_route_parser_signature_errors() {
    let cases = [
        "fn p(raw: &str) -> Result<Code, ParseError> { todo!() }",
        "fn p(ctx: &RequestContext, raw: u32) -> Result<Code, ParseError> { todo!() }",
        "fn p(ctx: RequestContext, raw: &str) -> Result<Code, ParseError> { todo!() }",
        "fn p(ctx: &RequestContext, raw: &str) -> Code { todo!() }",
        "fn p(ctx: &RequestContext, raw: &str) -> Result<Code, String> { todo!() }",
        "fn p(ctx: &RequestContext, raw: &str, extra: u8) -> Result<Code, ParseError> { todo!() }",
    ];
    for case in cases {
        let src = format!("/// wire::route_parser\n{}\n", case);
        let err = scan(&src).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signature, "{case}");
        let text = err.to_string();
        assert!(text.contains(PARSER_SHAPE), "{text}");
        assert_eq!(err.diagnostic().context.get("expected").map(String::as_str), Some(PARSER_SHAPE));
    }
}

#[test]
fn test_bad_injection_type() {
    let err = scan(
        "/// wire::core\npub struct Svc {\n    /// wire::inject\n    name: String,\n}\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.location().map(|l| l.line), Some(3));
}

#[test]
fn test_misplaced_directives() {
    let err = scan("/// wire::route GET /\npub struct Users;\n").unwrap_err();
    assert!(err.to_string().contains("cannot be applied to struct `Users`"));

    let err = scan("/// wire::controller\npub enum Users { A }\n").unwrap_err();
    assert!(err.to_string().contains("an enum"));

    let err = scan("pub struct Plain;\nimpl Plain {\n    /// wire::route GET /\n    fn get(&self) {}\n}\n")
        .unwrap_err();
    assert!(err.to_string().contains("wire::controller"));
    assert_eq!(err.location().map(|l| l.line), Some(3));

    let err = scan("/// wire::controller\n/// wire::core\npub struct Both;\n").unwrap_err();
    assert!(err.to_string().contains("both"));
}

#[test]
fn test_pass_context_needs_parameter() {
    let err = scan(
        "/// wire::controller\npub struct C;\nimpl C {\n    /// wire::route GET / -PassContext\n    fn get(&self) {}\n}\n",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Signature);
}

#[test]
fn test_unknown_directive_in_source() {
    let err = scan("/// wire::contoller\npub struct C;\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.suggestions().first().map(String::as_str), Some("controller"));
    assert_eq!(err.location(), Some(&Location::new("src/users.rs", 1)));
}

#[test]
fn test_plain_module_is_empty() {
    let m = scan("//! Nothing to wire.\n/// Just docs.\npub struct Plain;\nfn helper() {}\n").unwrap();
    assert!(m.is_empty());
}

#[test]
fn test_unparseable_source() {
    let err = scan("pub struct {").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}
