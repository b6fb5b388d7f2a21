//! # Directive Module
//!
//! The comment-embedded directive language.
//!
//! A directive is a doc-comment line of the form
//!
//! ```text
//! /// wire::route GET /users/{id:int} -Middleware=Auth -PassContext
//! ```
//!
//! Parsing happens in three steps:
//!
//! 1. [`lexer`] splits the line into words, quoted strings, flag names and `=`
//! 2. [`parser`] builds a [`RawDirective`] and checks flags against the kind's schema
//! 3. [`Directive::from_raw`] interprets the raw record into a typed directive

pub mod kind;
pub mod lexer;
pub mod parser;

pub use kind::{DirectiveKind, FlagSpec, FlagValue, DIRECTIVE_PREFIX};
pub use parser::{is_directive_line, parse_directive, RawDirective, RawFlag};

use crate::error::{suggest, Diagnostic, Location, Result, WireError};
use crate::metadata::{HttpMethod, InstanceMode, Lifecycle, DEFAULT_PRIORITY};
use crate::path::PathSpecification;

/// Instancing and lifecycle shared by `core` and `logger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceArgs {
    pub mode: InstanceMode,
    pub lifecycle: Lifecycle,
}

/// A directive with its flags interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Controller {
        prefix: Option<String>,
        middleware: Vec<String>,
        priority: i32,
    },
    Route {
        method: HttpMethod,
        path: PathSpecification,
        middleware: Vec<String>,
        priority: i32,
        pass_context: bool,
    },
    Core(ServiceArgs),
    Logger(ServiceArgs),
    Middleware {
        name: Option<String>,
        global: bool,
        priority: Option<i32>,
    },
    Inject,
    Init,
    Interface {
        name: Option<String>,
    },
    RouteParser {
        name: Option<String>,
    },
}

impl Directive {
    /// Interpret a raw directive. The parser checks flag names, value shapes
    /// and arity; a hand-built `RawDirective` missing route positionals is a
    /// `SyntaxError` here.
    pub fn from_raw(raw: &RawDirective) -> Result<Directive> {
        let directive = match raw.kind {
            DirectiveKind::Controller => {
                let prefix = text_flag(raw, "Prefix");
                if let Some(prefix) = &prefix {
                    let spec = PathSpecification::parse(prefix).map_err(|e| e.or_at(&raw.location))?;
                    if spec.has_wildcard() {
                        return Err(WireError::syntax(
                            Diagnostic::new(format!(
                                "controller prefix `{}` may not contain a wildcard",
                                prefix
                            ))
                            .at(raw.location.clone())
                            .with_context("prefix", prefix.clone()),
                        ));
                    }
                }
                Directive::Controller {
                    prefix,
                    middleware: list_flag(raw, "Middleware"),
                    priority: int_flag(raw, "Priority").unwrap_or(DEFAULT_PRIORITY),
                }
            }
            DirectiveKind::Route => {
                let (Some(verb), Some(raw_path)) = (raw.positional.first(), raw.positional.get(1)) else {
                    return Err(WireError::syntax(
                        Diagnostic::new("wire::route expects an HTTP verb and a path")
                            .at(raw.location.clone())
                            .with_context("usage", raw.kind.usage()),
                    ));
                };
                let method = HttpMethod::parse(verb).ok_or_else(|| {
                    WireError::syntax(
                        Diagnostic::new(format!("unsupported HTTP verb `{}`", verb))
                            .at(raw.location.clone())
                            .with_context("verb", verb.clone())
                            .with_suggestions(suggest(
                                &verb.to_uppercase(),
                                HttpMethod::ALL.iter().map(HttpMethod::as_str),
                            )),
                    )
                })?;
                let path = PathSpecification::parse(raw_path).map_err(|e| {
                    e.or_at(&raw.location)
                })?;
                Directive::Route {
                    method,
                    path,
                    middleware: list_flag(raw, "Middleware"),
                    priority: int_flag(raw, "Priority").unwrap_or(DEFAULT_PRIORITY),
                    pass_context: switch_flag(raw, "PassContext"),
                }
            }
            DirectiveKind::Core => Directive::Core(service_args(raw)),
            DirectiveKind::Logger => Directive::Logger(service_args(raw)),
            DirectiveKind::Middleware => Directive::Middleware {
                name: raw.positional.first().cloned(),
                global: switch_flag(raw, "Global"),
                priority: int_flag(raw, "Priority"),
            },
            DirectiveKind::Inject => Directive::Inject,
            DirectiveKind::Init => Directive::Init,
            DirectiveKind::Interface => Directive::Interface {
                name: text_flag(raw, "Name"),
            },
            DirectiveKind::RouteParser => Directive::RouteParser {
                name: raw.positional.first().cloned(),
            },
        };
        Ok(directive)
    }

    #[must_use]
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Controller { .. } => DirectiveKind::Controller,
            Directive::Route { .. } => DirectiveKind::Route,
            Directive::Core(_) => DirectiveKind::Core,
            Directive::Logger(_) => DirectiveKind::Logger,
            Directive::Middleware { .. } => DirectiveKind::Middleware,
            Directive::Inject => DirectiveKind::Inject,
            Directive::Init => DirectiveKind::Init,
            Directive::Interface { .. } => DirectiveKind::Interface,
            Directive::RouteParser { .. } => DirectiveKind::RouteParser,
        }
    }
}

/// A typed directive together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDirective {
    pub directive: Directive,
    pub location: Location,
}

/// Parse every directive in a block of doc lines.
///
/// `lines` pairs each doc line with its 1-based source line.
pub fn parse_doc_lines<'a, I>(module: &std::path::Path, lines: I) -> Result<Vec<LocatedDirective>>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut out = Vec::new();
    for (text, line) in lines {
        let location = Location::new(module, line);
        if let Some(raw) = parse_directive(text, location.clone())? {
            out.push(LocatedDirective {
                directive: Directive::from_raw(&raw)?,
                location,
            });
        }
    }
    Ok(out)
}

fn text_flag(raw: &RawDirective, name: &str) -> Option<String> {
    raw.flag(name).and_then(|f| f.value.clone())
}

fn list_flag(raw: &RawDirective, name: &str) -> Vec<String> {
    raw.flag(name)
        .and_then(|f| f.value.as_deref())
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

fn int_flag(raw: &RawDirective, name: &str) -> Option<i32> {
    raw.flag(name)
        .and_then(|f| f.value.as_deref())
        .and_then(|v| v.parse().ok())
}

fn switch_flag(raw: &RawDirective, name: &str) -> bool {
    match raw.flag(name) {
        Some(flag) => flag.value.as_deref() != Some("false"),
        None => false,
    }
}

fn service_args(raw: &RawDirective) -> ServiceArgs {
    let mode = raw
        .flag("Mode")
        .and_then(|f| f.value.as_deref())
        .and_then(InstanceMode::parse)
        .unwrap_or_default();
    let lifecycle = match raw.flag("Init") {
        None => Lifecycle::None,
        Some(flag) => flag
            .value
            .as_deref()
            .and_then(Lifecycle::parse)
            .unwrap_or(Lifecycle::SameThread),
    };
    ServiceArgs { mode, lifecycle }
}
