use serde::Serialize;
use std::fmt;

/// Prefix that turns a doc-comment line into a directive.
pub const DIRECTIVE_PREFIX: &str = "wire::";

/// The fixed directive vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Controller,
    Route,
    /// Core (business) service
    Core,
    Middleware,
    Inject,
    Init,
    Interface,
    Logger,
    RouteParser,
}

/// What a flag accepts after `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue {
    /// `-Name` or `-Name=true|false`
    Switch,
    /// `-Name=<integer>`
    Integer,
    /// `-Name=<text>`
    Text,
    /// `-Name=A,B,C`
    List,
    /// `-Name=<one of>`; `default` applies to a bare `-Name`
    Choice {
        choices: &'static [&'static str],
        default: Option<&'static str>,
    },
}

/// One accepted flag for a directive kind.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub name: &'static str,
    pub value: FlagValue,
}

const fn flag(name: &'static str, value: FlagValue) -> FlagSpec {
    FlagSpec { name, value }
}

pub const INSTANCE_MODES: &[&str] = &["Singleton", "Transient"];
pub const LIFECYCLE_MODES: &[&str] = &["Same", "Background"];

const CONTROLLER_FLAGS: &[FlagSpec] = &[
    flag("Prefix", FlagValue::Text),
    flag("Middleware", FlagValue::List),
    flag("Priority", FlagValue::Integer),
];

const ROUTE_FLAGS: &[FlagSpec] = &[
    flag("Middleware", FlagValue::List),
    flag("Priority", FlagValue::Integer),
    flag("PassContext", FlagValue::Switch),
];

const SERVICE_FLAGS: &[FlagSpec] = &[
    flag(
        "Mode",
        FlagValue::Choice {
            choices: INSTANCE_MODES,
            default: None,
        },
    ),
    flag(
        "Init",
        FlagValue::Choice {
            choices: LIFECYCLE_MODES,
            default: Some("Same"),
        },
    ),
];

const MIDDLEWARE_FLAGS: &[FlagSpec] = &[
    flag("Global", FlagValue::Switch),
    flag("Priority", FlagValue::Integer),
];

const INTERFACE_FLAGS: &[FlagSpec] = &[flag("Name", FlagValue::Text)];

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 9] = [
        DirectiveKind::Controller,
        DirectiveKind::Route,
        DirectiveKind::Core,
        DirectiveKind::Middleware,
        DirectiveKind::Inject,
        DirectiveKind::Init,
        DirectiveKind::Interface,
        DirectiveKind::Logger,
        DirectiveKind::RouteParser,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Controller => "controller",
            DirectiveKind::Route => "route",
            DirectiveKind::Core => "core",
            DirectiveKind::Middleware => "middleware",
            DirectiveKind::Inject => "inject",
            DirectiveKind::Init => "init",
            DirectiveKind::Interface => "interface",
            DirectiveKind::Logger => "logger",
            DirectiveKind::RouteParser => "route_parser",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    #[must_use]
    pub fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(DirectiveKind::as_str).collect()
    }

    /// Flags accepted by this kind.
    #[must_use]
    pub fn flags(&self) -> &'static [FlagSpec] {
        match self {
            DirectiveKind::Controller => CONTROLLER_FLAGS,
            DirectiveKind::Route => ROUTE_FLAGS,
            DirectiveKind::Core | DirectiveKind::Logger => SERVICE_FLAGS,
            DirectiveKind::Middleware => MIDDLEWARE_FLAGS,
            DirectiveKind::Interface => INTERFACE_FLAGS,
            DirectiveKind::Inject | DirectiveKind::Init | DirectiveKind::RouteParser => &[],
        }
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&'static FlagSpec> {
        self.flags().iter().find(|f| f.name == name)
    }

    /// Accepted positional argument count as `(min, max)`.
    #[must_use]
    pub fn arity(&self) -> (usize, usize) {
        match self {
            DirectiveKind::Route => (2, 2),
            DirectiveKind::Middleware | DirectiveKind::RouteParser => (0, 1),
            _ => (0, 0),
        }
    }

    /// The kind of declaration this directive decorates.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            DirectiveKind::Controller
            | DirectiveKind::Core
            | DirectiveKind::Logger
            | DirectiveKind::Middleware => "a struct",
            DirectiveKind::Interface => "a controller or service struct",
            DirectiveKind::Route => "a method in an inherent impl of a controller",
            DirectiveKind::Inject | DirectiveKind::Init => "a named field of a controller or service",
            DirectiveKind::RouteParser => "a free function",
        }
    }

    /// Usage line shown in arity errors.
    #[must_use]
    pub fn usage(&self) -> &'static str {
        match self {
            DirectiveKind::Controller => "wire::controller [-Prefix=/path] [-Middleware=A,B] [-Priority=N]",
            DirectiveKind::Route => "wire::route <VERB> <PATH> [-Middleware=A,B] [-Priority=N] [-PassContext]",
            DirectiveKind::Core => "wire::core [-Mode=Singleton|Transient] [-Init[=Same|Background]]",
            DirectiveKind::Middleware => "wire::middleware [Name] [-Global] [-Priority=N]",
            DirectiveKind::Inject => "wire::inject",
            DirectiveKind::Init => "wire::init",
            DirectiveKind::Interface => "wire::interface [-Name=TraitName]",
            DirectiveKind::Logger => "wire::logger [-Mode=Singleton|Transient] [-Init[=Same|Background]]",
            DirectiveKind::RouteParser => "wire::route_parser [TypeName]",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DIRECTIVE_PREFIX, self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in DirectiveKind::ALL {
            assert_eq!(DirectiveKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DirectiveKind::parse("controllers"), None);
    }

    #[test]
    fn test_flag_tables() {
        assert!(DirectiveKind::Route.flag("PassContext").is_some());
        assert!(DirectiveKind::Controller.flag("PassContext").is_none());
        assert!(DirectiveKind::Inject.flags().is_empty());
        assert_eq!(DirectiveKind::Route.arity(), (2, 2));
    }
}
