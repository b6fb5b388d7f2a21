use super::Registry;
use crate::metadata::ParserDefinition;

pub type ParserRegistry = Registry<ParserDefinition>;

/// Built-in parser names and the Rust type each produces.
pub const BUILTIN_PARSERS: &[(&str, &str)] = &[
    ("string", "String"),
    ("int", "i64"),
    ("i8", "i8"),
    ("i16", "i16"),
    ("i32", "i32"),
    ("i64", "i64"),
    ("u8", "u8"),
    ("u16", "u16"),
    ("u32", "u32"),
    ("u64", "u64"),
    ("f32", "f32"),
    ("f64", "f64"),
    ("bool", "bool"),
    ("uuid", "uuid::Uuid"),
];

/// Convenience spellings and their canonical built-in.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("String", "string"),
    ("str", "string"),
    ("integer", "int"),
    ("isize", "int"),
    ("usize", "u64"),
    ("float", "f64"),
    ("double", "f64"),
    ("boolean", "bool"),
    ("Uuid", "uuid"),
    ("UUID", "uuid"),
];

impl Registry<ParserDefinition> {
    /// A parser registry pre-populated with the built-ins and aliases.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new("parser");
        for (name, target) in BUILTIN_PARSERS {
            registry.seed_builtin(ParserDefinition::builtin(name, target));
        }
        for (alias, canonical) in BUILTIN_ALIASES {
            registry.add_alias(*alias, *canonical);
        }
        registry
    }
}
