//! # Path Specification Model
//!
//! Parses route path templates such as `/users/{id:int}/files/{*}` into typed
//! segments.
//!
//! ## Grammar
//!
//! ```text
//! path        := (literal | placeholder)*
//! placeholder := "{" name "}"          // parameter, type defaults to "string"
//!              | "{" name ":" type "}" // typed parameter
//!              | "{*}"                 // trailing wildcard
//! name, type  := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! The wildcard must be the final segment and may appear at most once.
//! Parameter names are unique within a path. Parsing is left-to-right and
//! adjacent literal text always ends up in a single [`Segment::Static`].
//!
//! ```rust
//! use brrtwire::path::{extract_parameter_types, PathSpecification};
//!
//! let spec = PathSpecification::parse("/users/{id:int}/files/{*}").unwrap();
//! assert_eq!(spec.segments().len(), 4);
//! assert_eq!(extract_parameter_types("/users/{id}").unwrap()["id"], "string");
//! ```

use crate::error::{Diagnostic, Result, WireError};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Type assigned to parameters declared without `:type`.
pub const DEFAULT_PARAMETER_TYPE: &str = "string";

/// Literal spelling of the trailing wildcard.
pub const WILDCARD: &str = "{*}";

/// One piece of a route path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum Segment {
    /// Literal text, matched verbatim
    Static { text: String },
    /// Named path parameter bound through the parser registered for `ty`
    Parameter { name: String, ty: String },
    /// Trailing wildcard capturing the rest of the path
    Wildcard,
}

impl Segment {
    fn render_into(&self, out: &mut String) {
        match self {
            Segment::Static { text } => out.push_str(text),
            Segment::Parameter { name, ty } if ty == DEFAULT_PARAMETER_TYPE => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Segment::Parameter { name, ty } => {
                out.push('{');
                out.push_str(name);
                out.push(':');
                out.push_str(ty);
                out.push('}');
            }
            Segment::Wildcard => out.push_str(WILDCARD),
        }
    }
}

/// Parsed, typed representation of a route path template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PathSpecification {
    segments: Vec<Segment>,
}

impl PathSpecification {
    /// Parse a raw path template.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` for unbalanced or nested braces, empty or
    /// malformed placeholders, duplicate parameter names, a wildcard that is
    /// not the final segment, or more than one wildcard.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut spec = PathSpecification::default();
        let mut literal = String::new();
        let mut chars = raw.char_indices();

        while let Some((start, c)) = chars.next() {
            match c {
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (pos, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(path_error(raw, pos, "nested '{' inside placeholder"));
                            }
                            other => body.push(other),
                        }
                    }
                    if !closed {
                        return Err(path_error(raw, start, "unbalanced '{': missing closing '}'"));
                    }
                    spec.push_static(std::mem::take(&mut literal));
                    spec.segments.push(parse_placeholder(raw, start, &body)?);
                }
                '}' => {
                    return Err(path_error(raw, start, "unbalanced '}': no matching '{'"));
                }
                other => literal.push(other),
            }
        }
        spec.push_static(literal);
        spec.check(raw)?;
        Ok(spec)
    }

    /// Join a controller prefix and a route path into one specification.
    ///
    /// A trailing `/` on the prefix and a missing leading `/` on the path are
    /// normalised. The combined template is re-parsed, so duplicate
    /// parameters across prefix and path are rejected.
    pub fn join(prefix: &str, path: &str) -> Result<Self> {
        PathSpecification::parse(&join_raw(prefix, path))
    }

    /// Build a specification from segments, enforcing the grammar invariants.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        let mut spec = PathSpecification::default();
        for segment in segments {
            match segment {
                Segment::Static { text } => spec.push_static(text),
                other => spec.segments.push(other),
            }
        }
        let rendered = spec.render();
        spec.check(&rendered)?;
        Ok(spec)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Named parameters in declaration order as `(name, type)`.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Parameter { name, ty } => Some((name.as_str(), ty.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn parameter_type(&self, name: &str) -> Option<&str> {
        self.parameters().find(|(n, _)| *n == name).map(|(_, t)| t)
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Static { .. }))
    }

    /// Canonical template text; re-parsing it yields the same segments.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            segment.render_into(&mut out);
        }
        out
    }

    fn push_static(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Static { text: prev }) = self.segments.last_mut() {
            prev.push_str(&text);
        } else {
            self.segments.push(Segment::Static { text });
        }
    }

    fn check(&self, raw: &str) -> Result<()> {
        let wildcards = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Wildcard))
            .count();
        if wildcards > 1 {
            return Err(WireError::syntax(
                Diagnostic::new(format!(
                    "path `{}` declares {} wildcards; at most one `{{*}}` is allowed",
                    raw, wildcards
                ))
                .with_context("path", raw),
            ));
        }
        if wildcards == 1 && !self.has_wildcard() {
            return Err(WireError::syntax(
                Diagnostic::new(format!(
                    "path `{}`: wildcard `{{*}}` must be the final segment",
                    raw
                ))
                .with_context("path", raw),
            ));
        }
        let mut seen = HashSet::new();
        for (name, _) in self.parameters() {
            if !seen.insert(name) {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "path `{}` declares parameter `{}` more than once",
                        raw, name
                    ))
                    .with_context("path", raw)
                    .with_context("parameter", name),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PathSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Check a raw path template against the grammar.
pub fn validate(raw: &str) -> Result<()> {
    PathSpecification::parse(raw).map(|_| ())
}

/// Map every parameter name in `raw` to its declared (or default) type.
pub fn extract_parameter_types(raw: &str) -> Result<BTreeMap<String, String>> {
    let spec = PathSpecification::parse(raw)?;
    Ok(spec
        .parameters()
        .map(|(name, ty)| (name.to_string(), ty.to_string()))
        .collect())
}

fn join_raw(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if path.is_empty() {
        return if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        };
    }
    if path.starts_with('/') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}/{}", prefix, path)
    }
}

fn parse_placeholder(raw: &str, start: usize, body: &str) -> Result<Segment> {
    if body == "*" {
        return Ok(Segment::Wildcard);
    }
    if body.is_empty() {
        return Err(path_error(raw, start, "empty placeholder `{}`"));
    }
    let (name, ty) = match body.split_once(':') {
        Some((name, ty)) => (name, Some(ty)),
        None => (body, None),
    };
    if !is_identifier(name) {
        return Err(path_error(
            raw,
            start,
            &format!("invalid parameter name `{}` in `{{{}}}`", name, body),
        ));
    }
    let ty = match ty {
        None => DEFAULT_PARAMETER_TYPE.to_string(),
        Some("") => {
            return Err(path_error(
                raw,
                start,
                &format!("missing type after ':' in `{{{}}}`", body),
            ))
        }
        Some(t) if is_identifier(t) => t.to_string(),
        Some(t) => {
            return Err(path_error(
                raw,
                start,
                &format!("invalid parameter type `{}` in `{{{}}}`", t, body),
            ))
        }
    };
    Ok(Segment::Parameter {
        name: name.to_string(),
        ty,
    })
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn path_error(raw: &str, column: usize, message: &str) -> WireError {
    WireError::syntax(
        Diagnostic::new(format!("invalid path `{}`: {}", raw, message))
            .with_context("path", raw)
            .with_context("column", (column + 1).to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_mixed_segments() {
        let spec = PathSpecification::parse("/users/{id:int}/files/{*}").unwrap();
        assert_eq!(
            spec.segments(),
            &[
                Segment::Static {
                    text: "/users/".into()
                },
                Segment::Parameter {
                    name: "id".into(),
                    ty: "int".into()
                },
                Segment::Static {
                    text: "/files/".into()
                },
                Segment::Wildcard,
            ]
        );
        assert!(spec.has_wildcard());
    }

    #[test]
    fn test_static_round_trip() {
        for raw in ["/", "/health", "/api/v1/users", "relative/path", ""] {
            let spec = PathSpecification::parse(raw).unwrap();
            assert!(spec.is_static());
            let again = PathSpecification::parse(&spec.render()).unwrap();
            assert_eq!(spec, again, "round trip of {raw:?}");
        }
    }

    #[test]
    fn test_render_is_canonical() {
        let spec = PathSpecification::parse("/a/{x:string}/{y:int}").unwrap();
        assert_eq!(spec.render(), "/a/{x}/{y:int}");
    }

    #[test]
    fn test_wildcard_placement() {
        assert!(validate("/a/b/{*}").is_ok());
        let err = validate("/a/{*}/b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("final segment"));
    }

    #[test]
    fn test_duplicate_wildcard() {
        let err = validate("/{*}/{*}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("at most one"));
        assert!(validate("/{*}{*}").is_err());
    }

    #[test]
    fn test_parameter_type_default() {
        let types = extract_parameter_types("/users/{id}").unwrap();
        assert_eq!(types.get("id").map(String::as_str), Some("string"));
        let types = extract_parameter_types("/users/{id:int}").unwrap();
        assert_eq!(types.get("id").map(String::as_str), Some("int"));
    }

    #[test]
    fn test_malformed_placeholders() {
        for raw in [
            "/{}",
            "/{id:}",
            "/{id",
            "/id}",
            "/{a{b}}",
            "/{:int}",
            "/{1d}",
            "/{id:in t}",
            "/{*name}",
        ] {
            let err = validate(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{raw}");
        }
    }

    #[test]
    fn test_duplicate_parameter_names() {
        assert!(validate("/a/{id}/b/{id:int}").is_err());
    }

    #[test]
    fn test_join_prefix() {
        let spec = PathSpecification::join("/api/", "/users/{id}").unwrap();
        assert_eq!(spec.render(), "/api/users/{id}");
        let spec = PathSpecification::join("/api", "users").unwrap();
        assert_eq!(spec.render(), "/api/users");
        let spec = PathSpecification::join("", "").unwrap();
        assert_eq!(spec.render(), "/");
        assert!(PathSpecification::join("/files/{*}", "/x").is_err());
        assert!(PathSpecification::join("/org/{id}", "/user/{id}").is_err());
    }

    #[test]
    fn test_from_segments_coalesces_static() {
        let spec = PathSpecification::from_segments(vec![
            Segment::Static { text: "/a".into() },
            Segment::Static { text: "/b".into() },
        ])
        .unwrap();
        assert_eq!(spec.segments().len(), 1);
        assert!(PathSpecification::from_segments(vec![Segment::Wildcard, Segment::Wildcard]).is_err());
    }
}
