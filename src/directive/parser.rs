//! Recursive-descent parser turning directive tokens into a [`RawDirective`].
//!
//! ```text
//! directive  := "wire::" kind argument*
//! argument   := flag | positional
//! flag       := "-" Name ( "=" value )?
//! positional := word | quoted
//! value      := word | quoted
//! ```
//!
//! Flags are checked against the schema of the kind right here so that an
//! unknown flag is reported with the list of valid ones before any
//! kind-specific interpretation happens.

use super::kind::{DirectiveKind, FlagValue, DIRECTIVE_PREFIX};
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{suggest, Diagnostic, Location, Result, WireError};
use serde::Serialize;

/// A flag exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFlag {
    pub name: String,
    pub value: Option<String>,
}

/// Untyped record of one directive: kind, positional text, raw flags and
/// where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawDirective {
    pub kind: DirectiveKind,
    pub positional: Vec<String>,
    pub flags: Vec<RawFlag>,
    pub location: Location,
    /// The directive text after the prefix, for diagnostics
    pub text: String,
}

impl RawDirective {
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&RawFlag> {
        self.flags.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }
}

/// Whether a doc line is a directive at all.
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    line.trim_start().starts_with(DIRECTIVE_PREFIX)
}

/// Parse one doc-comment line.
///
/// Returns `Ok(None)` when the line does not carry the directive prefix.
pub fn parse_directive(line: &str, location: Location) -> Result<Option<RawDirective>> {
    let trimmed = line.trim();
    let Some(body) = trimmed.strip_prefix(DIRECTIVE_PREFIX) else {
        return Ok(None);
    };
    let tokens = Lexer::tokenize(body).map_err(|e| e.or_at(&location))?;
    DirectiveParser {
        tokens,
        pos: 0,
        text: body.trim(),
        location,
    }
    .parse()
    .map(Some)
}

struct DirectiveParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    text: &'a str,
    location: Location,
}

impl DirectiveParser<'_> {
    fn parse(mut self) -> Result<RawDirective> {
        let kind = self.kind()?;
        let mut positional = Vec::new();
        let mut flags: Vec<RawFlag> = Vec::new();

        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::FlagName(name) => {
                    let flag = self.flag(kind, name)?;
                    if flags.iter().any(|f| f.name == flag.name) {
                        return Err(self.error(
                            format!("flag `-{}` given more than once on `{}`", flag.name, kind),
                            Some(("flag", flag.name.clone())),
                        ));
                    }
                    flags.push(flag);
                }
                TokenKind::Word(text) | TokenKind::Quoted(text) => positional.push(text),
                TokenKind::Equals => {
                    return Err(self.error(
                        format!("unexpected `=` at column {}", token.column),
                        None,
                    ))
                }
            }
        }

        let (min, max) = kind.arity();
        if positional.len() < min || positional.len() > max {
            let expected = if min == max {
                format!("{}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(WireError::syntax(
                Diagnostic::new(format!(
                    "`{}` takes {} positional argument(s), found {}; usage: {}",
                    kind,
                    expected,
                    positional.len(),
                    kind.usage()
                ))
                .at(self.location.clone())
                .with_context("directive", self.text),
            ));
        }

        Ok(RawDirective {
            kind,
            positional,
            flags,
            location: self.location,
            text: self.text.to_string(),
        })
    }

    fn kind(&mut self) -> Result<DirectiveKind> {
        let name = match self.advance() {
            Some(Token {
                kind: TokenKind::Word(w),
                ..
            }) => w,
            _ => {
                return Err(WireError::syntax(
                    Diagnostic::new(format!(
                        "directive prefix `{}` must be followed by a kind",
                        DIRECTIVE_PREFIX
                    ))
                    .at(self.location.clone())
                    .with_suggestions(DirectiveKind::vocabulary()),
                ))
            }
        };
        DirectiveKind::parse(&name).ok_or_else(|| {
            WireError::syntax(
                Diagnostic::new(format!(
                    "unknown directive `{}{}`",
                    DIRECTIVE_PREFIX, name
                ))
                .at(self.location.clone())
                .with_context("kind", name.clone())
                .with_suggestions(suggest(&name, DirectiveKind::vocabulary())),
            )
        })
    }

    fn flag(&mut self, kind: DirectiveKind, name: String) -> Result<RawFlag> {
        let Some(spec) = kind.flag(&name) else {
            let valid: Vec<String> = kind.flags().iter().map(|f| format!("-{}", f.name)).collect();
            let message = if valid.is_empty() {
                format!("unknown flag `-{}`: `{}` takes no flags", name, kind)
            } else {
                format!(
                    "unknown flag `-{}` for `{}`; valid flags: {}",
                    name,
                    kind,
                    valid.join(", ")
                )
            };
            let ranked = suggest(&name, kind.flags().iter().map(|f| f.name));
            return Err(WireError::syntax(
                Diagnostic::new(message)
                    .at(self.location.clone())
                    .with_context("flag", name.clone())
                    .with_context("directive", self.text)
                    .with_suggestions(ranked.into_iter().map(|s| format!("-{}", s))),
            ));
        };

        let value = if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::Equals)
        ) {
            self.advance();
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Word(v) | TokenKind::Quoted(v),
                    ..
                }) => Some(v),
                _ => {
                    return Err(self.error(
                        format!("flag `-{}=` is missing a value", name),
                        Some(("flag", name)),
                    ))
                }
            }
        } else {
            None
        };

        match (spec.value, &value) {
            (FlagValue::Switch, None) => {}
            (FlagValue::Switch, Some(v)) if v == "true" || v == "false" => {}
            (FlagValue::Switch, Some(v)) => {
                return Err(self.error(
                    format!("flag `-{}` is a switch; expected no value or true/false, found `{}`", name, v),
                    Some(("flag", name)),
                ))
            }
            (FlagValue::Choice { default: Some(_), .. }, None) => {}
            (_, None) => {
                return Err(self.error(
                    format!("flag `-{}` on `{}` requires a value (`-{}=...`)", name, kind, name),
                    Some(("flag", name)),
                ))
            }
            (FlagValue::Integer, Some(v)) if v.parse::<i32>().is_err() => {
                return Err(self.error(
                    format!("flag `-{}` expects an integer, found `{}`", name, v),
                    Some(("flag", name)),
                ))
            }
            (FlagValue::Choice { choices, .. }, Some(v)) if !choices.contains(&v.as_str()) => {
                let message = format!(
                    "flag `-{}` expects one of {}, found `{}`",
                    name,
                    choices.join("|"),
                    v
                );
                return Err(WireError::syntax(
                    Diagnostic::new(message)
                        .at(self.location.clone())
                        .with_context("flag", name)
                        .with_suggestions(suggest(v, choices.iter().copied())),
                ));
            }
            (FlagValue::List, Some(v))
                if v.split(',').any(|item| item.trim().is_empty()) =>
            {
                return Err(self.error(
                    format!("flag `-{}` has an empty entry in `{}`", name, v),
                    Some(("flag", name)),
                ))
            }
            (FlagValue::Text, Some(v)) if v.is_empty() => {
                return Err(self.error(
                    format!("flag `-{}` has an empty value", name),
                    Some(("flag", name)),
                ))
            }
            _ => {}
        }

        Ok(RawFlag { name, value })
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn error(&self, message: String, context: Option<(&str, String)>) -> WireError {
        let mut diagnostic = Diagnostic::new(message)
            .at(self.location.clone())
            .with_context("directive", self.text);
        if let Some((key, value)) = context {
            diagnostic = diagnostic.with_context(key, value);
        }
        WireError::syntax(diagnostic)
    }
}
