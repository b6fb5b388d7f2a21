//! # Error Module
//!
//! Structured diagnostics for every stage of the wiring pipeline.
//!
//! Every user-facing failure is a [`WireError`]. The variant is the error kind
//! (syntax, signature, reference, conflict, configuration, i/o); the payload is
//! a [`Diagnostic`] carrying the message, the optional source location, a
//! context map (route, parameter, flag, ...) and an ordered list of
//! suggestions.
//!
//! Errors propagate unchanged up to the driver. Only the CLI layer turns them
//! into a process exit code.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on suggestions attached to a single diagnostic.
pub const MAX_SUGGESTIONS: usize = 10;

/// Minimum Jaro-Winkler similarity for a name to count as a close match.
const SIMILARITY_THRESHOLD: f64 = 0.75;

/// Result alias used across the crate.
pub type Result<T, E = WireError> = std::result::Result<T, E>;

/// A position in a scanned module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    /// Module (source file) the declaration lives in
    pub module: PathBuf,
    /// 1-based line number
    pub line: usize,
}

impl Location {
    pub fn new(module: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            module: module.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module.display(), self.line)
    }
}

/// Error kind, independent of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Syntax,
    Signature,
    Reference,
    Conflict,
    Configuration,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Signature => "SignatureError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Io => "IOError",
        };
        write!(f, "{}", s)
    }
}

/// Payload shared by every error kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable description naming the directive, route or parser at fault
    pub message: String,
    /// Where the problem was found, when known
    pub location: Option<Location>,
    /// Extra key/value context (route, parameter, flag, kind, ...)
    pub context: BTreeMap<String, String>,
    /// Ordered remediation candidates (closest first)
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn at_opt(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "; did you mean: {}", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

/// Every fatal failure the pipeline can report.
#[derive(Debug, Error)]
pub enum WireError {
    /// Malformed directive or path grammar
    #[error("SyntaxError: {0}")]
    Syntax(Box<Diagnostic>),
    /// Route parser (or middleware handler) shape mismatch
    #[error("SignatureError: {0}")]
    Signature(Box<Diagnostic>),
    /// Unresolved parser or middleware name
    #[error("ReferenceError: {0}")]
    Reference(Box<Diagnostic>),
    /// Duplicate registration
    #[error("ConflictError: {0}")]
    Conflict(Box<Diagnostic>),
    /// Unresolvable root import identifier or invalid configuration
    #[error("ConfigurationError: {0}")]
    Configuration(Box<Diagnostic>),
    /// File-system failure during scan, emission or clean
    #[error("IOError: {diagnostic}")]
    Io {
        diagnostic: Box<Diagnostic>,
        #[source]
        source: std::io::Error,
    },
}

impl WireError {
    pub fn syntax(diagnostic: Diagnostic) -> Self {
        WireError::Syntax(Box::new(diagnostic))
    }

    pub fn signature(diagnostic: Diagnostic) -> Self {
        WireError::Signature(Box::new(diagnostic))
    }

    pub fn reference(diagnostic: Diagnostic) -> Self {
        WireError::Reference(Box::new(diagnostic))
    }

    pub fn conflict(diagnostic: Diagnostic) -> Self {
        WireError::Conflict(Box::new(diagnostic))
    }

    pub fn configuration(diagnostic: Diagnostic) -> Self {
        WireError::Configuration(Box::new(diagnostic))
    }

    /// Wrap an i/o failure on `path`.
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        WireError::Io {
            diagnostic: Box::new(
                Diagnostic::new(format!("failed to {} {}: {}", action, path.display(), source))
                    .with_context("path", path.display().to_string()),
            ),
            source,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            WireError::Syntax(_) => ErrorKind::Syntax,
            WireError::Signature(_) => ErrorKind::Signature,
            WireError::Reference(_) => ErrorKind::Reference,
            WireError::Conflict(_) => ErrorKind::Conflict,
            WireError::Configuration(_) => ErrorKind::Configuration,
            WireError::Io { .. } => ErrorKind::Io,
        }
    }

    #[must_use]
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            WireError::Syntax(d)
            | WireError::Signature(d)
            | WireError::Reference(d)
            | WireError::Conflict(d)
            | WireError::Configuration(d) => d,
            WireError::Io { diagnostic, .. } => diagnostic,
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.diagnostic().location.as_ref()
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.diagnostic().suggestions
    }

    /// Fill in a location if the error does not carry one yet.
    #[must_use]
    pub fn or_at(mut self, location: &Location) -> Self {
        let diagnostic = match &mut self {
            WireError::Syntax(d)
            | WireError::Signature(d)
            | WireError::Reference(d)
            | WireError::Conflict(d)
            | WireError::Configuration(d) => d,
            WireError::Io { diagnostic, .. } => diagnostic,
        };
        if diagnostic.location.is_none() {
            diagnostic.location = Some(location.clone());
        }
        self
    }
}

/// Rank `known` names by similarity to `input`.
///
/// Close matches (Jaro-Winkler, case-insensitive) come first, best first. When
/// nothing is close, every known name is returned in sorted order so the user
/// still sees what is available. The list is capped at [`MAX_SUGGESTIONS`].
pub fn suggest<'a, I>(input: &str, known: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = input.to_lowercase();
    let mut all: Vec<&str> = known.into_iter().collect();
    all.sort_unstable();
    all.dedup();

    let mut close: Vec<(f64, &str)> = all
        .iter()
        .map(|name| (strsim::jaro_winkler(&needle, &name.to_lowercase()), *name))
        .filter(|(score, _)| *score >= SIMILARITY_THRESHOLD)
        .collect();
    close.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    let ranked: Vec<&str> = if close.is_empty() {
        all
    } else {
        close.into_iter().map(|(_, name)| name).collect()
    };
    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}
