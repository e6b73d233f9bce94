//! Diagnostic records produced by every analysis stage.
//!
//! A [`Diagnostic`] is created once and never mutated afterwards. Diagnostics
//! carry a total order so that a run over identical input always produces the
//! same sequence.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::file::SourceSpan;

/// How serious a diagnostic is.
///
/// Declared most-severe first so that, at equal positions, errors sort
/// before warnings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Fails the run under the default exit policy.
    Error,
    /// Reported but does not fail the run by default.
    Warning,
    /// Informational only.
    Info,
}

impl Severity {
    /// Returns the lowercase label used in rendered output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identifier for the rule or stage that produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagnosticCode {
    // Parsing
    /// A file was excluded because it failed to parse.
    ParseError,
    /// An entry file id was not present in the source map.
    UnknownEntry,
    /// An import target could not be matched to any provided file.
    UnresolvedImport,
    /// A comment was not attached to any declaration.
    OrphanComment,

    // Doc blocks
    /// A `@param`/`@prop`/`@type` tag did not follow its grammar.
    MalformedTag,
    /// A singular tag appeared more than once in one block.
    DuplicateTag,

    // Selector grammar
    /// Selector lacks a type prefix.
    MissingPrefix,
    /// Selector uses a prefix outside the allowed set.
    UnknownPrefix,
    /// Prefix disagrees with the declared kind.
    PrefixKindMismatch,
    /// An identifier segment is not lowercase-hyphenated.
    InvalidSegment,
    /// Too many nested BEM elements.
    ElementDepth,
    /// More than one modifier on a block or element.
    MultipleModifiers,

    // Resolution
    /// A second declaration reused an already-registered name.
    DuplicateDeclaration,
    /// An `@implements` target did not resolve to an interface.
    UnresolvedReference,
    /// An `@include` of a prefixed name did not resolve.
    UnresolvedInclude,

    // Conformance
    /// An implementer lacks a member or modifier of its interface.
    InterfaceConformance,
    /// Type tags on both sides of a contract member disagree.
    TypeMismatch,
}

impl DiagnosticCode {
    /// Returns the kebab-case code used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse-error",
            Self::UnknownEntry => "unknown-entry",
            Self::UnresolvedImport => "unresolved-import",
            Self::OrphanComment => "orphan-comment",
            Self::MalformedTag => "malformed-tag",
            Self::DuplicateTag => "duplicate-tag",
            Self::MissingPrefix => "missing-prefix",
            Self::UnknownPrefix => "unknown-prefix",
            Self::PrefixKindMismatch => "prefix-kind-mismatch",
            Self::InvalidSegment => "invalid-segment",
            Self::ElementDepth => "element-depth",
            Self::MultipleModifiers => "multiple-modifiers",
            Self::DuplicateDeclaration => "duplicate-declaration",
            Self::UnresolvedReference => "unresolved-reference",
            Self::UnresolvedInclude => "unresolved-include",
            Self::InterfaceConformance => "interface-conformance",
            Self::TypeMismatch => "type-mismatch",
        }
    }

    /// Returns a short human-readable name of the rule.
    #[must_use]
    pub const fn rule_name(self) -> &'static str {
        match self {
            Self::ParseError => "file excluded due to parse error",
            Self::UnknownEntry => "unknown entry file",
            Self::UnresolvedImport => "unresolved import",
            Self::OrphanComment => "orphan comment",
            Self::MalformedTag => "malformed tag",
            Self::DuplicateTag => "duplicate tag",
            Self::MissingPrefix => "missing type prefix",
            Self::UnknownPrefix => "unknown type prefix",
            Self::PrefixKindMismatch => "prefix does not match declared type",
            Self::InvalidSegment => "invalid identifier segment",
            Self::ElementDepth => "element nesting depth exceeded",
            Self::MultipleModifiers => "multiple modifiers",
            Self::DuplicateDeclaration => "duplicate declaration",
            Self::UnresolvedReference => "unresolved reference",
            Self::UnresolvedInclude => "unresolved include",
            Self::InterfaceConformance => "interface conformance violation",
            Self::TypeMismatch => "type mismatch",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary location attached to a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelatedSpan {
    /// The related location.
    pub span: SourceSpan,
    /// What the location is.
    pub message: String,
}

/// A single finding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// Which rule produced it.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// Primary location.
    pub span: SourceSpan,
    /// Other locations involved (e.g. the interface being implemented).
    pub related: Vec<RelatedSpan>,
    /// Mechanically derived correction, when one exists.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity.
    #[must_use]
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            span,
            related: Vec::new(),
            suggestion: None,
        }
    }

    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    /// Creates an informational diagnostic.
    #[must_use]
    pub fn info(code: DiagnosticCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Info, code, message, span)
    }

    /// Adds a related location.
    #[must_use]
    pub fn with_related(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.related.push(RelatedSpan {
            span,
            message: message.into(),
        });
        self
    }

    /// Sets the suggested correction.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns true if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.span
            .sort_key()
            .cmp(&other.span.sort_key())
            .then_with(|| self.severity.cmp(&other.severity))
            .then_with(|| self.code.cmp(&other.code))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| self.span.span.end.cmp(&other.span.span.end))
            .then_with(|| self.suggestion.cmp(&other.suggestion))
            .then_with(|| {
                let lhs = self.related.iter().map(|r| (r.span.sort_key(), &r.message));
                let rhs = other.related.iter().map(|r| (r.span.sort_key(), &r.message));
                lhs.cmp(rhs)
            })
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.span, self.severity, self.code, self.message
        )
    }
}
