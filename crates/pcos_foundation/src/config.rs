//! Settings record consumed by the analyzer.
//!
//! Loading the record (from a project file, CLI flags, …) is the caller's job;
//! the analyzer only reads it.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;

/// Configuration for one analysis run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AnalysisConfig {
    /// Type prefixes accepted at the start of a selector.
    pub allowed_prefixes: BTreeSet<String>,

    /// Maximum number of `__` element segments in one selector.
    pub max_element_nesting_depth: usize,

    /// Whether an unresolved `@implements` is an error (otherwise a warning).
    pub treat_unresolved_implements_as_error: bool,

    /// Severity for contract members whose type tags disagree.
    pub type_mismatch_severity: Severity,

    /// Known namespace segments that may follow the type prefix.
    pub namespaces: BTreeSet<String>,

    /// Also validate undocumented top-level selectors that are not classes.
    pub validate_bare_selectors: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: ["c", "u"].into_iter().map(String::from).collect(),
            max_element_nesting_depth: 1,
            treat_unresolved_implements_as_error: true,
            type_mismatch_severity: Severity::Warning,
            namespaces: BTreeSet::new(),
            validate_bare_selectors: false,
        }
    }
}

impl AnalysisConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the allowed prefixes.
    #[must_use]
    pub fn with_allowed_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the element nesting limit.
    #[must_use]
    pub fn with_max_element_nesting_depth(mut self, depth: usize) -> Self {
        self.max_element_nesting_depth = depth;
        self
    }

    /// Builder method to choose the severity of unresolved `@implements`.
    #[must_use]
    pub fn with_unresolved_implements_as_error(mut self, as_error: bool) -> Self {
        self.treat_unresolved_implements_as_error = as_error;
        self
    }

    /// Builder method to set the type mismatch severity.
    #[must_use]
    pub fn with_type_mismatch_severity(mut self, severity: Severity) -> Self {
        self.type_mismatch_severity = severity;
        self
    }

    /// Builder method to register a namespace segment.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.insert(namespace.into());
        self
    }

    /// Builder method to enable validation of bare (non-class) selectors.
    #[must_use]
    pub fn with_bare_selector_validation(mut self, enabled: bool) -> Self {
        self.validate_bare_selectors = enabled;
        self
    }

    /// Severity used for an unresolved `@implements`.
    #[must_use]
    pub fn unresolved_implements_severity(&self) -> Severity {
        if self.treat_unresolved_implements_as_error {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// Returns true if `prefix` is in the allowed set.
    #[must_use]
    pub fn is_allowed_prefix(&self, prefix: &str) -> bool {
        self.allowed_prefixes.contains(prefix)
    }
}
