//! Diagnostic collection and output.

use std::fmt::Write;

use pcos_foundation::{Diagnostic, Severity};

use crate::registry::ProjectRegistry;

/// Collects diagnostics from every stage and puts them in final order.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Adds many diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Number of diagnostics collected so far, repeats included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sorts by (file, line, column, severity, code, message) and drops exact
    /// repeats.
    #[must_use]
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort();
        self.diagnostics.dedup();
        self.diagnostics
    }
}

/// When a run counts as failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Fail if any error was reported.
    #[default]
    FailOnError,
    /// Fail if any error or warning was reported.
    FailOnWarning,
}

/// The outcome of an analysis run.
#[derive(Clone, Debug)]
pub struct Report {
    registry: ProjectRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Creates a report; diagnostics are put in final order.
    #[must_use]
    pub fn new(registry: ProjectRegistry, diagnostics: Vec<Diagnostic>) -> Self {
        let mut reporter = DiagnosticReporter::new();
        reporter.extend(diagnostics);
        Self {
            registry,
            diagnostics: reporter.finish(),
        }
    }

    /// Diagnostics in total order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The project registry.
    #[must_use]
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Returns true if any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of diagnostics with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Process exit code under the given policy: `0` on success, `1` on failure.
    #[must_use]
    pub fn exit_code(&self, policy: ExitPolicy) -> i32 {
        let failed = match policy {
            ExitPolicy::FailOnError => self.has_errors(),
            ExitPolicy::FailOnWarning => self
                .diagnostics
                .iter()
                .any(|d| matches!(d.severity, Severity::Error | Severity::Warning)),
        };
        i32::from(failed)
    }

    /// Renders every diagnostic followed by a summary line.
    ///
    /// ```text
    /// b.scss:2:1: error[duplicate-declaration]: `c-button` is already declared
    ///   note: a.scss:1:1: first declared here
    /// 1 error, 0 warnings, 0 info
    /// ```
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{diagnostic}");
            for related in &diagnostic.related {
                let _ = writeln!(out, "  note: {}: {}", related.span, related.message);
            }
            if let Some(suggestion) = &diagnostic.suggestion {
                let _ = writeln!(out, "  help: did you mean `{suggestion}`?");
            }
        }
        let errors = self.count(Severity::Error);
        let warnings = self.count(Severity::Warning);
        let _ = writeln!(
            out,
            "{errors} error{}, {warnings} warning{}, {} info",
            plural(errors),
            plural(warnings),
            self.count(Severity::Info)
        );
        out
    }

    /// Splits the report into its registry and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (ProjectRegistry, Vec<Diagnostic>) {
        (self.registry, self.diagnostics)
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
