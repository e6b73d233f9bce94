//! The analysis pipeline.
//!
//! ```text
//! sources ──► registry (barrier) ──┬─► selector checks ──┐
//!                                  └─► conformance ──────┴─► report
//! ```

use std::collections::BTreeMap;

use pcos_foundation::{AnalysisConfig, Diagnostic, FileId, Result, Severity};
use pcos_syntax::Declaration;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::cancel::CancellationToken;
use crate::conformance;
use crate::registry::RegistryBuilder;
use crate::report::{DiagnosticReporter, Report};
use crate::selector;

/// In-memory sources plus the files traversal starts from.
#[derive(Clone, Debug, Default)]
pub struct AnalysisInput {
    /// Every file the analyzer may read, by id.
    pub sources: BTreeMap<FileId, String>,
    /// Entry files, in traversal order.
    pub entries: Vec<FileId>,
}

impl AnalysisInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source file.
    #[must_use]
    pub fn with_source(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(FileId::new(id), text.into());
        self
    }

    /// Adds an entry file.
    #[must_use]
    pub fn with_entry(mut self, id: impl Into<String>) -> Self {
        self.entries.push(FileId::new(id));
        self
    }

    /// Adds a source file that is also an entry.
    #[must_use]
    pub fn with_entry_source(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        self.with_source(id.clone(), text).with_entry(id)
    }
}

/// Runs every analysis stage under one configuration.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Creates an analyzer.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes `input` to completion.
    ///
    /// # Errors
    /// Never fails without a cancellation token; see
    /// [`analyze_with_cancel`](Self::analyze_with_cancel).
    pub fn analyze(&self, input: &AnalysisInput) -> Result<Report> {
        self.analyze_with_cancel(input, &CancellationToken::new())
    }

    /// Analyzes `input`, stopping early once `cancel` is triggered.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Cancelled`](pcos_foundation::ErrorKind::Cancelled)
    /// if cancellation was requested before the run finished.
    #[instrument(skip_all, fields(sources = input.sources.len(), entries = input.entries.len()))]
    pub fn analyze_with_cancel(
        &self,
        input: &AnalysisInput,
        cancel: &CancellationToken,
    ) -> Result<Report> {
        let (registry, registry_diagnostics) =
            RegistryBuilder::build(&input.sources, &input.entries, cancel)?;
        cancel.check()?;

        let declarations: Vec<&Declaration> = registry.declarations().collect();
        let selector_diagnostics: Vec<Diagnostic> = declarations
            .par_iter()
            .flat_map_iter(|declaration| selector::check_declaration(declaration, &self.config))
            .collect();
        debug!(
            declarations = declarations.len(),
            diagnostics = selector_diagnostics.len(),
            "selector checks done"
        );
        cancel.check()?;

        let conformance_diagnostics = conformance::check_registry(&registry, &self.config);
        debug!(diagnostics = conformance_diagnostics.len(), "conformance done");
        cancel.check()?;

        let mut reporter = DiagnosticReporter::new();
        reporter.extend(registry_diagnostics);
        reporter.extend(selector_diagnostics);
        reporter.extend(conformance_diagnostics);
        let report = Report::new(registry, reporter.finish());

        info!(
            files = report.registry().files().len(),
            declarations = report.registry().len(),
            errors = report.count(Severity::Error),
            warnings = report.count(Severity::Warning),
            info = report.count(Severity::Info),
            "analysis complete"
        );
        Ok(report)
    }
}
