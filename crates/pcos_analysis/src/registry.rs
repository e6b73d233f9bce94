//! Project registry for tracking parsed files and declared names.
//!
//! The `ProjectRegistry` tracks:
//! - Which files were reached from the entries, in traversal order
//! - Which top-level names are declared, and by which file
//!
//! [`RegistryBuilder`] fills it by walking import edges breadth-first from the
//! entry files. Each traversal level is parsed in parallel and committed in
//! discovery order, so the result does not depend on thread scheduling.

use std::collections::{BTreeMap, BTreeSet};

use im::OrdMap;
use pcos_foundation::{Diagnostic, DiagnosticCode, ErrorKind, FileId, Result, SourceSpan, Span};
use pcos_syntax::{Declaration, ParsedFile, SourceFile, parse_source_file};
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::cancel::CancellationToken;

// =============================================================================
// DeclRef
// =============================================================================

/// Location of a top-level declaration in the registry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclRef {
    /// Index into [`ProjectRegistry::files`].
    pub file: usize,
    /// Index into that file's declarations.
    pub index: usize,
}

// =============================================================================
// ProjectRegistry
// =============================================================================

/// Registry of every file reached from the entries and its declarations.
///
/// Provides:
/// - Files in traversal order
/// - Name lookup (first-seen wins)
/// - Iteration over all declarations, nested ones included
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectRegistry {
    /// Parsed files in traversal order.
    files: Vec<SourceFile>,
    /// Map from declared name to its location.
    names: OrdMap<String, DeclRef>,
}

impl ProjectRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files in traversal order.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Lookup a file by id.
    #[must_use]
    pub fn file(&self, id: &FileId) -> Option<&SourceFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Check if a file was parsed into the registry.
    #[must_use]
    pub fn has_file(&self, id: &FileId) -> bool {
        self.file(id).is_some()
    }

    /// Lookup a declaration by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.names.get(name).and_then(|r| self.resolve(*r))
    }

    /// Lookup where a name is declared.
    #[must_use]
    pub fn decl_ref(&self, name: &str) -> Option<DeclRef> {
        self.names.get(name).copied()
    }

    /// Resolves a reference to its declaration.
    #[must_use]
    pub fn resolve(&self, decl: DeclRef) -> Option<&Declaration> {
        self.files
            .get(decl.file)
            .and_then(|f| f.declarations.get(decl.index))
    }

    /// Check if a name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns all declared names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.names.keys().map(String::as_str).collect()
    }

    /// Number of indexed names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no name is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Top-level declarations in arena order (duplicates included).
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.files.iter().flat_map(|f| f.declarations.iter())
    }

    /// Every declaration, nested ones included, in arena order.
    #[must_use]
    pub fn all_declarations(&self) -> Vec<&Declaration> {
        let mut all = Vec::new();
        for declaration in self.declarations() {
            declaration.walk(&mut |d| all.push(d));
        }
        all
    }

    /// Declared interfaces, by name.
    pub fn interfaces(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.names.iter().filter_map(|(name, r)| {
            self.resolve(*r)
                .filter(|d| d.is_interface())
                .map(|d| (name.as_str(), d))
        })
    }

    /// Appends a file and indexes its declarations.
    ///
    /// Returns the names that were already taken, each with the earlier
    /// location and the index of the rejected declaration.
    fn insert_file(&mut self, file: SourceFile) -> Vec<(DeclRef, usize)> {
        let file_index = self.files.len();
        let mut duplicates = Vec::new();
        for (index, declaration) in file.declarations.iter().enumerate() {
            match self.names.get(&declaration.name) {
                Some(first) => duplicates.push((*first, index)),
                None => {
                    self.names.insert(
                        declaration.name.clone(),
                        DeclRef {
                            file: file_index,
                            index,
                        },
                    );
                }
            }
        }
        self.files.push(file);
        duplicates
    }
}

// =============================================================================
// RegistryBuilder
// =============================================================================

/// Builds a [`ProjectRegistry`] from an in-memory source map.
pub struct RegistryBuilder<'a> {
    sources: &'a BTreeMap<FileId, String>,
    cancel: &'a CancellationToken,
    registry: ProjectRegistry,
    diagnostics: Vec<Diagnostic>,
    visited: BTreeSet<FileId>,
}

impl<'a> RegistryBuilder<'a> {
    /// Creates a builder over the given sources.
    #[must_use]
    pub fn new(sources: &'a BTreeMap<FileId, String>, cancel: &'a CancellationToken) -> Self {
        Self {
            sources,
            cancel,
            registry: ProjectRegistry::new(),
            diagnostics: Vec::new(),
            visited: BTreeSet::new(),
        }
    }

    /// Traverses imports from `entries` and returns the registry plus the
    /// diagnostics found along the way.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Cancelled`] if the token is cancelled; no partial
    /// registry is returned.
    pub fn build(
        sources: &'a BTreeMap<FileId, String>,
        entries: &[FileId],
        cancel: &'a CancellationToken,
    ) -> Result<(ProjectRegistry, Vec<Diagnostic>)> {
        Self::new(sources, cancel).run(entries)
    }

    /// Runs the traversal.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Cancelled`] if the token is cancelled.
    #[instrument(skip_all, fields(entries = entries.len(), sources = self.sources.len()))]
    pub fn run(mut self, entries: &[FileId]) -> Result<(ProjectRegistry, Vec<Diagnostic>)> {
        let mut wave = Vec::new();
        for entry in entries {
            if !self.sources.contains_key(entry) {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::UnknownEntry,
                    format!("entry `{entry}` is not among the provided sources"),
                    SourceSpan::new(entry.clone(), Span::at_start()),
                ));
            } else if self.visited.insert(entry.clone()) {
                wave.push(entry.clone());
            }
        }

        let mut level = 0;
        while !wave.is_empty() {
            self.cancel.check()?;
            debug!(level, files = wave.len(), "parsing wave");

            let sources = self.sources;
            let cancel = self.cancel;
            let results: Vec<Result<ParsedFile>> = wave
                .par_iter()
                .map(|id| {
                    cancel.check()?;
                    let text = sources.get(id).map_or("", String::as_str);
                    parse_source_file(id.clone(), text)
                })
                .collect();

            let mut next = Vec::new();
            for (id, result) in wave.into_iter().zip(results) {
                match result {
                    Ok(parsed) => self.commit(parsed, &mut next),
                    Err(err) => {
                        let file = err.file().cloned().unwrap_or(id);
                        match err.kind {
                            ErrorKind::ParseError {
                                message,
                                line,
                                column,
                                ..
                            } => {
                                debug!(%file, %message, "file excluded");
                                let text = self.sources.get(&file).map_or("", String::as_str);
                                self.diagnostics.push(Diagnostic::error(
                                    DiagnosticCode::ParseError,
                                    format!("{}: {message}", DiagnosticCode::ParseError.rule_name()),
                                    SourceSpan::new(file, span_at(text, line, column)),
                                ));
                            }
                            _ => return Err(err),
                        }
                    }
                }
            }
            wave = next;
            level += 1;
        }

        debug!(
            files = self.registry.files.len(),
            names = self.registry.len(),
            "registry built"
        );
        Ok((self.registry, self.diagnostics))
    }

    /// Adds a parsed file, queues its imports, and records duplicates.
    fn commit(&mut self, parsed: ParsedFile, next: &mut Vec<FileId>) {
        let ParsedFile { file, diagnostics } = parsed;
        self.diagnostics.extend(diagnostics);

        for import in &file.imports {
            if import.plain_css || import.target.starts_with("sass:") {
                continue;
            }
            match self.resolve_import(&file.id, &import.target) {
                Some(target) => {
                    trace!(from = %file.id, to = %target, "import resolved");
                    if self.visited.insert(target.clone()) {
                        next.push(target);
                    }
                }
                None => self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::UnresolvedImport,
                    format!("cannot resolve import `{}`", import.target),
                    import.span.clone(),
                )),
            }
        }

        let duplicates = self.registry.insert_file(file);
        let Some(file) = self.registry.files.last() else {
            return;
        };
        for (first, index) in duplicates {
            let second = &file.declarations[index];
            let mut diagnostic = Diagnostic::error(
                DiagnosticCode::DuplicateDeclaration,
                format!("`{}` is already declared", second.name),
                second.span.clone(),
            );
            if let Some(original) = self.registry.resolve(first) {
                diagnostic = diagnostic.with_related(original.span.clone(), "first declared here");
            }
            self.diagnostics.push(diagnostic);
        }
    }

    /// Resolves an import target against the source map.
    ///
    /// Candidates are tried relative to the importing file's directory, then
    /// from the root.
    fn resolve_import(&self, from: &FileId, target: &str) -> Option<FileId> {
        let directory = from.directory();
        let mut bases = Vec::with_capacity(2);
        if !directory.is_empty() {
            bases.push(format!("{directory}/{target}"));
        }
        bases.push(target.to_string());

        bases
            .iter()
            .flat_map(|base| import_candidates(base))
            .filter_map(|candidate| normalize_path(&candidate))
            .map(FileId::new)
            .find(|candidate| self.sources.contains_key(candidate))
    }
}

/// `t`, `t.scss`, `_t.scss`, `t.css`, `t/index.scss`, `t/_index.scss`.
fn import_candidates(base: &str) -> Vec<String> {
    let (parent, stem) = match base.rsplit_once('/') {
        Some((parent, stem)) => (format!("{parent}/"), stem),
        None => (String::new(), base),
    };
    vec![
        base.to_string(),
        format!("{base}.scss"),
        format!("{parent}_{stem}.scss"),
        format!("{base}.css"),
        format!("{base}/index.scss"),
        format!("{base}/_index.scss"),
    ]
}

/// Collapses `.` and `..` segments. Returns `None` for paths escaping the root.
fn normalize_path(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            part => parts.push(part),
        }
    }
    Some(parts.join("/"))
}

/// Builds a zero-width span at a 1-based line and column of `text`.
fn span_at(text: &str, line: u32, column: u32) -> Span {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1) as usize)
        .map(str::len)
        .sum();
    let offset = text[line_start..]
        .char_indices()
        .nth(column.saturating_sub(1) as usize)
        .map_or(text.len(), |(i, _)| line_start + i);
    Span::new(offset, offset, line, column)
}

// =============================================================================
// Tests
// =============================================================================
