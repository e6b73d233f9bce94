//! Integration tests for the project registry
//!
//! Tests import traversal, resolution, cycles, duplicates, and excluded files.

use std::collections::BTreeMap;

use pcos_analysis::{CancellationToken, DiagnosticCode, ProjectRegistry, RegistryBuilder, Severity};
use pcos_foundation::{Diagnostic, ErrorKind, FileId};

fn sources(files: &[(&str, &str)]) -> BTreeMap<FileId, String> {
    files
        .iter()
        .map(|(id, text)| (FileId::new(*id), (*text).to_string()))
        .collect()
}

fn build(files: &[(&str, &str)], entries: &[&str]) -> (ProjectRegistry, Vec<Diagnostic>) {
    let entries: Vec<FileId> = entries.iter().map(|e| FileId::new(*e)).collect();
    RegistryBuilder::build(&sources(files), &entries, &CancellationToken::new()).unwrap()
}

fn file_order(registry: &ProjectRegistry) -> Vec<&str> {
    registry.files().iter().map(|f| f.id.as_str()).collect()
}

#[test]
fn import_cycle_terminates() {
    let (registry, diagnostics) = build(
        &[
            ("a.scss", "@import 'b';\n.c-alpha {}\n"),
            ("b.scss", "@import 'a';\n.c-beta {}\n"),
        ],
        &["a.scss"],
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(file_order(&registry), vec!["a.scss", "b.scss"]);
    assert!(registry.contains("c-alpha"));
    assert!(registry.contains("c-beta"));
}

#[test]
fn duplicate_across_entries_keeps_the_first() {
    let (registry, diagnostics) = build(
        &[("a.scss", ".c-button {}\n"), ("b.scss", "\n.c-button {}\n")],
        &["a.scss", "b.scss"],
    );
    let first = registry.lookup("c-button").unwrap();
    assert_eq!(first.span.file.as_str(), "a.scss");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.file(&FileId::new("b.scss")).unwrap().declarations.len(), 1);

    assert_eq!(diagnostics.len(), 1);
    let duplicate = &diagnostics[0];
    assert_eq!(duplicate.code, DiagnosticCode::DuplicateDeclaration);
    assert_eq!(duplicate.severity, Severity::Error);
    assert_eq!(duplicate.span.to_string(), "b.scss:2:1");
    assert_eq!(duplicate.related[0].span.to_string(), "a.scss:1:1");
}

#[test]
fn partials_and_index_files_resolve() {
    let (registry, diagnostics) = build(
        &[
            ("styles/main.scss", "@use 'base';\n@use 'components';\n@use '../vendor/grid';"),
            ("styles/_base.scss", ".u-reset {}"),
            ("styles/components/_index.scss", "@forward 'card';"),
            ("styles/components/card.scss", ".c-card {}"),
            ("vendor/grid.css", ".u-grid {}"),
        ],
        &["styles/main.scss"],
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(registry.names(), vec!["c-card", "u-grid", "u-reset"]);
    assert_eq!(
        file_order(&registry),
        vec![
            "styles/main.scss",
            "styles/_base.scss",
            "styles/components/_index.scss",
            "vendor/grid.css",
            "styles/components/card.scss",
        ]
    );
}

#[test]
fn unresolved_and_ignored_imports() {
    let (_, diagnostics) = build(
        &[(
            "main.scss",
            "@use 'sass:math';\n@import url(https://fonts.test/a.css);\n@import 'missing';",
        )],
        &["main.scss"],
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnresolvedImport);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(diagnostics[0].message.contains("missing"));
}

#[test]
fn broken_file_is_excluded() {
    let (registry, diagnostics) = build(
        &[
            ("main.scss", "@import 'broken';\n.c-ok {}"),
            ("broken.scss", ".c-broken {\n  color: red;\n"),
        ],
        &["main.scss"],
    );
    assert!(registry.contains("c-ok"));
    assert!(!registry.contains("c-broken"));
    assert!(!registry.has_file(&FileId::new("broken.scss")));

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::ParseError);
    assert!(diagnostics[0].message.starts_with("file excluded due to parse error"));
    assert_eq!(diagnostics[0].span.to_string(), "broken.scss:1:11");
}

#[test]
fn unknown_entry() {
    let (registry, diagnostics) = build(&[("a.scss", ".c-a {}")], &["nope.scss", "a.scss"]);
    assert!(registry.contains("c-a"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnknownEntry);
}

#[test]
fn cancelled_build_fails() {
    let token = CancellationToken::new();
    token.cancel();
    let entries = [FileId::new("a.scss")];
    let err = RegistryBuilder::build(&sources(&[("a.scss", ".c-a {}")]), &entries, &token).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Cancelled));
}

#[test]
fn interfaces_are_listed() {
    let (registry, _) = build(
        &[(
            "a.scss",
            "/** @type interface\n @name i-a */\n%i-a {}\n.c-b {}\n",
        )],
        &["a.scss"],
    );
    let interfaces: Vec<_> = registry.interfaces().map(|(name, _)| name).collect();
    assert_eq!(interfaces, vec!["i-a"]);
}
