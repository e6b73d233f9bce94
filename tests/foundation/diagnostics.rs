//! Integration tests for spans and diagnostics
//!
//! Tests file-qualified spans, diagnostic construction, display, and the
//! total order that keeps output stable.

use pcos_foundation::{Diagnostic, DiagnosticCode, FileId, Severity, SourceSpan, Span};
use proptest::prelude::*;

fn at(file: &str, line: u32, column: u32) -> SourceSpan {
    SourceSpan::new(FileId::new(file), Span::new(0, 0, line, column))
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn span_text_and_join() {
    let source = ".c-card { }";
    let selector = Span::new(0, 7, 1, 1);
    let block = Span::new(8, 11, 1, 9).with_end(1, 12);
    assert_eq!(selector.text(source), ".c-card");
    let whole = selector.to(block);
    assert_eq!(whole.text(source), source);
    assert_eq!(whole.len(), source.len());
    assert_eq!((whole.end_line, whole.end_column), (1, 12));
}

#[test]
fn source_span_displays_as_location() {
    assert_eq!(at("src/_button.scss", 12, 3).to_string(), "src/_button.scss:12:3");
}

#[test]
fn file_ids_order_lexicographically() {
    let mut ids = vec![FileId::new("b.scss"), FileId::new("a/z.scss"), FileId::new("a.scss")];
    ids.sort();
    let names: Vec<_> = ids.iter().map(FileId::as_str).collect();
    assert_eq!(names, vec!["a.scss", "a/z.scss", "b.scss"]);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn diagnostic_display() {
    let diagnostic = Diagnostic::warning(
        DiagnosticCode::UnresolvedImport,
        "cannot resolve import `theme`",
        at("main.scss", 1, 9),
    );
    assert_eq!(
        diagnostic.to_string(),
        "main.scss:1:9: warning[unresolved-import]: cannot resolve import `theme`"
    );
    assert!(!diagnostic.is_error());
}

#[test]
fn diagnostic_builders() {
    let diagnostic = Diagnostic::error(DiagnosticCode::MissingPrefix, "m", at("a.scss", 1, 1))
        .with_related(at("b.scss", 2, 2), "first")
        .with_related(at("c.scss", 3, 3), "second")
        .with_suggestion("c-button");
    assert_eq!(diagnostic.related.len(), 2);
    assert_eq!(diagnostic.related[1].message, "second");
    assert_eq!(diagnostic.suggestion.as_deref(), Some("c-button"));
}

#[test]
fn codes_have_kebab_case_names() {
    assert_eq!(DiagnosticCode::PrefixKindMismatch.as_str(), "prefix-kind-mismatch");
    assert_eq!(DiagnosticCode::InterfaceConformance.to_string(), "interface-conformance");
    assert_eq!(DiagnosticCode::ElementDepth.rule_name(), "element nesting depth exceeded");
}

#[test]
fn order_is_file_line_column_then_severity() {
    let mut diagnostics = vec![
        Diagnostic::info(DiagnosticCode::OrphanComment, "x", at("a.scss", 2, 1)),
        Diagnostic::error(DiagnosticCode::ParseError, "x", at("b.scss", 1, 1)),
        Diagnostic::warning(DiagnosticCode::UnresolvedImport, "x", at("a.scss", 2, 1)),
        Diagnostic::error(DiagnosticCode::MissingPrefix, "x", at("a.scss", 1, 5)),
        Diagnostic::error(DiagnosticCode::MissingPrefix, "x", at("a.scss", 2, 1)),
    ];
    diagnostics.sort();
    let order: Vec<_> = diagnostics
        .iter()
        .map(|d| (d.span.to_string(), d.severity))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a.scss:1:5".to_string(), Severity::Error),
            ("a.scss:2:1".to_string(), Severity::Error),
            ("a.scss:2:1".to_string(), Severity::Warning),
            ("a.scss:2:1".to_string(), Severity::Info),
            ("b.scss:1:1".to_string(), Severity::Error),
        ]
    );
}

#[test]
fn order_breaks_ties_by_code_then_message() {
    let a = Diagnostic::error(DiagnosticCode::MissingPrefix, "b", at("a.scss", 1, 1));
    let b = Diagnostic::error(DiagnosticCode::ElementDepth, "a", at("a.scss", 1, 1));
    let c = Diagnostic::error(DiagnosticCode::ElementDepth, "b", at("a.scss", 1, 1));
    let mut sorted = vec![a.clone(), c.clone(), b.clone()];
    sorted.sort();
    assert_eq!(sorted, vec![a, b, c]);
}

// =============================================================================
// Property Tests
// =============================================================================

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Error), Just(Severity::Warning), Just(Severity::Info)]
}

fn arb_code() -> impl Strategy<Value = DiagnosticCode> {
    prop_oneof![
        Just(DiagnosticCode::ParseError),
        Just(DiagnosticCode::MissingPrefix),
        Just(DiagnosticCode::ElementDepth),
        Just(DiagnosticCode::TypeMismatch),
    ]
}

fn arb_diagnostic() -> impl Strategy<Value = Diagnostic> {
    (
        arb_severity(),
        arb_code(),
        "[a-c]{1,3}",
        prop_oneof![Just("a.scss"), Just("b.scss")],
        1u32..5,
        1u32..5,
    )
        .prop_map(|(severity, code, message, file, line, column)| {
            Diagnostic::new(severity, code, message, at(file, line, column))
        })
}

proptest! {
    #[test]
    fn sorting_is_independent_of_input_order(mut diagnostics in prop::collection::vec(arb_diagnostic(), 0..20)) {
        let mut reversed: Vec<_> = diagnostics.iter().rev().cloned().collect();
        diagnostics.sort();
        reversed.sort();
        prop_assert_eq!(diagnostics, reversed);
    }
}
