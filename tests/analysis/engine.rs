//! Integration tests for the analyzer pipeline
//!
//! Tests end-to-end reports, rendering, exit codes, and determinism.

use pcos_analysis::{AnalysisConfig, AnalysisInput, Analyzer, DiagnosticCode, ExitPolicy, Severity};

fn project() -> AnalysisInput {
    AnalysisInput::new()
        .with_entry_source(
            "main.scss",
            "@use 'components/button';\n@use 'components/card';\n@use 'missing';\n",
        )
        .with_source("components/_button.scss", ".c-button {}\n.Button_Old {}\n")
        .with_source(
            "components/_card.scss",
            "/** @type utility */\n.c-card {\n  &__title {\n    &__text {}\n  }\n}\n/** nothing */\n$gap: 1rem;\n",
        )
        .with_entry_source("legacy.scss", ".c-button {}\n")
}

#[test]
fn report_for_a_mixed_project() {
    let report = Analyzer::default().analyze(&project()).unwrap();
    let found: Vec<_> = report
        .diagnostics()
        .iter()
        .map(|d| (d.span.to_string(), d.code))
        .collect();
    assert_eq!(
        found,
        vec![
            ("components/_button.scss:1:1".to_string(), DiagnosticCode::DuplicateDeclaration),
            ("components/_button.scss:2:1".to_string(), DiagnosticCode::MissingPrefix),
            ("components/_button.scss:2:1".to_string(), DiagnosticCode::InvalidSegment),
            ("components/_card.scss:2:1".to_string(), DiagnosticCode::PrefixKindMismatch),
            ("components/_card.scss:4:5".to_string(), DiagnosticCode::ElementDepth),
            ("components/_card.scss:7:1".to_string(), DiagnosticCode::OrphanComment),
            ("main.scss:3:6".to_string(), DiagnosticCode::UnresolvedImport),
        ]
    );
    let duplicate = &report.diagnostics()[0];
    assert_eq!(duplicate.related[0].span.to_string(), "legacy.scss:1:1");
    assert_eq!(report.count(Severity::Error), 5);
    assert_eq!(report.count(Severity::Warning), 1);
    assert_eq!(report.count(Severity::Info), 1);
    assert_eq!(report.exit_code(ExitPolicy::FailOnError), 1);
}

#[test]
fn rendered_text() {
    let input = AnalysisInput::new()
        .with_entry_source("a.scss", ".c-button {}\n")
        .with_entry_source("b.scss", "button {}\n.button {}\n");
    let report = Analyzer::default().analyze(&input).unwrap();
    assert_eq!(
        report.render_text(),
        "b.scss:2:1: error[missing-prefix]: missing type prefix: `button` should start with `c-`\n\
         \x20 help: did you mean `c-button`?\n\
         1 error, 0 warnings, 0 info\n"
    );
}

#[test]
fn bare_selectors_are_opt_in() {
    let input = AnalysisInput::new().with_entry_source("a.scss", "/** Page. */\nbody {}\n");
    let report = Analyzer::default().analyze(&input).unwrap();
    assert!(report.diagnostics().is_empty());

    let config = AnalysisConfig::default().with_bare_selector_validation(true);
    let report = Analyzer::new(config).analyze(&input).unwrap();
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].code, DiagnosticCode::MissingPrefix);
}

#[test]
fn two_runs_render_identically() {
    let analyzer = Analyzer::default();
    let first = analyzer.analyze(&project()).unwrap();
    let second = analyzer.analyze(&project()).unwrap();
    assert_eq!(first.render_text(), second.render_text());
    assert_eq!(first.diagnostics(), second.diagnostics());
}

#[test]
fn warnings_only_fail_under_strict_policy() {
    let input = AnalysisInput::new().with_entry_source("a.scss", "@import 'gone';\n.c-a {}\n");
    let report = Analyzer::default().analyze(&input).unwrap();
    assert_eq!(report.exit_code(ExitPolicy::FailOnError), 0);
    assert_eq!(report.exit_code(ExitPolicy::FailOnWarning), 1);
}

#[test]
fn reopened_rule_blocks_are_not_duplicates() {
    let input = AnalysisInput::new().with_entry_source(
        "button.scss",
        ".c-button { color: red; }\n.c-button:hover { color: blue; }\n@media print {\n  .c-button { display: none; }\n}\n",
    );
    let report = Analyzer::default().analyze(&input).unwrap();
    assert!(report.diagnostics().is_empty(), "{}", report.render_text());
    assert_eq!(report.exit_code(ExitPolicy::FailOnError), 0);
}

#[test]
fn element_rule_with_nested_element_is_too_deep() {
    let input =
        AnalysisInput::new().with_entry_source("card.scss", ".c-card__title {\n  &__icon {}\n}\n");
    let report = Analyzer::default().analyze(&input).unwrap();
    let found: Vec<_> = report
        .diagnostics()
        .iter()
        .map(|d| (d.span.to_string(), d.code))
        .collect();
    assert_eq!(found, vec![("card.scss:2:3".to_string(), DiagnosticCode::ElementDepth)]);
}

#[cfg(feature = "serde")]
#[test]
fn registry_snapshot_round_trip() {
    use pcos_analysis::snapshot::{from_bytes, to_bytes};

    let report = Analyzer::default().analyze(&project()).unwrap();
    let bytes = to_bytes(report.registry()).unwrap();
    assert_eq!(&from_bytes(&bytes).unwrap(), report.registry());
}
