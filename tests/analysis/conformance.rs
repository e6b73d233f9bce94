//! Integration tests for interface conformance
//!
//! Tests `@implements` contracts through the full analyzer.

use pcos_analysis::{AnalysisConfig, AnalysisInput, Analyzer, DiagnosticCode, Report, Severity};

const THEMEABLE: &str = "/**
 * Surfaces that follow the active theme.
 * @type interface
 * @name i-themeable
 * @prop {color} primary - Main color.
 * @prop {color} accent - Highlight color.
 * @param {shadow} [elevation=1]
 * @modifier inverted
 */
%i-themeable {}
";

const BUTTON: &str = "/**
 * @implements i-themeable
 * @prop {color} primary
 * @prop {color} accent
 * @prop {length} radius
 * @param {shadow} elevation
 */
.c-button {
  &--inverted { color: white; }
}
";

fn analyze(button: &str, config: AnalysisConfig) -> Report {
    let input = AnalysisInput::new()
        .with_entry_source("main.scss", "@use 'theme';\n@use 'button';\n")
        .with_source("_theme.scss", THEMEABLE)
        .with_source("_button.scss", button);
    Analyzer::new(config).analyze(&input).unwrap()
}

#[test]
fn superset_implementer_has_no_diagnostics() {
    let report = analyze(BUTTON, AnalysisConfig::default());
    assert!(report.diagnostics().is_empty(), "{}", report.render_text());
}

#[test]
fn removing_a_member_reports_exactly_it() {
    let button = BUTTON.replace(" * @prop {color} accent\n", "");
    let report = analyze(&button, AnalysisConfig::default());
    assert_eq!(report.diagnostics().len(), 1, "{}", report.render_text());

    let diagnostic = &report.diagnostics()[0];
    assert_eq!(diagnostic.code, DiagnosticCode::InterfaceConformance);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(
        diagnostic.message,
        "missing member: accent (`c-button` implements `i-themeable`)"
    );
    assert_eq!(diagnostic.span.to_string(), "_button.scss:7:1");
    assert_eq!(diagnostic.related.len(), 1);
    assert_eq!(diagnostic.related[0].span.to_string(), "_theme.scss:10:1");
}

#[test]
fn removing_a_structural_modifier_reports_it() {
    let button = BUTTON.replace("  &--inverted { color: white; }\n", "");
    let report = analyze(&button, AnalysisConfig::default());
    let messages: Vec<_> = report.diagnostics().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["missing modifier: inverted (`c-button` implements `i-themeable`)"]
    );
}

#[test]
fn defaulted_param_is_optional() {
    let button = BUTTON.replace(" * @param {shadow} elevation\n", "");
    let report = analyze(&button, AnalysisConfig::default());
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].severity, Severity::Warning);
    assert!(!report.has_errors());
}

#[test]
fn type_mismatch_severity_is_configurable() {
    let button = BUTTON.replace("@prop {color} accent", "@prop {string} accent");

    let report = analyze(&button, AnalysisConfig::default());
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].code, DiagnosticCode::TypeMismatch);
    assert_eq!(report.diagnostics()[0].severity, Severity::Warning);

    let strict = AnalysisConfig::default().with_type_mismatch_severity(Severity::Error);
    assert!(analyze(&button, strict).has_errors());
}

#[test]
fn unresolved_interface_severity_is_configurable() {
    let button = BUTTON.replace("i-themeable", "i-missing");
    let report = analyze(&button, AnalysisConfig::default());
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].code, DiagnosticCode::UnresolvedReference);
    assert!(report.has_errors());

    let lenient = AnalysisConfig::default().with_unresolved_implements_as_error(false);
    let report = analyze(&button, lenient);
    assert_eq!(report.count(Severity::Warning), 1);
    assert!(!report.has_errors());
}

const PALETTE_INTERFACE: &str = "/**
 * @type interface
 * @name i-palette
 * @prop primary
 * @prop accent
 */
%i-palette {}
";

const PALETTE: &str = "/**
 * Resolves palette colors.
 * @type object
 * @implements i-palette
 * @param primary
 * @param accent
 * @param shadow
 * @returns {map}
 */
@function o-palette($primary, $accent, $shadow) {
  @return $primary;
}
";

fn analyze_palette(palette: &str) -> Report {
    let input = AnalysisInput::new()
        .with_entry_source("main.scss", "@use 'palette-interface';\n@use 'palette';\n")
        .with_source("_palette-interface.scss", PALETTE_INTERFACE)
        .with_source("_palette.scss", palette);
    Analyzer::default().analyze(&input).unwrap()
}

#[test]
fn object_params_satisfy_interface_props() {
    let report = analyze_palette(PALETTE);
    assert!(report.diagnostics().is_empty(), "{}", report.render_text());
}

#[test]
fn object_missing_a_param_reports_it_against_both_declarations() {
    let report = analyze_palette(&PALETTE.replace(" * @param accent\n", ""));
    assert_eq!(report.diagnostics().len(), 1, "{}", report.render_text());

    let diagnostic = &report.diagnostics()[0];
    assert_eq!(diagnostic.code, DiagnosticCode::InterfaceConformance);
    assert!(diagnostic.message.contains("missing member: accent"));
    assert!(diagnostic.message.contains("`o-palette`"));
    assert!(diagnostic.message.contains("`i-palette`"));
    assert_eq!(diagnostic.span.to_string(), "_palette.scss:9:1");
    assert_eq!(diagnostic.related.len(), 1);
    assert_eq!(diagnostic.related[0].span.to_string(), "_palette-interface.scss:7:1");
}
